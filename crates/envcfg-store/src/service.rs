//! Configuration persistence service
//!
//! `ConfigService` is the only entry point callers use for records. It
//! validates input before touching the store, decodes raw rows into
//! `ConfigurationRecord`s and owns lifecycle logging for every operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Backends only use `tracing::debug!()` for internal details.

use crate::backend::{ConfigStore, SkippedRow, StoredRow};
use crate::errors::Result;
use chrono::NaiveDateTime;
use envcfg_core::{
    log_op_end, log_op_error, log_op_start, render_env, ConfigMap, ConfigurationRecord, NewRecord,
    RecordError, RecordId,
};
use envcfg_core_types::schema::EVENT_ROW_SKIPPED;
use std::time::Instant;

/// Stored text for a record without config
const EMPTY_CONFIG_JSON: &str = "{}";

/// Outcome of a tolerant listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListReport {
    /// Decoded records in ascending id order
    pub records: Vec<ConfigurationRecord>,
    /// Rows left out of `records`, in the order they were read
    pub skipped: Vec<SkippedRow>,
}

/// Record operations over a `ConfigStore`
#[derive(Debug, Clone)]
pub struct ConfigService<S> {
    store: S,
}

impl<S: ConfigStore> ConfigService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report whether the store can be reached
    ///
    /// Never fails; the cause of a failure is logged.
    pub async fn test_connection(&self) -> bool {
        log_op_start!("test_connection", backend = self.store.backend_name());
        let start = Instant::now();

        match self.store.ping().await {
            Ok(()) => {
                log_op_end!(
                    "test_connection",
                    duration_ms = start.elapsed().as_millis() as u64
                );
                true
            }
            Err(e) => {
                log_op_error!(
                    "test_connection",
                    e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                false
            }
        }
    }

    /// Create the configuration table if it is missing
    ///
    /// # Errors
    /// * `Connection` - store unreachable
    /// * `Persistence` - DDL rejected
    pub async fn ensure_schema(&self) -> Result<()> {
        log_op_start!("ensure_schema", backend = self.store.backend_name());
        let start = Instant::now();

        self.store.ensure_schema().await.map_err(|e| {
            log_op_error!(
                "ensure_schema",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "ensure_schema",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(())
    }

    /// All decodable records in ascending id order
    ///
    /// Rows that fail to decode are logged and left out.
    ///
    /// # Errors
    /// * `Connection` - store unreachable
    /// * `Persistence` - the query itself failed
    pub async fn list_all(&self) -> Result<Vec<ConfigurationRecord>> {
        Ok(self.list_all_with_report().await?.records)
    }

    /// Like [`list_all`](Self::list_all), also returning the skipped rows
    ///
    /// # Errors
    /// * `Connection` - store unreachable
    /// * `Persistence` - the query itself failed
    pub async fn list_all_with_report(&self) -> Result<ListReport> {
        log_op_start!("list_all");
        let start = Instant::now();

        let report = self.list_all_impl().await.map_err(|e| {
            log_op_error!(
                "list_all",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "list_all",
            duration_ms = start.elapsed().as_millis() as u64,
            row_count = report.records.len() as u64,
            skipped_count = report.skipped.len() as u64
        );
        Ok(report)
    }

    async fn list_all_impl(&self) -> Result<ListReport> {
        let rows = self.store.fetch_all().await?;

        let report = rows
            .into_iter()
            .map(|fetched| fetched.and_then(decode_to_skip))
            .fold(ListReport::default(), |mut report, decoded| {
                match decoded {
                    Ok(record) => report.records.push(record),
                    Err(skipped) => {
                        tracing::warn!(
                            component = module_path!(),
                            op = "list_all",
                            event = EVENT_ROW_SKIPPED,
                            record_id = skipped.id,
                            reason = %skipped.reason,
                        );
                        report.skipped.push(skipped);
                    }
                }
                report
            });

        Ok(report)
    }

    /// The record with `id`
    ///
    /// # Errors
    /// * `NotFound` - no such id
    /// * `RowDecode` - the row exists but cannot be decoded
    pub async fn find(&self, id: RecordId) -> Result<ConfigurationRecord> {
        log_op_start!("find", record_id = id);
        let start = Instant::now();

        let record = self.find_impl(id).await.map_err(|e| {
            log_op_error!(
                "find",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                record_id = id
            );
            e
        })?;

        log_op_end!(
            "find",
            duration_ms = start.elapsed().as_millis() as u64,
            record_id = id
        );
        Ok(record)
    }

    async fn find_impl(&self, id: RecordId) -> Result<ConfigurationRecord> {
        let fetched = self
            .store
            .fetch_one(id)
            .await?
            .ok_or(RecordError::RecordNotFound { id })?;

        let row = fetched.map_err(|skipped| RecordError::MalformedRow {
            id,
            reason: skipped.reason,
        })?;
        Ok(decode_row(row)?)
    }

    /// Validate and insert a new record, returning its assigned id
    ///
    /// Absent config is stored as `{}`.
    ///
    /// # Errors
    /// * `Validation` - blank project
    /// * `Connection` / `Persistence` - store failure
    pub async fn add(&self, record: NewRecord) -> Result<RecordId> {
        log_op_start!("add", project = %record.project);
        let start = Instant::now();

        let id = self.add_impl(record).await.map_err(|e| {
            log_op_error!(
                "add",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "add",
            duration_ms = start.elapsed().as_millis() as u64,
            record_id = id
        );
        Ok(id)
    }

    async fn add_impl(&self, record: NewRecord) -> Result<RecordId> {
        record.validate()?;
        let config_json = config_text(record.config.as_ref())?;
        self.store
            .insert(&record.project, record.url.as_deref(), &config_json)
            .await
    }

    /// Replace project, url and config of record `id`
    ///
    /// Returns rows affected; 0 means no record had that id.
    ///
    /// # Errors
    /// * `Validation` - blank project
    /// * `Connection` / `Persistence` - store failure
    pub async fn update(&self, id: RecordId, record: NewRecord) -> Result<u64> {
        log_op_start!("update", record_id = id);
        let start = Instant::now();

        let affected = self.update_impl(id, record).await.map_err(|e| {
            log_op_error!(
                "update",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                record_id = id
            );
            e
        })?;

        log_op_end!(
            "update",
            duration_ms = start.elapsed().as_millis() as u64,
            record_id = id,
            rows_affected = affected
        );
        Ok(affected)
    }

    async fn update_impl(&self, id: RecordId, record: NewRecord) -> Result<u64> {
        record.validate()?;
        let config_json = config_text(record.config.as_ref())?;
        self.store
            .update(id, &record.project, record.url.as_deref(), &config_json)
            .await
    }

    /// Delete record `id`, returning rows affected
    ///
    /// # Errors
    /// * `Connection` / `Persistence` - store failure
    pub async fn delete(&self, id: RecordId) -> Result<u64> {
        log_op_start!("delete", record_id = id);
        let start = Instant::now();

        let affected = self.store.delete(id).await.map_err(|e| {
            log_op_error!(
                "delete",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                record_id = id
            );
            e
        })?;

        log_op_end!(
            "delete",
            duration_ms = start.elapsed().as_millis() as u64,
            record_id = id,
            rows_affected = affected
        );
        Ok(affected)
    }

    /// Render record `id` as `.env` text stamped with the local time
    ///
    /// # Errors
    /// See [`export_env_at`](Self::export_env_at).
    pub async fn export_env(&self, id: RecordId) -> Result<String> {
        self.export_env_at(id, chrono::Local::now().naive_local())
            .await
    }

    /// Render record `id` as `.env` text stamped with `generated_at`
    ///
    /// # Errors
    /// * `NotFound` - no such id
    /// * `RowDecode` - the row exists but cannot be decoded
    /// * `Connection` / `Persistence` - store failure
    pub async fn export_env_at(&self, id: RecordId, generated_at: NaiveDateTime) -> Result<String> {
        log_op_start!("export_env", record_id = id);
        let start = Instant::now();

        let rendered = self
            .find_impl(id)
            .await
            .map(|record| render_env(&record.project, record.config.as_ref(), generated_at))
            .map_err(|e| {
                log_op_error!(
                    "export_env",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    record_id = id
                );
                e
            })?;

        log_op_end!(
            "export_env",
            duration_ms = start.elapsed().as_millis() as u64,
            record_id = id
        );
        Ok(rendered)
    }
}

fn config_text(config: Option<&ConfigMap>) -> Result<String> {
    match config {
        Some(config) => Ok(config.to_json()?),
        None => Ok(EMPTY_CONFIG_JSON.to_string()),
    }
}

/// Decode a raw row into a record
fn decode_row(row: StoredRow) -> std::result::Result<ConfigurationRecord, RecordError> {
    let id = row.id;
    let project = row.project.ok_or_else(|| RecordError::MalformedRow {
        id,
        reason: "project is NULL".to_string(),
    })?;
    let config = match row.config.as_deref() {
        Some(text) => {
            ConfigMap::parse_nullable_json(text).map_err(|e| RecordError::MalformedRow {
                id,
                reason: e.to_string(),
            })?
        }
        None => None,
    };

    Ok(ConfigurationRecord {
        id,
        project,
        url: row.url,
        config,
    })
}

fn decode_to_skip(row: StoredRow) -> std::result::Result<ConfigurationRecord, SkippedRow> {
    let id = row.id;
    decode_row(row).map_err(|e| SkippedRow {
        id: Some(id),
        reason: e.to_string(),
    })
}
