//! PostgreSQL backend
//!
//! Stores records in `config.env` with a JSONB config column. Config text
//! is bound as a string and cast with `::jsonb`; reads cast back with
//! `::text` so decoding happens in one place for every backend.

use super::{ConfigStore, FetchedRow, SkippedRow, StoredRow};
use crate::errors::{connection_failed, from_sqlx, invalid_settings, Result};
use crate::schema::POSTGRES_SCHEMA;
use crate::settings::ConnectionSettings;
use async_trait::async_trait;
use envcfg_core::RecordId;
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{Connection, Executor, PgConnection, Row};

const SELECT_ALL: &str =
    "SELECT id, project, url, config::text AS config FROM config.env ORDER BY id";
const SELECT_ONE: &str =
    "SELECT id, project, url, config::text AS config FROM config.env WHERE id = $1";
const INSERT: &str =
    "INSERT INTO config.env (project, url, config) VALUES ($1, $2, $3::jsonb) RETURNING id";
const UPDATE: &str =
    "UPDATE config.env SET project = $2, url = $3, config = $4::jsonb WHERE id = $1";
const DELETE: &str = "DELETE FROM config.env WHERE id = $1";

/// PostgreSQL-backed configuration store
#[derive(Debug, Clone)]
pub struct PgStore {
    options: PgConnectOptions,
}

impl PgStore {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }

    pub fn from_settings(settings: &ConnectionSettings) -> Self {
        Self::new(settings.pg_connect_options())
    }

    /// Build from a `postgres://` URL
    ///
    /// # Errors
    /// Returns a `Connection` error if the URL does not parse.
    pub fn from_url(url: &str) -> Result<Self> {
        let options = url
            .parse::<PgConnectOptions>()
            .map_err(|e| invalid_settings(e.to_string()))?;
        Ok(Self::new(options))
    }

    async fn connect(&self, op: &str) -> Result<PgConnection> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| connection_failed(op, e))
    }
}

/// Close the connection, then hand back the statement result
///
/// A failed close does not mask the result; the connection is dropped either way.
async fn release<T>(conn: PgConnection, result: Result<T>) -> Result<T> {
    if let Err(err) = conn.close().await {
        tracing::debug!(error = %err, "closing postgres connection failed");
    }
    result
}

fn read_row(row: &PgRow) -> FetchedRow {
    let id: RecordId = row.try_get("id").map_err(|e| SkippedRow {
        id: None,
        reason: format!("column id: {}", e),
    })?;
    let skip = |e: sqlx::Error| SkippedRow {
        id: Some(id),
        reason: e.to_string(),
    };

    Ok(StoredRow {
        id,
        project: row.try_get("project").map_err(skip)?,
        url: row.try_get("url").map_err(skip)?,
        config: row.try_get("config").map_err(skip)?,
    })
}

#[async_trait]
impl ConfigStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connect("ping").await?;
        let result = conn
            .ping()
            .await
            .map_err(|e| connection_failed("ping", e));
        release(conn, result).await
    }

    async fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.connect("ensure_schema").await?;
        let result = conn
            .execute(POSTGRES_SCHEMA)
            .await
            .map(|_| ())
            .map_err(|e| from_sqlx("ensure_schema", e));
        release(conn, result).await
    }

    async fn fetch_all(&self) -> Result<Vec<FetchedRow>> {
        let mut conn = self.connect("fetch_all").await?;
        let result = sqlx::query(SELECT_ALL)
            .fetch_all(&mut conn)
            .await
            .map(|rows| rows.iter().map(read_row).collect())
            .map_err(|e| from_sqlx("fetch_all", e));
        release(conn, result).await
    }

    async fn fetch_one(&self, id: RecordId) -> Result<Option<FetchedRow>> {
        let mut conn = self.connect("fetch_one").await?;
        let result = sqlx::query(SELECT_ONE)
            .bind(id)
            .fetch_optional(&mut conn)
            .await
            .map(|row| row.as_ref().map(read_row))
            .map_err(|e| from_sqlx("fetch_one", e));
        release(conn, result).await
    }

    async fn insert(
        &self,
        project: &str,
        url: Option<&str>,
        config_json: &str,
    ) -> Result<RecordId> {
        let mut conn = self.connect("insert").await?;
        let result = sqlx::query_scalar::<_, RecordId>(INSERT)
            .bind(project)
            .bind(url)
            .bind(config_json)
            .fetch_one(&mut conn)
            .await
            .map_err(|e| from_sqlx("insert", e));
        release(conn, result).await
    }

    async fn update(
        &self,
        id: RecordId,
        project: &str,
        url: Option<&str>,
        config_json: &str,
    ) -> Result<u64> {
        let mut conn = self.connect("update").await?;
        let result = sqlx::query(UPDATE)
            .bind(id)
            .bind(project)
            .bind(url)
            .bind(config_json)
            .execute(&mut conn)
            .await
            .map(|done| done.rows_affected())
            .map_err(|e| from_sqlx("update", e));
        release(conn, result).await
    }

    async fn delete(&self, id: RecordId) -> Result<u64> {
        let mut conn = self.connect("delete").await?;
        let result = sqlx::query(DELETE)
            .bind(id)
            .execute(&mut conn)
            .await
            .map(|done| done.rows_affected())
            .map_err(|e| from_sqlx("delete", e));
        release(conn, result).await
    }
}
