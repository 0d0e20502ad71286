//! SQLite backend
//!
//! Stores records in an `env` table with the config column as TEXT. Each
//! call opens the database file on a blocking worker thread and closes it
//! when the call returns.

use super::{ConfigStore, FetchedRow, SkippedRow, StoredRow};
use crate::errors::{connection_failed, from_rusqlite, task_failed, Result};
use crate::schema::SQLITE_SCHEMA;
use async_trait::async_trait;
use envcfg_core::RecordId;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads the schema table, so the file header is checked
const PING: &str = "SELECT count(*) FROM sqlite_master";

const SELECT_ALL: &str = "SELECT id, project, url, config FROM env ORDER BY id";
const SELECT_ONE: &str = "SELECT id, project, url, config FROM env WHERE id = ?1";
const INSERT: &str = "INSERT INTO env (project, url, config) VALUES (?1, ?2, ?3) RETURNING id";
const UPDATE: &str = "UPDATE env SET project = ?2, url = ?3, config = ?4 WHERE id = ?1";
const DELETE: &str = "DELETE FROM env WHERE id = ?1";

/// SQLite-backed configuration store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against a fresh connection on the blocking pool
    ///
    /// With `create` false the file must already exist.
    async fn with_connection<T, F>(&self, op: &'static str, create: bool, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open(&path, create).map_err(|e| connection_failed(op, e))?;
            f(&conn)
        })
        .await
        .map_err(|e| task_failed(op, e))?
    }
}

fn open(path: &Path, create: bool) -> rusqlite::Result<Connection> {
    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if create {
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }
    let conn = Connection::open_with_flags(path, flags)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn read_row(row: &Row<'_>) -> FetchedRow {
    let id: RecordId = row.get(0).map_err(|e| SkippedRow {
        id: None,
        reason: format!("column id: {}", e),
    })?;
    let skip = |reason: String| SkippedRow {
        id: Some(id),
        reason,
    };

    Ok(StoredRow {
        id,
        project: text_column(row, 1, "project").map_err(skip)?,
        url: text_column(row, 2, "url").map_err(skip)?,
        config: text_column(row, 3, "config").map_err(skip)?,
    })
}

/// Read a nullable TEXT column without failing the whole statement
fn text_column(row: &Row<'_>, idx: usize, name: &str) -> std::result::Result<Option<String>, String> {
    match row.get_ref(idx).map_err(|e| format!("column {}: {}", name, e))? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Some(s.to_string()))
            .map_err(|e| format!("column {} is not valid UTF-8: {}", name, e)),
        other => Err(format!(
            "column {} has unexpected type {}",
            name,
            other.data_type()
        )),
    }
}

#[async_trait]
impl ConfigStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<()> {
        self.with_connection("ping", false, |conn| {
            conn.query_row(PING, [], |row| row.get::<_, i64>(0))
                .map_err(|e| connection_failed("ping", e))?;
            Ok(())
        })
        .await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.with_connection("ensure_schema", true, |conn| {
            conn.execute_batch(SQLITE_SCHEMA)
                .map_err(|e| from_rusqlite("ensure_schema", e))
        })
        .await
    }

    async fn fetch_all(&self) -> Result<Vec<FetchedRow>> {
        self.with_connection("fetch_all", false, |conn| {
            let mut stmt = conn
                .prepare(SELECT_ALL)
                .map_err(|e| from_rusqlite("fetch_all", e))?;
            let mut rows = stmt.query([]).map_err(|e| from_rusqlite("fetch_all", e))?;

            let mut fetched = Vec::new();
            while let Some(row) = rows.next().map_err(|e| from_rusqlite("fetch_all", e))? {
                fetched.push(read_row(row));
            }
            Ok(fetched)
        })
        .await
    }

    async fn fetch_one(&self, id: RecordId) -> Result<Option<FetchedRow>> {
        self.with_connection("fetch_one", false, move |conn| {
            conn.query_row(SELECT_ONE, params![id], |row| Ok(read_row(row)))
                .optional()
                .map_err(|e| from_rusqlite("fetch_one", e))
        })
        .await
    }

    async fn insert(
        &self,
        project: &str,
        url: Option<&str>,
        config_json: &str,
    ) -> Result<RecordId> {
        let project = project.to_string();
        let url = url.map(str::to_string);
        let config_json = config_json.to_string();

        self.with_connection("insert", false, move |conn| {
            conn.query_row(INSERT, params![project, url, config_json], |row| {
                row.get::<_, RecordId>(0)
            })
            .map_err(|e| from_rusqlite("insert", e))
        })
        .await
    }

    async fn update(
        &self,
        id: RecordId,
        project: &str,
        url: Option<&str>,
        config_json: &str,
    ) -> Result<u64> {
        let project = project.to_string();
        let url = url.map(str::to_string);
        let config_json = config_json.to_string();

        self.with_connection("update", false, move |conn| {
            let affected = conn
                .execute(UPDATE, params![id, project, url, config_json])
                .map_err(|e| from_rusqlite("update", e))?;
            Ok(affected as u64)
        })
        .await
    }

    async fn delete(&self, id: RecordId) -> Result<u64> {
        self.with_connection("delete", false, move |conn| {
            let affected = conn
                .execute(DELETE, params![id])
                .map_err(|e| from_rusqlite("delete", e))?;
            Ok(affected as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store_in(dir: &TempDir) -> SqliteStore {
        let store = SqliteStore::new(dir.path().join("env.db"));
        store.ensure_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_ping_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("absent.db"));
        let err = store.ping().await.unwrap_err();
        assert_eq!(err.kind(), envcfg_core::CfgErrorKind::Connection);
        assert!(!dir.path().join("absent.db").exists());
    }

    #[tokio::test]
    async fn test_ping_rejects_file_that_is_not_a_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text, not a database file\n".repeat(64)).unwrap();
        let store = SqliteStore::new(&path);

        let err = store.ping().await.unwrap_err();
        assert_eq!(err.kind(), envcfg_core::CfgErrorKind::Connection);
        assert_eq!(err.op(), Some("ping"));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        store.ensure_schema().await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_then_fetch_raw_row() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let id = store.insert("api", None, r#"{"A":"1"}"#).await.unwrap();
        let row = store.fetch_one(id).await.unwrap().unwrap().unwrap();

        assert_eq!(
            row,
            StoredRow {
                id,
                project: Some("api".to_string()),
                url: None,
                config: Some(r#"{"A":"1"}"#.to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_wrong_column_type_is_a_skipped_row() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let conn = Connection::open(store.path()).unwrap();
        conn.execute(
            "INSERT INTO env (project, url, config) VALUES ('p', X'DEADBEEF', '{}')",
            [],
        )
        .unwrap();
        drop(conn);

        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        let skipped = rows[0].clone().unwrap_err();
        assert_eq!(skipped.id, Some(1));
        assert!(skipped.reason.contains("url"));
    }

    #[tokio::test]
    async fn test_update_and_delete_report_rows_affected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let id = store.insert("p", None, "{}").await.unwrap();

        assert_eq!(store.update(id, "q", Some("u"), "{}").await.unwrap(), 1);
        assert_eq!(store.update(id + 100, "q", None, "{}").await.unwrap(), 0);
        assert_eq!(store.delete(id).await.unwrap(), 1);
        assert_eq!(store.delete(id).await.unwrap(), 0);
    }
}
