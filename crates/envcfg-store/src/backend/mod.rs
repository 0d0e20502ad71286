//! Relational store backends
//!
//! `ConfigStore` is the seam between `ConfigService` and a concrete
//! database. Backends return rows undecoded so that the service decides
//! which rows are usable.

pub mod postgres;
pub mod sqlite;

use crate::errors::Result;
use async_trait::async_trait;
use envcfg_core::RecordId;

pub use postgres::PgStore;
pub use sqlite::SqliteStore;

/// One row of the configuration table, columns as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub id: RecordId,
    pub project: Option<String>,
    pub url: Option<String>,
    /// JSON text of the config column
    pub config: Option<String>,
}

/// A row that was read but could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Absent when the id column itself could not be read
    pub id: Option<RecordId>,
    pub reason: String,
}

/// Outcome of reading a single row
pub type FetchedRow = std::result::Result<StoredRow, SkippedRow>;

/// Storage operations over the configuration table
///
/// Every call acquires its own connection and releases it before
/// returning, whether it succeeds or fails. Nothing is cached between calls.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Open a connection and run a trivial query
    async fn ping(&self) -> Result<()>;

    /// Create the table if it does not exist
    async fn ensure_schema(&self) -> Result<()>;

    /// All rows, ordered by ascending id
    ///
    /// A row whose columns cannot be read yields `Err(SkippedRow)` in place;
    /// only statement-level failures fail the call.
    async fn fetch_all(&self) -> Result<Vec<FetchedRow>>;

    async fn fetch_one(&self, id: RecordId) -> Result<Option<FetchedRow>>;

    /// Insert a row and return the store-assigned id
    async fn insert(&self, project: &str, url: Option<&str>, config_json: &str)
        -> Result<RecordId>;

    /// Replace the mutable columns of row `id`, returning rows affected
    async fn update(
        &self,
        id: RecordId,
        project: &str,
        url: Option<&str>,
        config_json: &str,
    ) -> Result<u64>;

    /// Delete row `id`, returning rows affected
    async fn delete(&self, id: RecordId) -> Result<u64>;
}
