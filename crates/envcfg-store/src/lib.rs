//! envcfg Store - relational persistence for configuration records
//!
//! This crate provides:
//! - `ConfigService`, the validated and logged record operations
//! - The `ConfigStore` backend seam with PostgreSQL and SQLite implementations
//! - `ConnectionSettings` read from `DB_*` environment variables
//! - Embedded table schemas for both backends

#![allow(clippy::result_large_err)]

pub mod backend;
pub mod errors;
pub mod schema;
pub mod service;
pub mod settings;

pub use backend::{ConfigStore, FetchedRow, PgStore, SkippedRow, SqliteStore, StoredRow};
pub use errors::Result;
pub use service::{ConfigService, ListReport};
pub use settings::ConnectionSettings;
