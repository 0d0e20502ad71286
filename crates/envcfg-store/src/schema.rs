//! Table definitions, embedded at compile time
//!
//! Both scripts are idempotent. This is bootstrap for an empty database,
//! not a migration framework.

/// DDL for the SQLite backend (`env` table)
pub const SQLITE_SCHEMA: &str = include_str!("../schema/sqlite.sql");

/// DDL for the PostgreSQL backend (`config.env` table)
pub const POSTGRES_SCHEMA: &str = include_str!("../schema/postgres.sql");
