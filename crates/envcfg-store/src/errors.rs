//! Error handling for envcfg-store
//!
//! Wraps envcfg-core CfgError with store-specific helpers

use envcfg_core::errors::{CfgError, CfgErrorKind};

/// Result type alias using CfgError
pub type Result<T> = std::result::Result<T, CfgError>;

/// The store could not be reached or refused the credentials
pub fn connection_failed(op: &str, reason: impl std::fmt::Display) -> CfgError {
    CfgError::new(CfgErrorKind::Connection)
        .with_op(op.to_string())
        .with_message(reason.to_string())
}

/// Connection settings could not be parsed
pub fn invalid_settings(reason: impl Into<String>) -> CfgError {
    CfgError::new(CfgErrorKind::Connection)
        .with_op("parse_settings")
        .with_message(reason)
}

/// Create a persistence error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> CfgError {
    CfgError::new(CfgErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Create a persistence error from sqlx::Error
pub fn from_sqlx(op: &str, err: sqlx::Error) -> CfgError {
    CfgError::new(CfgErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// A blocking store task panicked or was cancelled
pub fn task_failed(op: &str, err: tokio::task::JoinError) -> CfgError {
    CfgError::new(CfgErrorKind::Internal)
        .with_op(op.to_string())
        .with_message(format!("store task failed: {}", err))
}
