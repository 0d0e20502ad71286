//! envcfg Core - record model, validation and `.env` rendering
//!
//! This crate holds everything about environment configuration records that
//! does not need a database:
//! - `ConfigurationRecord` and the flat `ConfigMap` payload
//! - Input validation applied before any store call
//! - `.env` export rendering
//! - The canonical error facility (`CfgError` / `CfgErrorKind`)
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod render;
pub mod rules;

#[doc(hidden)]
pub use envcfg_core_types as core_types;

// Re-export commonly used types
pub use errors::{CfgError, CfgErrorKind, RecordError, Result};
pub use model::{ConfigMap, ConfigurationRecord, NewRecord, RecordId};
pub use render::render_env;
