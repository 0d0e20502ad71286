//! Input rules applied before any store call

pub mod validation;

pub use validation::{normalize_url, parse_config_input, validate_project};
