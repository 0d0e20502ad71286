pub mod env_export;

pub use env_export::{render_env, GENERATED_AT_FORMAT};
