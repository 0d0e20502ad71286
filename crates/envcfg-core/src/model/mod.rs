pub mod config_map;
pub mod record;

pub use config_map::ConfigMap;
pub use record::{ConfigurationRecord, NewRecord, RecordId};
