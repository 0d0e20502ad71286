//! Connectivity and bootstrap commands

use super::StoreArgs;
use envcfg_store::{ConfigService, ConfigStore};

pub async fn ping<S: ConfigStore>(
    service: &ConfigService<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !service.test_connection().await {
        return Err(format!("cannot reach the {} store", service.store().backend_name()).into());
    }
    println!("Connection OK ({})", service.store().backend_name());
    Ok(())
}

pub async fn init_schema<S: ConfigStore>(
    service: &ConfigService<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    service.ensure_schema().await?;
    println!("Schema ready ({})", service.store().backend_name());
    Ok(())
}

pub fn connection_string(store: &StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = store.settings()?;
    println!("{}", settings.redacted_connection_string());
    Ok(())
}
