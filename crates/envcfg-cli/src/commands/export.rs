//! Export command

use clap::Args;
use envcfg_core::RecordId;
use envcfg_store::{ConfigService, ConfigStore};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    pub id: RecordId,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn execute<S: ConfigStore>(
    service: &ConfigService<S>,
    args: ExportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = service.export_env(args.id).await?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, text)?;
            println!("Exported configuration {} to {}", args.id, path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
