//! Record commands: list, show, add, update, delete

use clap::Args;
use envcfg_core::{ConfigurationRecord, NewRecord, RecordError, RecordId};
use envcfg_store::{ConfigService, ConfigStore};
use std::path::PathBuf;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print records as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: RecordId,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fields shared by add and update
#[derive(Debug, Args)]
pub struct RecordFields {
    #[arg(long)]
    pub project: String,

    #[arg(long)]
    pub url: Option<String>,

    /// Config as a JSON object of string values
    #[arg(long, conflicts_with = "config_file")]
    pub config: Option<String>,

    /// Read the config JSON from a file
    #[arg(long)]
    pub config_file: Option<PathBuf>,
}

impl RecordFields {
    fn into_new_record(self) -> Result<NewRecord, Box<dyn std::error::Error>> {
        let config = match self.config_file {
            Some(path) => Some(std::fs::read_to_string(&path).map_err(|e| {
                format!("cannot read config file {}: {}", path.display(), e)
            })?),
            None => self.config,
        };
        Ok(NewRecord::from_input(
            &self.project,
            self.url.as_deref(),
            config.as_deref(),
        )?)
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: RecordFields,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: RecordId,

    #[command(flatten)]
    pub fields: RecordFields,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: RecordId,
}

pub async fn list<S: ConfigStore>(service: &ConfigService<S>, args: ListArgs) -> CommandResult {
    let records = service.list_all().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No configurations found");
        return Ok(());
    }
    for record in &records {
        println!(
            "{}\t{}\t{}",
            record.id,
            record.project,
            record.url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn show<S: ConfigStore>(service: &ConfigService<S>, args: ShowArgs) -> CommandResult {
    let record = service.find(args.id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }
    Ok(())
}

fn print_record(record: &ConfigurationRecord) {
    println!("ID:      {}", record.id);
    println!("Project: {}", record.project);
    println!("URL:     {}", record.url.as_deref().unwrap_or("-"));
    println!("Config:");
    println!("{}", record.config_display());
}

pub async fn add<S: ConfigStore>(service: &ConfigService<S>, args: AddArgs) -> CommandResult {
    let record = args.fields.into_new_record()?;
    let id = service.add(record).await?;
    println!("Added configuration {}", id);
    Ok(())
}

pub async fn update<S: ConfigStore>(service: &ConfigService<S>, args: UpdateArgs) -> CommandResult {
    let record = args.fields.into_new_record()?;
    if service.update(args.id, record).await? == 0 {
        return Err(RecordError::RecordNotFound { id: args.id }.into());
    }
    println!("Updated configuration {}", args.id);
    Ok(())
}

pub async fn delete<S: ConfigStore>(service: &ConfigService<S>, args: DeleteArgs) -> CommandResult {
    if service.delete(args.id).await? == 0 {
        return Err(RecordError::RecordNotFound { id: args.id }.into());
    }
    println!("Deleted configuration {}", args.id);
    Ok(())
}
