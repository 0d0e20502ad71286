//! envcfg CLI
//!
//! Command-line interface for environment configuration records

use clap::{Parser, Subcommand};
use envcfg_core::logging_facility::{self, Profile};
use envcfg_store::{ConfigService, ConfigStore, SqliteStore};

mod commands;

use commands::StoreArgs;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "envcfg")]
#[command(about = "envcfg - Environment configuration records", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Emit JSON log lines on stderr
    #[arg(long)]
    json_logs: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn log_profile(&self) -> Profile {
        if self.json_logs {
            Profile::Production
        } else if self.verbose {
            Profile::Development
        } else {
            Profile::Cli
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that the store can be reached
    Ping,
    /// Create the configuration table if it is missing
    InitSchema,
    /// List all readable records
    List(commands::records::ListArgs),
    /// Show one record
    Show(commands::records::ShowArgs),
    /// Add a record
    Add(commands::records::AddArgs),
    /// Replace a record's project, url and config
    Update(commands::records::UpdateArgs),
    /// Delete a record
    Delete(commands::records::DeleteArgs),
    /// Export a record as .env text
    Export(commands::export::ExportArgs),
    /// Print the resolved PostgreSQL connection string, password masked
    ConnectionString,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile());

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult {
    match &cli.store.sqlite {
        Some(path) => {
            let service = ConfigService::new(SqliteStore::new(path));
            dispatch(&service, &cli.store, cli.command).await
        }
        None => {
            let service = ConfigService::new(cli.store.pg_store()?);
            dispatch(&service, &cli.store, cli.command).await
        }
    }
}

async fn dispatch<S: ConfigStore>(
    service: &ConfigService<S>,
    store: &StoreArgs,
    command: Commands,
) -> CliResult {
    match command {
        Commands::Ping => commands::ping::ping(service).await,
        Commands::InitSchema => commands::ping::init_schema(service).await,
        Commands::List(args) => commands::records::list(service, args).await,
        Commands::Show(args) => commands::records::show(service, args).await,
        Commands::Add(args) => commands::records::add(service, args).await,
        Commands::Update(args) => commands::records::update(service, args).await,
        Commands::Delete(args) => commands::records::delete(service, args).await,
        Commands::Export(args) => commands::export::execute(service, args).await,
        Commands::ConnectionString => commands::ping::connection_string(store),
    }
}
