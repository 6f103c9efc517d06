//! playlog - ETL pipeline CLI for the song-play event warehouse

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::etl::{EtlRunArgs, PreviewArgs, handle_etl_run, handle_preview};
use commands::schema::{CreateTablesArgs, handle_create_tables};
use error::CliError;

#[derive(Parser)]
#[command(name = "playlog")]
#[command(version, about = "ETL pipeline for the song-play event warehouse")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "dwh.toml")]
    config: PathBuf,

    /// SQL dialect to render statements for
    #[arg(short, long, global = true, default_value = "redshift")]
    dialect: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: load staging tables, then transform
    Run {
        /// Emit the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Drop and recreate all tables (destroys loaded data)
    CreateTables,
    /// Print every statement a run would execute, without connecting
    Preview {
        /// Restrict output to one phase (staging_load, transform)
        #[arg(long)]
        phase: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command.unwrap_or(Command::Run { json: false }) {
        Command::Run { json } => {
            handle_etl_run(&EtlRunArgs {
                config: cli.config,
                dialect: cli.dialect,
                json,
            })
            .await
        }
        Command::CreateTables => {
            handle_create_tables(&CreateTablesArgs {
                config: cli.config,
                dialect: cli.dialect,
            })
            .await
        }
        Command::Preview { phase } => {
            handle_preview(&PreviewArgs {
                config: cli.config,
                dialect: cli.dialect,
                phase,
            })
            .await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
