//! CLI commands for running and previewing the pipeline

use std::path::PathBuf;

use playlog_core::driver::{EtlError, EtlPhase};
use tracing::info;

use crate::error::CliError;

/// Arguments for the `run` command
pub struct EtlRunArgs {
    /// Path to the configuration file
    pub config: PathBuf,
    /// SQL dialect (redshift, postgres)
    pub dialect: String,
    /// Emit the run report as JSON on stdout
    pub json: bool,
}

/// Arguments for the `preview` command
pub struct PreviewArgs {
    /// Path to the configuration file
    pub config: PathBuf,
    /// SQL dialect (redshift, postgres)
    pub dialect: String,
    /// Restrict output to one phase (empty = all)
    pub phase: Option<String>,
}

/// Handle the `run` command
pub async fn handle_etl_run(args: &EtlRunArgs) -> Result<(), CliError> {
    let executor = super::build_executor(&args.config, &args.dialect)?;

    eprintln!("Starting ETL run against {}", args.dialect);
    let report = executor.run().await?;
    info!(run_id = %report.run_id, duration_ms = report.duration_ms(), "Run finished");

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => return Err(CliError::InvalidArgument(format!(
                "Failed to serialize report: {e}"
            ))),
        }
    } else {
        report.print_summary();
        eprintln!("ETL run completed successfully!");
    }
    Ok(())
}

/// Handle the `preview` command
///
/// Prints every statement a run would execute, in order, without
/// touching the warehouse. Secrets never appear: statements embed only
/// source locations and the IAM role.
pub async fn handle_preview(args: &PreviewArgs) -> Result<(), CliError> {
    let executor = super::build_executor(&args.config, &args.dialect)?;

    let only = args
        .phase
        .as_deref()
        .map(|s| s.parse::<EtlPhase>())
        .transpose()
        .map_err(CliError::InvalidArgument)?;

    // Build only the requested lists, so previewing transforms works
    // even under a dialect without bulk-copy support.
    let plan = match only {
        Some(EtlPhase::StagingLoad) => vec![(
            EtlPhase::StagingLoad,
            executor.catalog().copy_table_queries().map_err(EtlError::from)?,
        )],
        Some(EtlPhase::Transform) => vec![(
            EtlPhase::Transform,
            executor.catalog().insert_table_queries(),
        )],
        None => executor.preview()?,
    };

    for (phase, statements) in plan {
        println!("-- Phase {}: {}", phase.index(), phase.description());
        for statement in statements {
            println!("\n-- {}\n{};", statement.table, statement.sql);
        }
        println!();
    }
    Ok(())
}
