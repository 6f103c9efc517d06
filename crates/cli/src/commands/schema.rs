//! CLI command for resetting the warehouse schema

use std::path::PathBuf;

use tracing::info;

use crate::error::CliError;

/// Arguments for the `create-tables` command
pub struct CreateTablesArgs {
    /// Path to the configuration file
    pub config: PathBuf,
    /// SQL dialect (redshift, postgres)
    pub dialect: String,
}

/// Handle the `create-tables` command
///
/// Drops and recreates all seven tables. Loaded data is lost.
pub async fn handle_create_tables(args: &CreateTablesArgs) -> Result<(), CliError> {
    let executor = super::build_executor(&args.config, &args.dialect)?;

    eprintln!("Resetting warehouse schema ({})", args.dialect);
    info!(config = %args.config.display(), "Dropping and recreating all tables");
    executor.create_tables().await?;
    eprintln!("Schema created. Run 'playlog run' to load data.");
    Ok(())
}
