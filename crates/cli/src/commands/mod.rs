//! CLI command implementations

pub mod etl;
pub mod schema;

use std::path::Path;

use playlog_core::catalog::Dialect;
use playlog_core::config::WarehouseConfig;
use playlog_core::driver::{EtlError, EtlExecutor};
use tracing::debug;

use crate::error::CliError;

/// Load configuration and build an executor for the requested dialect
fn build_executor(config_path: &Path, dialect: &str) -> Result<EtlExecutor, CliError> {
    let dialect = dialect
        .parse::<Dialect>()
        .map_err(CliError::InvalidArgument)?;
    debug!(config = %config_path.display(), %dialect, "Loading configuration");
    let config = WarehouseConfig::from_file(config_path).map_err(EtlError::from)?;
    Ok(EtlExecutor::new(config, dialect)?)
}
