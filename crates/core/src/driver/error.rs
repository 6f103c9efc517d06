//! Error types for pipeline execution
//!
//! No error is caught or retried anywhere in the driver; any statement
//! failure propagates and terminates the run. Statements committed
//! before the failure remain applied.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Errors that can occur during an ETL run
#[derive(Error, Debug)]
pub enum EtlError {
    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Statement catalog could not be built from configuration
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Warehouse unreachable or credentials rejected
    #[error("Connection error: {0}")]
    Connection(String),

    /// A bulk-copy statement was aborted by the warehouse
    #[error("Bulk-copy into {table} failed: {message}")]
    Copy { table: &'static str, message: String },

    /// A transform statement was aborted by the warehouse
    #[error("Transform into {table} failed: {message}")]
    Transform { table: &'static str, message: String },

    /// A drop/create statement was aborted by the warehouse
    #[error("Schema statement for {table} failed: {message}")]
    Schema { table: &'static str, message: String },
}

/// Result type for driver operations
pub type EtlResult<T> = Result<T, EtlError>;

impl EtlError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            EtlError::Config(err) => err.user_message(),
            EtlError::Catalog(err) => err.user_message(),
            EtlError::Connection(message) => {
                format!(
                    "Cannot connect to the warehouse: {message}\n\n\
                    Hint: Check the [cluster] section of the configuration file."
                )
            }
            EtlError::Copy { table, message } => {
                format!(
                    "Bulk-copy into {table} failed: {message}\n\n\
                    Hint: The warehouse often summarizes load failures; query its \
                    load error log (stl_load_errors on Redshift) for row-level detail. \
                    A single row violating a NOT NULL or type constraint aborts the \
                    whole copy and leaves {table} empty."
                )
            }
            EtlError::Transform { table, message } => {
                format!(
                    "Transform into {table} failed: {message}\n\n\
                    Hint: A duplicate-key failure usually means the pipeline ran twice \
                    against the same staging data; the fact-table insert is not re-run \
                    safe. Run 'playlog create-tables' to reset and load again."
                )
            }
            EtlError::Schema { table, message } => {
                format!("Schema statement for {table} failed: {message}")
            }
        }
    }
}
