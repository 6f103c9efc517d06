//! CLI error type

use playlog_core::driver::EtlError;
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// A command-line argument could not be parsed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The pipeline reported an error
    #[error(transparent)]
    Etl(#[from] EtlError),
}

impl CliError {
    /// Get a user-friendly message for terminal output
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument(message) => format!("Invalid argument: {message}"),
            CliError::Etl(err) => err.user_message(),
        }
    }
}
