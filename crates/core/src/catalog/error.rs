//! Error types for catalog construction

use thiserror::Error;

/// Errors that can occur while building the query catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A configured source location is not a usable object-storage URI
    #[error("Invalid source location for {field}: {value}")]
    InvalidSource { field: &'static str, value: String },

    /// The configured access-role identifier is malformed
    #[error("Invalid IAM role identifier: {0}")]
    InvalidIamRole(String),

    /// The dialect cannot express the requested statements
    #[error("{operation} is not supported by the {dialect} dialect")]
    Unsupported {
        dialect: &'static str,
        operation: &'static str,
    },
}

impl CatalogError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::InvalidSource { field, value } => {
                format!(
                    "Invalid source location for {field}: {value}\n\n\
                    Hint: Source locations must be s3:// URIs without quotes or whitespace."
                )
            }
            CatalogError::InvalidIamRole(arn) => {
                format!(
                    "Invalid IAM role identifier: {arn}\n\n\
                    Hint: Expected the form arn:aws:iam::<account-id>:role/<name>."
                )
            }
            CatalogError::Unsupported { dialect, operation } => {
                format!(
                    "{operation} is not supported by the {dialect} dialect.\n\n\
                    Hint: Staging load requires the redshift dialect."
                )
            }
        }
    }
}
