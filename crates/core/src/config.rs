//! Warehouse configuration loading and validation
//!
//! Configuration is read once at process start and passed explicitly
//! into catalog construction. Secrets (the cluster password) are never
//! printed by `Debug` or log output.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading configuration
///
/// All of these fail before any warehouse connection is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Cannot read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or is missing keys
    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A key is present but its value is unusable
    #[error("Invalid configuration: {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io { path, .. } => {
                format!(
                    "Cannot read configuration file: {path}\n\n\
                    Hint: Pass --config <file> or create dwh.toml in the working directory."
                )
            }
            ConfigError::Parse(err) => {
                format!(
                    "Configuration file is not valid: {err}\n\n\
                    Hint: The file must contain [cluster], [s3] and [iam_role] sections."
                )
            }
            ConfigError::Invalid { field, reason } => {
                format!("Invalid configuration value for {field}: {reason}")
            }
        }
    }
}

/// Complete pipeline configuration
///
/// Mirrors the three sections of the configuration file:
///
/// ```toml
/// [cluster]
/// host = "example.redshift.amazonaws.com"
/// dbname = "dwh"
/// user = "dwhuser"
/// password = "..."
/// port = 5439
///
/// [s3]
/// log_data = "s3://bucket/log_data"
/// log_jsonpath = "s3://bucket/log_json_path.json"
/// song_data = "s3://bucket/song_data"
///
/// [iam_role]
/// arn = "arn:aws:iam::123456789012:role/dwhRole"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    /// Warehouse connection parameters
    pub cluster: ClusterConfig,
    /// Object-storage source locations
    pub s3: SourceConfig,
    /// Identity assumed by the warehouse to read source files
    pub iam_role: IamRoleConfig,
}

impl WarehouseConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural constraints on the parsed values
    ///
    /// Shape validation of the S3 locations and the IAM role happens in
    /// the catalog, where the values are spliced into statements.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cluster.host",
                reason: "must not be empty".to_string(),
            });
        }
        if self.cluster.dbname.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cluster.dbname",
                reason: "must not be empty".to_string(),
            });
        }
        if self.cluster.user.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cluster.user",
                reason: "must not be empty".to_string(),
            });
        }
        if self.cluster.port == 0 {
            return Err(ConfigError::Invalid {
                field: "cluster.port",
                reason: "must be a non-zero port number".to_string(),
            });
        }
        Ok(())
    }
}

/// Warehouse connection parameters
#[derive(Clone, Deserialize)]
pub struct ClusterConfig {
    pub host: String,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

impl ClusterConfig {
    /// Build the keyword/value connection string for the warehouse driver
    pub fn connection_string(&self) -> String {
        format!(
            "host={} dbname={} user={} password={} port={}",
            self.host, self.dbname, self.user, self.password, self.port
        )
    }
}

// Manual Debug so the password can never leak into logs or panics.
impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("host", &self.host)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &redact_secret(&self.password, 0))
            .field("port", &self.port)
            .finish()
    }
}

/// Object-storage source locations
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Path/prefix for event log files
    pub log_data: String,
    /// Path to the JSON-path mapping document for event field names
    pub log_jsonpath: String,
    /// Path/prefix for song-catalog files
    pub song_data: String,
}

/// Identity assumed by the warehouse for bulk-copy reads
#[derive(Debug, Clone, Deserialize)]
pub struct IamRoleConfig {
    pub arn: String,
}

/// Redact a secret string, showing only the first N characters
pub fn redact_secret(secret: &str, visible_chars: usize) -> String {
    if secret.len() <= visible_chars || visible_chars == 0 {
        "[REDACTED]".to_string()
    } else {
        format!("{}...[REDACTED]", &secret[..visible_chars])
    }
}
