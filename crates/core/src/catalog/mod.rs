//! Schema & query catalog for the song-play warehouse
//!
//! The catalog is the authoritative set of statement templates,
//! rendered once from configuration. It exposes four named, ordered
//! lists consumed by the driver:
//!
//! 1. `drop_table_queries` - idempotent drops for all seven tables
//! 2. `create_table_queries` - idempotent creates in dependency order
//! 3. `copy_table_queries` - one bulk-copy per staging table
//! 4. `insert_table_queries` - the five star-schema transforms
//!
//! # Example
//!
//! ```rust,no_run
//! use playlog_core::catalog::{Dialect, QueryCatalog};
//! use playlog_core::config::WarehouseConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WarehouseConfig::from_file("dwh.toml")?;
//! let catalog = QueryCatalog::new(&config, Dialect::Redshift)?;
//!
//! for statement in catalog.copy_table_queries()? {
//!     println!("-- {}\n{}", statement.table, statement.sql);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Warehouse DDL and COPY clauses cannot take bind parameters, so
//! config-derived fragments are shape-validated at construction and
//! pass through a quoting literal builder at render time. A catalog
//! holds only validated values; no raw configuration is spliced.

mod dialect;
mod error;
mod schema;
mod transform;

pub use dialect::Dialect;
pub use error::CatalogError;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{SourceConfig, WarehouseConfig};

static S3_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^s3://[a-z0-9][a-z0-9.\-]{1,61}[a-z0-9](/[A-Za-z0-9!_.*()/=\-]*)?$").unwrap()
});

static IAM_ROLE_ARN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^arn:aws:iam::[0-9]{12}:role/[A-Za-z0-9+=,.@_/\-]+$").unwrap());

/// One parameterized SQL statement, tagged with the table it targets
#[derive(Debug, Clone)]
pub struct Statement {
    /// Table the statement creates, drops, loads or inserts into
    pub table: &'static str,
    /// Rendered SQL text
    pub sql: String,
}

impl Statement {
    pub(crate) fn new(table: &'static str, sql: impl Into<String>) -> Self {
        Self {
            table,
            sql: sql.into(),
        }
    }
}

/// Render a string as a single-quoted SQL literal
pub(crate) fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The statement catalog, a pure function of configuration
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    dialect: Dialect,
    sources: SourceConfig,
    iam_role: String,
}

impl QueryCatalog {
    /// Build the catalog from validated configuration
    pub fn new(config: &WarehouseConfig, dialect: Dialect) -> Result<Self, CatalogError> {
        validate_s3_uri("s3.log_data", &config.s3.log_data)?;
        validate_s3_uri("s3.log_jsonpath", &config.s3.log_jsonpath)?;
        validate_s3_uri("s3.song_data", &config.s3.song_data)?;

        if !IAM_ROLE_ARN.is_match(&config.iam_role.arn) {
            return Err(CatalogError::InvalidIamRole(config.iam_role.arn.clone()));
        }

        Ok(Self {
            dialect,
            sources: config.s3.clone(),
            iam_role: config.iam_role.arn.clone(),
        })
    }

    /// Get the catalog's dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Idempotent drops for all seven tables, staging tables first
    pub fn drop_table_queries(&self) -> Vec<Statement> {
        schema::drop_statements()
    }

    /// Idempotent creates in dependency order
    pub fn create_table_queries(&self) -> Vec<Statement> {
        schema::create_statements(self.dialect)
    }

    /// Bulk-copy statements, one per staging table
    pub fn copy_table_queries(&self) -> Result<Vec<Statement>, CatalogError> {
        transform::copy_statements(&self.sources, &self.iam_role, self.dialect)
    }

    /// Star-schema transforms: fact table first, then the dimensions
    pub fn insert_table_queries(&self) -> Vec<Statement> {
        transform::insert_statements(self.dialect)
    }
}

fn validate_s3_uri(field: &'static str, value: &str) -> Result<(), CatalogError> {
    if S3_URI.is_match(value) {
        Ok(())
    } else {
        Err(CatalogError::InvalidSource {
            field,
            value: value.to_string(),
        })
    }
}
