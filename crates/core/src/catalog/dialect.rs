//! Warehouse dialect abstraction
//!
//! Centralizes the syntax that differs between target warehouses: the
//! bulk-copy clause, the epoch-millisecond conversion expression, the
//! generated fact-table key and the weekday date-part name. Statements
//! are rendered once per catalog, so dialects stay out of the driver.

use serde::{Deserialize, Serialize};

/// SQL dialect of the target warehouse
///
/// `Redshift` is the production target and the only dialect with a
/// bulk-copy clause. `Postgres` renders the same schema and transforms
/// for stock PostgreSQL, which is what the integration tests run
/// against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Redshift,
    Postgres,
}

impl Dialect {
    /// Get the dialect name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Redshift => "redshift",
            Self::Postgres => "postgres",
        }
    }

    /// Whether the dialect can bulk-load staging tables from object storage
    pub fn supports_bulk_copy(&self) -> bool {
        matches!(self, Self::Redshift)
    }

    /// Column definition for the generated fact-table primary key
    pub fn identity_primary_key(&self) -> &'static str {
        match self {
            Self::Redshift => "BIGINT IDENTITY(0,1) PRIMARY KEY",
            Self::Postgres => "BIGSERIAL PRIMARY KEY",
        }
    }

    /// Expression converting an epoch-millisecond column to a timestamp
    pub fn epoch_millis_to_timestamp(&self, column: &str) -> String {
        match self {
            Self::Redshift => {
                format!("TIMESTAMP 'epoch' + {column} / 1000 * INTERVAL '1 second'")
            }
            Self::Postgres => format!("to_timestamp({column} / 1000.0) AT TIME ZONE 'UTC'"),
        }
    }

    /// Date-part name for the weekday index in EXTRACT
    pub fn weekday_part(&self) -> &'static str {
        match self {
            Self::Redshift => "dayofweek",
            Self::Postgres => "dow",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redshift" => Ok(Self::Redshift),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(format!(
                "Unknown dialect: {}. Expected: redshift, postgres",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parse() {
        assert_eq!("redshift".parse::<Dialect>().unwrap(), Dialect::Redshift);
        assert_eq!("Postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert!("mysql".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_bulk_copy_support() {
        assert!(Dialect::Redshift.supports_bulk_copy());
        assert!(!Dialect::Postgres.supports_bulk_copy());
    }

    #[test]
    fn test_epoch_expression_references_column() {
        for dialect in [Dialect::Redshift, Dialect::Postgres] {
            let expr = dialect.epoch_millis_to_timestamp("events.ts");
            assert!(expr.contains("events.ts"), "{expr}");
            assert!(expr.contains("1000"), "{expr}");
        }
    }

    #[test]
    fn test_weekday_part() {
        assert_eq!(Dialect::Redshift.weekday_part(), "dayofweek");
        assert_eq!(Dialect::Postgres.weekday_part(), "dow");
    }
}
