//! Playlog Core - ETL pipeline for the song-play event warehouse
//!
//! Provides the two components of the pipeline:
//! - Schema & query catalog: parameterized DDL, bulk-copy and transform
//!   statements for the star schema (`catalog`)
//! - Pipeline driver: warehouse connection lifecycle and strictly
//!   sequential phase execution (`driver`)
//!
//! Configuration is loaded explicitly at process start (`config`) and
//! passed into catalog construction; there is no process-wide state.

pub mod catalog;
pub mod config;
pub mod driver;

// Re-export commonly used types
pub use catalog::{CatalogError, Dialect, QueryCatalog, Statement};
pub use config::{ClusterConfig, ConfigError, IamRoleConfig, SourceConfig, WarehouseConfig};
pub use driver::{EtlError, EtlExecutor, EtlPhase, EtlReport, PhaseResult, Warehouse};
