//! Pipeline driver for the song-play warehouse
//!
//! Orchestrates the two-phase ETL run: bulk-copy the raw event and song
//! files into staging, then transform staging into the star schema.
//! Phases run strictly in order over one warehouse session; each
//! statement commits individually and the first failure aborts the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use playlog_core::catalog::Dialect;
//! use playlog_core::config::WarehouseConfig;
//! use playlog_core::driver::EtlExecutor;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WarehouseConfig::from_file("dwh.toml")?;
//! let executor = EtlExecutor::new(config, Dialect::Redshift)?;
//!
//! executor.create_tables().await?;
//! let report = executor.run().await?;
//! report.print_summary();
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod phase;
mod warehouse;

pub use error::{EtlError, EtlResult};
pub use executor::{EtlExecutor, EtlReport, PhaseResult};
pub use phase::EtlPhase;
pub use warehouse::Warehouse;
