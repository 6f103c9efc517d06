//! Pipeline executor
//!
//! Drives the two phases in order against a single warehouse session.
//! Every statement is logged before execution and timed; the first
//! failure aborts the run with everything already committed left in
//! place.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use super::error::{EtlError, EtlResult};
use super::phase::EtlPhase;
use super::warehouse::Warehouse;
use crate::catalog::{Dialect, QueryCatalog, Statement};
use crate::config::WarehouseConfig;

/// Outcome of one completed phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseResult {
    /// Which phase ran
    pub phase: EtlPhase,
    /// Number of statements executed
    pub statements: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Report of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct EtlReport {
    /// Unique identifier for this run
    pub run_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Per-phase results, in execution order
    pub phases: Vec<PhaseResult>,
}

impl EtlReport {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            completed_at: None,
            phases: Vec::new(),
        }
    }

    fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Whether both phases completed
    pub fn is_complete(&self) -> bool {
        self.phases.len() == EtlPhase::all().len()
    }

    /// Total run duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_ms).sum()
    }

    /// Get a formatted duration string
    pub fn duration_formatted(&self) -> String {
        let ms = self.duration_ms();
        if ms < 1_000 {
            format!("{ms}ms")
        } else if ms < 60_000 {
            format!("{:.1}s", ms as f64 / 1_000.0)
        } else {
            format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1_000)
        }
    }

    /// Print a human-readable summary to stdout
    pub fn print_summary(&self) {
        println!("\nETL Run Summary");
        println!("===============");
        println!("Run ID:   {}", self.run_id);
        println!("Duration: {}", self.duration_formatted());
        println!();
        for result in &self.phases {
            println!(
                "  [{}/{}] {:<13} {} statements in {}ms",
                result.phase.index(),
                EtlPhase::all().len(),
                result.phase.name(),
                result.statements,
                result.duration_ms
            );
        }
        println!();
    }
}

/// The pipeline executor
///
/// Holds validated configuration and the statement catalog rendered
/// from it. Connects lazily; `preview` never touches the warehouse.
pub struct EtlExecutor {
    config: WarehouseConfig,
    catalog: QueryCatalog,
}

impl EtlExecutor {
    /// Build an executor, validating source locations up front
    pub fn new(config: WarehouseConfig, dialect: Dialect) -> EtlResult<Self> {
        let catalog = QueryCatalog::new(&config, dialect)?;
        Ok(Self { config, catalog })
    }

    /// Get the statement catalog
    pub fn catalog(&self) -> &QueryCatalog {
        &self.catalog
    }

    /// Run the full pipeline: staging load, then transforms
    pub async fn run(&self) -> EtlResult<EtlReport> {
        let mut report = EtlReport::new();
        let run_span = info_span!(
            "etl_run",
            run_id = %report.run_id,
            dialect = %self.catalog.dialect()
        );

        report.phases = async {
            info!("Starting ETL run");
            let warehouse = Warehouse::connect(&self.config.cluster).await?;

            let mut phases = Vec::new();
            for phase in EtlPhase::all() {
                let span = info_span!("phase", name = phase.name(), index = phase.index());
                phases.push(self.run_phase(&warehouse, phase).instrument(span).await?);
            }
            Ok::<_, EtlError>(phases)
        }
        .instrument(run_span)
        .await?;

        report.finish();
        info!(
            run_id = %report.run_id,
            duration_ms = report.duration_ms(),
            "ETL run completed"
        );
        Ok(report)
    }

    async fn run_phase(&self, warehouse: &Warehouse, phase: EtlPhase) -> EtlResult<PhaseResult> {
        info!("Starting phase: {}", phase.description());
        let start = Instant::now();

        let statements = match phase {
            EtlPhase::StagingLoad => self.load_staging_tables(warehouse).await?,
            EtlPhase::Transform => self.insert_tables(warehouse).await?,
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(statements, duration_ms, "Phase completed");
        Ok(PhaseResult {
            phase,
            statements,
            duration_ms,
        })
    }

    /// Drop and recreate all seven tables
    ///
    /// Resets the warehouse to a blank schema. Any loaded data is lost.
    pub async fn create_tables(&self) -> EtlResult<()> {
        let warehouse = Warehouse::connect(&self.config.cluster).await?;

        for statement in self.catalog.drop_table_queries() {
            debug!(table = statement.table, "Dropping table");
            warehouse.execute(&statement.sql).await.map_err(|e| {
                error!(table = statement.table, error = %e, "Drop failed");
                EtlError::Schema {
                    table: statement.table,
                    message: e.to_string(),
                }
            })?;
        }

        for statement in self.catalog.create_table_queries() {
            debug!(table = statement.table, "Creating table");
            warehouse.execute(&statement.sql).await.map_err(|e| {
                error!(table = statement.table, error = %e, "Create failed");
                EtlError::Schema {
                    table: statement.table,
                    message: e.to_string(),
                }
            })?;
        }

        info!(dialect = %self.catalog.dialect(), "Schema reset complete");
        Ok(())
    }

    /// List every statement a run would execute, without connecting
    pub fn preview(&self) -> EtlResult<Vec<(EtlPhase, Vec<Statement>)>> {
        Ok(vec![
            (EtlPhase::StagingLoad, self.catalog.copy_table_queries()?),
            (EtlPhase::Transform, self.catalog.insert_table_queries()),
        ])
    }

    async fn load_staging_tables(&self, warehouse: &Warehouse) -> EtlResult<usize> {
        let statements = self.catalog.copy_table_queries()?;
        let count = statements.len();
        for statement in statements {
            info!(table = statement.table, "Loading staging table");
            warehouse.execute(&statement.sql).await.map_err(|e| {
                error!(table = statement.table, error = %e, "Bulk-copy failed");
                EtlError::Copy {
                    table: statement.table,
                    message: e.to_string(),
                }
            })?;
        }
        Ok(count)
    }

    async fn insert_tables(&self, warehouse: &Warehouse) -> EtlResult<usize> {
        let statements = self.catalog.insert_table_queries();
        let count = statements.len();
        for statement in statements {
            info!(table = statement.table, "Running transform");
            warehouse.execute(&statement.sql).await.map_err(|e| {
                error!(table = statement.table, error = %e, "Transform failed");
                EtlError::Transform {
                    table: statement.table,
                    message: e.to_string(),
                }
            })?;
        }
        Ok(count)
    }
}
