//! Warehouse connection handling
//!
//! One session per run, opened before the first statement and released
//! when the handle drops. Statements go through the simple query
//! protocol, so each one commits on its own; there is no surrounding
//! transaction to roll back.

use tokio_postgres::NoTls;
use tracing::{debug, error};

use super::error::EtlError;
use crate::config::ClusterConfig;

/// An open warehouse session
pub struct Warehouse {
    client: tokio_postgres::Client,
}

impl Warehouse {
    /// Open a session against the configured cluster
    pub async fn connect(cluster: &ClusterConfig) -> Result<Self, EtlError> {
        debug!(
            host = %cluster.host,
            dbname = %cluster.dbname,
            port = cluster.port,
            "Connecting to warehouse"
        );
        Self::connect_with(&cluster.connection_string()).await
    }

    /// Open a session from raw connection parameters
    ///
    /// Accepts the keyword/value form tokio-postgres understands, e.g.
    /// `host=localhost user=postgres dbname=playlog_test`.
    pub async fn connect_with(params: &str) -> Result<Self, EtlError> {
        let (client, connection) = tokio_postgres::connect(params, NoTls)
            .await
            .map_err(|e| EtlError::Connection(e.to_string()))?;

        // The connection task owns the socket; it ends when the client drops.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "Warehouse connection error");
            }
        });

        Ok(Self { client })
    }

    /// Execute one statement and wait for it to commit
    pub async fn execute(&self, sql: &str) -> Result<(), tokio_postgres::Error> {
        self.client.batch_execute(sql).await
    }
}
