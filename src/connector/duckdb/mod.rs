//! DuckDB connector implementation.
//!
//! # Module Structure
//! - `execution`: blocking open → execute → normalize → close path
//! - `schema`: table/column enumeration via the engine catalog
//!
//! # Engine Specifics
//! - DuckDB is a file-based embedded database; the configured `dbPath`
//!   points at the database file and is always opened read-only
//! - The `duckdb` crate is synchronous, so every statement runs on the
//!   tokio blocking pool while the async side supervises cancellation and
//!   the per-statement timeout
//! - In-flight statements are aborted through the connection's
//!   `InterruptHandle`; the connection itself is closed by dropping it at
//!   the end of the blocking closure, on every exit path

pub mod execution;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use duckdb::InterruptHandle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::DatabaseConnector;
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::models::{QueryOutcome, SchemaEntry, SchemaMap};

/// Cheap statement used by `test_connection`; always valid on a healthy
/// database, never touches table data.
pub(crate) const NOOP_QUERY: &str = "PRAGMA show_tables";

/// Connector for a single DuckDB database file.
///
/// Holds only the immutable configuration and a logging span, so a shared
/// reference can serve concurrent host workers; every query owns its own
/// connection for the duration of the call.
pub struct DuckdbConnector {
    config: ConnectorConfig,
    /// Logging capability injected at construction; all connector events
    /// are scoped to this span rather than an ambient global.
    span: tracing::Span,
}

impl std::fmt::Debug for DuckdbConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckdbConnector")
            .field("db_path", &self.config.db_path)
            .field("query_timeout", &self.config.query_timeout())
            .finish_non_exhaustive()
    }
}

impl DuckdbConnector {
    /// Creates a connector from a validated configuration.
    ///
    /// # Errors
    /// Returns [`ConnectorError::Configuration`] if `dbPath` is empty.
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let span = tracing::info_span!("duckdb_connector", db.path = %config.db_path);
        Ok(Self { config, span })
    }

    /// The connector's immutable configuration.
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Runs one statement on the blocking pool, racing it against host
    /// cancellation and the configured timeout.
    async fn execute(&self, sql: &str, cancel: CancellationToken) -> Result<QueryOutcome> {
        let db_path = self.config.db_path.clone();
        let statement = sql.to_string();
        let (interrupt_tx, interrupt_rx) = oneshot::channel();

        tracing::debug!(sql = %sql, "running statement");

        let mut worker: JoinHandle<Result<QueryOutcome>> = tokio::task::spawn_blocking(move || {
            execution::open_and_execute(&db_path, &statement, interrupt_tx)
        });

        let timeout = self.config.query_timeout();
        let deadline = async move {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        let mut interrupt_rx = interrupt_rx;
        let mut interrupt: Option<Arc<InterruptHandle>> = None;

        loop {
            tokio::select! {
                biased;

                joined = &mut worker => return finish(joined),

                handle = &mut interrupt_rx, if interrupt.is_none() => {
                    // The sender is dropped when the file fails to open; the
                    // worker result carries the real error in that case.
                    match handle {
                        Ok(handle) => interrupt = Some(handle),
                        Err(_) => return finish(worker.await),
                    }
                }

                () = cancel.cancelled() => {
                    tracing::info!("cancellation requested, interrupting statement");
                    return abort_in_flight(worker, interrupt, interrupt_rx, ConnectorError::Cancelled)
                        .await;
                }

                () = &mut deadline => {
                    let limit_secs = timeout.map_or(0, |limit| limit.as_secs());
                    tracing::warn!(limit_secs, "query timeout elapsed, interrupting statement");
                    return abort_in_flight(
                        worker,
                        interrupt,
                        interrupt_rx,
                        ConnectorError::Timeout { limit_secs },
                    )
                    .await;
                }
            }
        }
    }
}

/// Interrupts the live statement (best effort), waits for the worker so the
/// connection is closed exactly once, then propagates the signal.
async fn abort_in_flight(
    worker: JoinHandle<Result<QueryOutcome>>,
    interrupt: Option<Arc<InterruptHandle>>,
    interrupt_rx: oneshot::Receiver<Arc<InterruptHandle>>,
    signal: ConnectorError,
) -> Result<QueryOutcome> {
    let handle = match interrupt {
        Some(handle) => Some(handle),
        // The connection may still be opening; wait for its handle so the
        // interrupt lands before the statement runs to completion.
        None => interrupt_rx.await.ok(),
    };
    if let Some(handle) = handle {
        handle.interrupt();
    }
    let _ = worker.await;
    Err(signal)
}

fn finish(joined: std::result::Result<Result<QueryOutcome>, tokio::task::JoinError>) -> Result<QueryOutcome> {
    match joined {
        Ok(outcome) => outcome,
        Err(join_error) => Err(ConnectorError::internal(join_error.to_string())),
    }
}

#[async_trait]
impl DatabaseConnector for DuckdbConnector {
    async fn test_connection(&self) -> Result<()> {
        self.execute(NOOP_QUERY, CancellationToken::new())
            .instrument(self.span.clone())
            .await
            .map(|_| ())
    }

    async fn run_query(&self, sql: &str) -> Result<QueryOutcome> {
        self.execute(sql, CancellationToken::new())
            .instrument(self.span.clone())
            .await
    }

    async fn run_query_with_cancel(
        &self,
        sql: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryOutcome> {
        self.execute(sql, cancel.clone())
            .instrument(self.span.clone())
            .await
    }

    async fn get_tables(&self, seed: SchemaMap) -> Result<Vec<SchemaEntry>> {
        schema::get_tables(self, seed)
            .instrument(self.span.clone())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_path() {
        let result = DuckdbConnector::new(ConnectorConfig::new(""));
        assert!(matches!(
            result,
            Err(ConnectorError::Configuration { .. })
        ));
    }

    #[test]
    fn test_new_accepts_non_empty_path() {
        // Construction only validates configuration; the file is opened per
        // query, so a not-yet-existing path is fine here.
        let connector = DuckdbConnector::new(ConnectorConfig::new("/tmp/later.duckdb")).unwrap();
        assert_eq!(connector.config().db_path, "/tmp/later.duckdb");
    }

    #[test]
    fn test_debug_output_is_bounded() {
        let connector = DuckdbConnector::new(ConnectorConfig::new("x.db")).unwrap();
        let rendered = format!("{connector:?}");
        assert!(rendered.contains("x.db"));
        assert!(rendered.contains("query_timeout"));
    }
}
