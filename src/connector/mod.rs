//! Database connector trait and engine implementations.
//!
//! The trait gives the host a unified, object-safe surface for running
//! queries and introspecting schema. The only engine implemented here is
//! DuckDB; the seam exists so a host can hold `Box<dyn DatabaseConnector>`
//! without caring which engine backs it.

pub mod duckdb;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::models::{QueryOutcome, SchemaEntry, SchemaMap};

pub use self::duckdb::DuckdbConnector;

/// Object-safe connector trait.
///
/// Every call is a single-shot, connect → execute → normalize → disconnect
/// sequence over a read-only connection. Implementations hold no mutable
/// shared state, so concurrent calls from multiple host workers are
/// independent by construction.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Runs a cheap no-op statement to verify the database is reachable.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the statement fails.
    async fn test_connection(&self) -> Result<()>;

    /// Executes `sql` as a single statement and materializes the full
    /// result set.
    ///
    /// # Errors
    /// - [`crate::ConnectorError::Connection`] if the file cannot be opened
    /// - [`crate::ConnectorError::Execution`] for engine-reported failures
    /// - [`crate::ConnectorError::Timeout`] if the configured per-statement
    ///   timeout elapses; the in-flight statement is interrupted first
    ///
    /// The connection is closed on every exit path.
    async fn run_query(&self, sql: &str) -> Result<QueryOutcome>;

    /// Like [`DatabaseConnector::run_query`], but also observes a host
    /// cancellation token. On cancellation the live statement is
    /// interrupted (best effort), the connection is closed, and
    /// [`crate::ConnectorError::Cancelled`] is propagated rather than
    /// folded into the outcome.
    async fn run_query_with_cancel(
        &self,
        sql: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryOutcome>;

    /// Enumerates tables and their columns.
    ///
    /// `seed` lets the host pass a pre-populated map; discovered tables are
    /// inserted (or overwritten in place) and the final entries are
    /// returned in map order.
    ///
    /// # Errors
    /// Returns [`crate::ConnectorError::SchemaIntrospection`] if the table
    /// listing itself fails; a per-table describe failure aborts the scan
    /// and propagates as a normal execution error.
    async fn get_tables(&self, seed: SchemaMap) -> Result<Vec<SchemaEntry>>;
}
