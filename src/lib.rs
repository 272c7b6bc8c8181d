//! Read-only DuckDB connector for BI/dashboard hosts.
//!
//! This crate lets a host application run SQL against a DuckDB database
//! file and introspect its schema. It deliberately contains no query
//! engine of its own: SQL parsing, execution, storage and transactions all
//! live in the embedded engine, and this crate only opens a read-only
//! connection per call, normalizes the result into a columnar
//! `{columns, rows}` shape, and enumerates tables/columns from the catalog.
//!
//! # Guarantees
//! - The database file is only ever opened read-only; nothing is written
//! - One connection per query, closed on every exit path; no pooling
//! - Results are materialized eagerly and are all-or-nothing; no partial
//!   result set is ever returned
//! - Cancellation and timeout interrupt the in-flight statement, close the
//!   connection, then propagate as distinct signals
//!
//! # Example
//! ```rust,no_run
//! use duckdb_runner::{ConnectorConfig, DatabaseConnector, DuckdbConnector, QueryOutcome};
//!
//! # async fn example() -> duckdb_runner::Result<()> {
//! let connector = DuckdbConnector::new(ConnectorConfig::new("/data/analytics.duckdb"))?;
//! if let QueryOutcome::Rows(result_set) =
//!     connector.run_query("SELECT 1 AS answer").await?
//! {
//!     println!("{} rows", result_set.rows.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod host;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::ConnectorConfig;
pub use connector::{DatabaseConnector, DuckdbConnector};
pub use error::{ConnectorError, Result};
pub use host::QueryResponse;
pub use models::{
    ColumnDescriptor, NO_DATA_MESSAGE, QueryOutcome, ResultSet, Row, SchemaColumn, SchemaEntry,
    SchemaMap,
};
