//! Host-facing contract surface.
//!
//! BI hosts expect a stringly contract: `run_query` yields either a
//! JSON-encoded `{columns, rows}` object or a short human-readable error
//! message, and `get_tables` yields a `[{name, columns}]` listing for
//! schema caching and autocomplete. Internally everything is the tagged
//! [`QueryOutcome`]/[`crate::ConnectorError`] pair; this module is the only
//! place the tuple shape survives.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::connector::{DatabaseConnector, DuckdbConnector};
use crate::error::{ConnectorError, Result};
use crate::models::{NO_DATA_MESSAGE, QueryOutcome, SchemaEntry, SchemaMap};

/// What the host receives for one query: exactly one of `data` (the
/// serialized result set) or `error` (a short message) is populated.
///
/// Cancellation and timeout never appear here; they propagate as errors
/// from [`DuckdbConnector::run_query_for_host`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    /// JSON-encoded `{columns, rows}` object, when the query produced data.
    pub data: Option<String>,
    /// Human-readable failure or no-data message otherwise.
    pub error: Option<String>,
}

impl QueryResponse {
    fn with_data(data: String) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    fn with_error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

impl DuckdbConnector {
    /// Runs a query under the host contract.
    ///
    /// Execution failures and the no-data condition are folded into
    /// [`QueryResponse::error`]; the query is "failed" from the host's
    /// perspective but the call itself succeeds.
    ///
    /// # Errors
    /// - [`ConnectorError::Cancelled`] / [`ConnectorError::Timeout`] when
    ///   the host cancels or the timeout fires; propagated, not reported
    /// - [`ConnectorError::Serialization`] if the result cannot be encoded
    pub async fn run_query_for_host(
        &self,
        sql: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse> {
        match self.run_query_with_cancel(sql, cancel).await {
            Ok(QueryOutcome::Rows(result_set)) => {
                let encoded = serde_json::to_string(&result_set)
                    .map_err(|e| ConnectorError::serialization("result set", e))?;
                Ok(QueryResponse::with_data(encoded))
            }
            Ok(QueryOutcome::NoData) => Ok(QueryResponse::with_error(NO_DATA_MESSAGE)),
            Err(error) if error.is_cancellation() => Err(error),
            Err(error) => Ok(QueryResponse::with_error(error.to_string())),
        }
    }

    /// Enumerates the schema and returns it directly as
    /// [`SchemaEntry`] values; the host serializes or caches as it sees fit.
    ///
    /// # Errors
    /// Same as [`DatabaseConnector::get_tables`].
    pub async fn get_tables_for_host(&self, seed: SchemaMap) -> Result<Vec<SchemaEntry>> {
        self.get_tables(seed).await
    }
}
