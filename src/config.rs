//! Connector configuration.
//!
//! The host hands the connector a JSON configuration object with a single
//! required property, `dbPath`. The configuration is validated once at
//! construction and is immutable afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, Result};

/// Default query timeout applied when the host does not configure one.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Immutable connector configuration, deserializable from the host's
/// configuration object.
///
/// ```rust
/// use duckdb_runner::config::ConnectorConfig;
///
/// let config: ConnectorConfig =
///     serde_json::from_str(r#"{"dbPath": "/data/analytics.duckdb"}"#).unwrap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// Path to the DuckDB database file. Always opened read-only.
    pub db_path: String,

    /// Per-statement timeout in seconds. `None` disables the timeout;
    /// absent in the host object means the 30 second default.
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: Option<u64>,
}

fn default_query_timeout_secs() -> Option<u64> {
    Some(DEFAULT_QUERY_TIMEOUT_SECS)
}

impl ConnectorConfig {
    /// Creates a configuration for the given database file with the default
    /// query timeout.
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }

    /// Sets the per-statement timeout, or disables it with `None`.
    ///
    /// The timeout has whole-second granularity to match the host's
    /// `queryTimeoutSecs` property; a duration with a fractional second is
    /// rounded up, so the stored limit is never shorter than requested.
    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout_secs = timeout.map(|t| {
            let mut secs = t.as_secs();
            if t.subsec_nanos() > 0 {
                secs += 1;
            }
            secs.max(1)
        });
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConnectorError::Configuration`] if `db_path` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.db_path.trim().is_empty() {
            return Err(ConnectorError::configuration(
                "dbPath is required and must not be empty",
            ));
        }
        Ok(())
    }

    /// The configured query timeout as a [`Duration`], if any.
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }
}
