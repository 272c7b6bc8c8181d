//! Error types for the connector.
//!
//! The host receives either valid data or a short human-readable error
//! string; the variants here map one-to-one onto that contract. Cancellation
//! and timeout are deliberately error variants rather than query outcomes so
//! they propagate past the normal reporting path (see
//! [`ConnectorError::is_cancellation`]).

use thiserror::Error;

/// Main error type for connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Invalid configuration at construction time; fatal, surfaced to the
    /// host during setup.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration.
        message: String,
    },

    /// The database file could not be opened.
    #[error("Database connection failed: {context}")]
    Connection {
        /// Sanitized description of the failure.
        context: String,
        /// Underlying driver error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Engine-reported failure while executing a statement (syntax error,
    /// runtime error). The connection is still closed on this path.
    #[error("Query execution failed: {context}")]
    Execution {
        /// The engine's error message.
        context: String,
    },

    /// The table-listing statement itself failed; fatal for the whole
    /// schema scan.
    #[error("Failed getting schema: {context}")]
    SchemaIntrospection {
        /// What part of introspection failed.
        context: String,
    },

    /// The host cancelled the query mid-flight. The in-flight statement was
    /// interrupted (best effort) and the connection closed before this was
    /// raised.
    #[error("query cancelled by host")]
    Cancelled,

    /// The configured query timeout elapsed mid-flight. Same cleanup
    /// guarantees as [`ConnectorError::Cancelled`].
    #[error("query timed out after {limit_secs}s")]
    Timeout {
        /// The configured limit that elapsed.
        limit_secs: u64,
    },

    /// Host-facing JSON encoding failed.
    #[error("Serialization failed: {context}")]
    Serialization {
        /// What was being serialized.
        context: String,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The blocking worker running the engine call did not complete.
    #[error("worker task failed: {context}")]
    Internal {
        /// Join failure description.
        context: String,
    },
}

/// Convenience type alias for Results with [`ConnectorError`].
pub type Result<T> = std::result::Result<T, ConnectorError>;

impl ConnectorError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a connection error with context.
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an execution error from an engine error message.
    pub fn execution(context: impl Into<String>) -> Self {
        Self::Execution {
            context: context.into(),
        }
    }

    /// Creates a schema introspection error.
    pub fn schema_introspection(context: impl Into<String>) -> Self {
        Self::SchemaIntrospection {
            context: context.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Creates an internal worker error.
    pub fn internal(context: impl Into<String>) -> Self {
        Self::Internal {
            context: context.into(),
        }
    }

    /// True for the separately propagated cancellation signals
    /// (host cancellation and query timeout).
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = ConnectorError::configuration("dbPath must not be empty");
        assert!(error.to_string().contains("dbPath must not be empty"));

        let error = ConnectorError::execution("Parser Error: syntax error at or near \"SELEC\"");
        assert!(error.to_string().starts_with("Query execution failed"));

        let error = ConnectorError::schema_introspection("table listing failed");
        assert!(error.to_string().starts_with("Failed getting schema"));
    }

    #[test]
    fn test_cancellation_predicate() {
        assert!(ConnectorError::Cancelled.is_cancellation());
        assert!(ConnectorError::Timeout { limit_secs: 30 }.is_cancellation());
        assert!(!ConnectorError::execution("boom").is_cancellation());
        assert!(!ConnectorError::configuration("bad").is_cancellation());
    }
}
