//! Logging setup for hosts that do not install their own subscriber.
//!
//! Connector events are emitted through each connector's own span; this
//! module only wires up a process-wide `tracing` subscriber with the usual
//! verbosity ladder. Hosts with an existing subscriber should skip it.

use tracing_subscriber::EnvFilter;

use crate::Result;
use crate::error::ConnectorError;

/// Initializes structured logging based on verbosity level.
///
/// `RUST_LOG` takes precedence when set; otherwise the level is derived
/// from the flags (0=INFO, 1=DEBUG, 2+=TRACE, `quiet` forces ERROR).
///
/// # Errors
/// Returns a configuration error if a global subscriber is already set.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| {
            ConnectorError::configuration(format!("Failed to initialize logging: {e}"))
        })?;

    Ok(())
}
