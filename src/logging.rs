//! Logging System
//!
//! Structured logging via the `tracing` crate. Diagnostics always go to
//! stderr, keeping stdout clean for the JSON record stream. `RUST_LOG` takes
//! precedence over the configured level.

use crate::config::LoggingConfig;
use crate::error::SnapshotError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize the global tracing subscriber from the logging configuration.
pub fn init(config: &LoggingConfig) -> Result<(), SnapshotError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            SnapshotError::Config(format!("invalid log level {:?}: {}", config.level, e))
        })?;

    let registry = Registry::default().with(filter);
    let result = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| SnapshotError::Runtime(format!("failed to initialize logging: {}", e)))
}
