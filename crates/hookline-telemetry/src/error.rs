//! Telemetry error types.

use thiserror::Error;

/// Errors raised while configuring or installing logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configuration could not be turned into a filter or writer.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A global subscriber could not be installed.
    #[error("Initialization error: {0}")]
    InitError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
