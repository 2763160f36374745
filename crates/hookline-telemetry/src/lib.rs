//! Hookline Telemetry - logging setup for tools built on `hookline`.
//!
//! The `hookline` engine only emits `tracing` events. This crate turns a
//! [`LogConfig`] into an installed subscriber:
//! - `EnvFilter` built from a base level plus directives
//! - pretty, compact, full or JSON formatting
//! - stdout, stderr or rolling files
//!
//! # Example
//!
//! ```rust,no_run
//! use hookline_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), hookline_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("hookline=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
