//! Hookline CLI - runnable demos of pre hook chains.
//!
//! Each subcommand wires hooks onto a small target and prints what the
//! hooked calls return. Engine events are visible with `--verbose`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hookline_telemetry::{LogConfig, LogFormat};

mod commands;
mod config;

use commands::{logger, math, sum};
use config::CliConfig;

/// Hookline - pre hook chains for plain functions
#[derive(Parser)]
#[command(name = "hookline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "HOOKLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format, overriding the configuration file
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Concatenate strings through a counting hook, then remove and override it
    Logger {
        /// Number of counted calls (defaults to the configured value)
        #[arg(short, long)]
        times: Option<usize>,
    },

    /// Call a hooked math object
    #[command(allow_negative_numbers = true)]
    Math {
        /// First operand
        a: f64,
        /// Second operand
        b: f64,
    },

    /// Add two numbers through a hook that makes 1 + 1 = 3
    #[command(allow_negative_numbers = true)]
    Sum {
        /// First operand
        a: i64,
        /// Second operand
        b: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    /// Multi-line, human readable
    Pretty,
    /// One line per event
    Compact,
    /// One JSON object per event
    Json,
    /// One line per event with all fields
    Full,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Full => LogFormat::Full,
        }
    }
}

impl Cli {
    /// Apply command-line overrides to the configured logging.
    fn log_config(&self, base: &LogConfig) -> LogConfig {
        let mut config = base.clone();
        if self.verbose {
            config = config.with_level("debug");
        }
        if let Some(format) = self.log_format {
            config = config.with_format(format.into());
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    if let Err(e) = hookline_telemetry::setup_logging(&cli.log_config(&config.logging)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Logger { times } => {
            let mut demo = config.demo;
            if let Some(times) = times {
                demo.times = times;
            }
            logger::run_logger(&demo)?;
        },
        Commands::Math { a, b } => {
            math::run_math(a, b)?;
        },
        Commands::Sum { a, b } => {
            sum::run_sum(a, b)?;
        },
    }

    Ok(())
}
