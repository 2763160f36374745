//! CLI configuration file.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [demo]
//! first = "Hello "
//! second = "world!"
//! times = 3
//! ```

use std::path::{Path, PathBuf};

use hookline_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    FileRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`CliConfig`].
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Top-level configuration for the `hookline` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CliConfig {
    /// Logging setup.
    #[serde(default = "default_logging")]
    pub(crate) logging: LogConfig,
    /// Inputs for the demo commands.
    #[serde(default)]
    pub(crate) demo: DemoConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            logging: default_logging(),
            demo: DemoConfig::default(),
        }
    }
}

fn default_logging() -> LogConfig {
    LogConfig::new("info").with_format(LogFormat::Compact)
}

/// Inputs for the `logger` demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DemoConfig {
    /// First string handed to the concatenation.
    #[serde(default = "default_first")]
    pub(crate) first: String,
    /// Second string handed to the concatenation.
    #[serde(default = "default_second")]
    pub(crate) second: String,
    /// How many times the counter hook runs.
    #[serde(default = "default_times")]
    pub(crate) times: usize,
}

fn default_first() -> String {
    "Hello ".to_string()
}

fn default_second() -> String {
    "world!".to_string()
}

fn default_times() -> usize {
    3
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            first: default_first(),
            second: default_second(),
            times: default_times(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileRead`] if an explicit path cannot be read and
    /// [`ConfigError::Parse`] if its contents are not valid.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_path() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.demo.times, 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [demo]
            times = 5

            [logging]
            level = "debug"
            "#,
        );

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.demo.times, 5);
        assert_eq!(config.demo.first, "Hello ");
        assert_eq!(config.logging.level, "debug");
        // A [logging] table falls back to the telemetry defaults.
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = write_config("");
        assert_eq!(
            CliConfig::load(Some(file.path())).unwrap(),
            CliConfig::default()
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = CliConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_config("[demo]\ntimes = \"many\"\n");
        let err = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
