//! Log query configuration.
//!
//! Settings are fixed at startup. A bad timezone name or a missing log directory is a
//! startup failure, never a per-query error.

use crate::timezone::TimeResolver;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default root of the partitioned log directory.
pub const DEFAULT_LOG_DIR: &str = "/tmp/app_logs";

/// Default display timezone.
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The timezone name is not a known IANA zone.
    #[error("Invalid timezone '{name}': {reason}")]
    InvalidTimezone {
        /// The rejected timezone name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// The log directory does not exist.
    #[error("Log directory not found: {}", .0.display())]
    LogDirNotFound(PathBuf),

    /// The log directory path exists but is not a directory.
    #[error("Log directory is not a directory: {}", .0.display())]
    LogDirNotADirectory(PathBuf),
}

/// Query layer configuration.
///
/// Configuration values can be set via environment variables:
/// - `LOGSCOPE_LOG_DIR`: Root of the `date=.../source=.../*.ndjson` tree (default: "/tmp/app_logs")
/// - `LOGSCOPE_TIMEZONE`: Display timezone for timestamps (default: "America/Chicago")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQueryConfig {
    /// Root of the Hive-partitioned log directory.
    pub log_dir: PathBuf,
    /// IANA name of the display timezone.
    pub timezone: String,
}

impl LogQueryConfig {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub fn new(log_dir: impl Into<PathBuf>, timezone: impl Into<String>) -> Self {
        Self {
            log_dir: log_dir.into(),
            timezone: timezone.into(),
        }
    }

    /// Loads the configuration from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through a variable lookup function.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            log_dir: var("LOGSCOPE_LOG_DIR").map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from),
            timezone: var("LOGSCOPE_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        }
    }

    /// Validates the configuration and builds the timezone resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The timezone is not a known IANA zone name
    /// - The log directory does not exist or is not a directory
    pub fn validate(&self) -> Result<TimeResolver, ConfigError> {
        let resolver = TimeResolver::new(&self.timezone)?;
        check_log_dir(&self.log_dir)?;
        Ok(resolver)
    }
}

impl Default for LogQueryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR, DEFAULT_TIMEZONE)
    }
}

fn check_log_dir(path: &Path) -> Result<(), ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::LogDirNotADirectory(path.to_path_buf())),
        Err(_) => Err(ConfigError::LogDirNotFound(path.to_path_buf())),
    }
}
