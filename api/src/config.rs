//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::LogQueryConfig;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8001;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `LOGSCOPE_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `LOGSCOPE_PORT`: The port to listen on (default: 8001)
/// - `LOGSCOPE_LOG_DIR` and `LOGSCOPE_TIMEZONE`: see [`LogQueryConfig`]
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Log directory and display timezone.
    pub log_query: LogQueryConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOGSCOPE_PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOGSCOPE_PORT` is set but is not a valid port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("LOGSCOPE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup("LOGSCOPE_PORT")
            .map(|p| {
                p.parse::<u16>()
                    .with_context(|| format!("Invalid LOGSCOPE_PORT '{p}'"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            host,
            port,
            log_query: LogQueryConfig::from_lookup(lookup),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_query: LogQueryConfig::default(),
        }
    }
}
