//! Configuration module for Logscope.
//!
//! This module contains the process-wide settings the query layer needs: where the
//! partitioned log directory lives and which timezone timestamps are displayed in.

pub mod log_query;

pub use log_query::{ConfigError, LogQueryConfig, DEFAULT_LOG_DIR, DEFAULT_TIMEZONE};
