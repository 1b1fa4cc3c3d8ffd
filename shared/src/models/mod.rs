//! Data models for the Logscope query layer.
//!
//! This module contains the on-disk log record shape and the typed rows produced by
//! the query executor.

pub mod log;

pub use log::{columns, LogLevel, LogRecord, LogRow, SourceSummary, UnknownLogLevel};
