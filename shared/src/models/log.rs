//! Log data model.
//!
//! Defines the `LogRecord` written one-per-line into the NDJSON files, and the rows
//! the query executor hands to the renderer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Column names of the `logs` view.
///
/// `date` and `source` come from the directory layout, the rest from the NDJSON
/// records themselves.
pub mod columns {
    /// Epoch nanoseconds.
    pub const TS: &str = "ts";
    /// Severity level.
    pub const LEVEL: &str = "level";
    /// Process id of the writer.
    pub const PID: &str = "pid";
    /// Source file of the log call.
    pub const FILE: &str = "file";
    /// Source line of the log call.
    pub const LINE: &str = "line";
    /// Function that emitted the record.
    pub const FUNC: &str = "func";
    /// Free-text message.
    pub const MSG: &str = "msg";
    /// Partition: calendar date (`YYYY-MM-DD`).
    pub const DATE: &str = "date";
    /// Partition: log source name.
    pub const SOURCE: &str = "source";
}

/// Log severity level.
///
/// Levels are stored uppercase. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational messages.
    Info,
    /// Warning conditions.
    Warning,
    /// Error conditions.
    Error,
}

impl LogLevel {
    /// All known levels, least severe first.
    pub const ALL: [Self; 4] = [Self::Debug, Self::Info, Self::Warning, Self::Error];

    /// Returns the level as stored at rest.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A level name that matches none of the known levels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown log level: '{0}'")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| UnknownLogLevel(s.to_string()))
    }
}

/// A single log event as written to an NDJSON file.
///
/// Field names follow the on-disk keys (`ts`, `pid`, `func`, `msg`). The `source`
/// is not part of the record: it lives in the `source=` directory segment.
///
/// # Example
///
/// ```
/// use shared::models::{LogLevel, LogRecord};
///
/// let record = LogRecord::new(1_769_806_800_000_000_000, LogLevel::Error, "timeout talking to db")
///     .with_location("worker.py", 42, "poll");
///
/// let line = serde_json::to_string(&record).unwrap();
/// assert!(line.contains("\"ts\":1769806800000000000"));
/// assert!(line.contains("\"level\":\"ERROR\""));
/// assert!(line.contains("\"func\":\"poll\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Epoch nanoseconds.
    #[serde(rename = "ts")]
    pub timestamp_ns: i64,

    /// Severity level, uppercase at rest.
    pub level: String,

    /// Process id of the writer.
    #[serde(rename = "pid", default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<i64>,

    /// Source file of the log call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Source line of the log call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,

    /// Function that emitted the record.
    #[serde(rename = "func", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Free-text message.
    #[serde(rename = "msg")]
    pub message: String,
}

impl LogRecord {
    /// Creates a record with the given timestamp, level and message.
    #[must_use]
    pub fn new(timestamp_ns: i64, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp_ns,
            level: level.as_str().to_string(),
            process_id: None,
            file: None,
            line: None,
            function: None,
            message: message.into(),
        }
    }

    /// Sets the call-site information.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: i64, function: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.function = Some(function.into());
        self
    }

    /// Sets the process id.
    #[must_use]
    pub fn with_process_id(mut self, pid: i64) -> Self {
        self.process_id = Some(pid);
        self
    }
}

/// A row returned by the structured log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// Epoch nanoseconds, `None` if the record had no usable `ts`.
    pub timestamp_ns: Option<i64>,
    /// Severity level as stored.
    pub level: String,
    /// Partition source.
    pub source: String,
    /// Emitting function.
    pub function: String,
    /// Message text.
    pub message: String,
}

/// Record count and time span of one `(source, date)` partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    /// Partition source.
    pub source: String,
    /// Partition date.
    pub date: String,
    /// Number of records.
    pub entries: i64,
    /// Smallest `ts` in the partition.
    pub earliest_ns: Option<i64>,
    /// Largest `ts` in the partition.
    pub latest_ns: Option<i64>,
}
