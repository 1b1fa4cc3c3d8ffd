//! Logscope Shared Library
//!
//! This crate contains the log query layer used by the Logscope server and CLI:
//! it turns loose query parameters into typed predicates over a Hive-partitioned
//! NDJSON log directory, executes them with an embedded query engine, and renders
//! bounded text tables.
//!
//! # Modules
//!
//! - [`models`] - Log record, log level, and result row types
//! - [`config`] - Process-wide query configuration
//! - [`timezone`] - Epoch nanosecond and display timezone conversions
//! - [`storage`] - The partitioned `logs` view over the log directory
//! - [`query`] - Query parameters, predicate building, and execution
//! - [`render`] - Text table rendering with truncation reporting
//! - [`service`] - The callable query tools
//!
//! # Example
//!
//! ```
//! use shared::query::{PredicateBuilder, QueryLogsParams};
//! use shared::timezone::TimeResolver;
//!
//! let resolver = TimeResolver::new("America/Chicago").unwrap();
//! let params = QueryLogsParams::new().with_date("2026-01-30").with_level("error");
//! let plan = PredicateBuilder::new(&resolver)
//!     .build(&params, chrono::Utc::now())
//!     .unwrap();
//!
//! assert_eq!(plan.predicates.len(), 2);
//! assert_eq!(plan.limit, 100);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod models;
pub mod query;
pub mod render;
pub mod service;
pub mod storage;
pub mod timezone;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use datafusion;
pub use serde;
pub use serde_json;
