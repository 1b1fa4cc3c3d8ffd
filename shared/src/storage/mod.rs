//! Storage access for the partitioned log directory.
//!
//! The `LogStore` owns the query engine session and the `logs` view registered over
//! the `date=YYYY-MM-DD/source=<name>/*.ndjson` tree. It is created once per process
//! and shared read-only by every query.

pub mod log_store;

pub use log_store::{file_schema, partition_columns, LogStore, StorageError, LOGS_VIEW};
