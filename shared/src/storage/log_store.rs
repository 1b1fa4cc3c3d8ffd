//! The `logs` view over Hive-partitioned NDJSON files.
//!
//! The view is a listing table: the directory tree is listed again on every scan, so
//! files appended after startup are visible to the next query. The record schema is
//! declared here rather than inferred, which means new record fields need a restart.

use crate::models::columns;
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::error::DataFusionError;
use datafusion::prelude::{DataFrame, NdJsonReadOptions, SessionConfig, SessionContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Name of the registered view.
pub const LOGS_VIEW: &str = "logs";

/// Extension of the log files picked up by the view.
const FILE_EXTENSION: &str = ".ndjson";

/// Errors that can occur while opening the log store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The log directory could not be resolved.
    #[error("Failed to resolve log directory {}: {source}", path.display())]
    Resolve {
        /// The configured directory.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The query engine refused to register the view.
    #[error("Failed to register 'logs' view over {}: {source}", path.display())]
    Register {
        /// The configured directory.
        path: PathBuf,
        /// The engine error.
        source: DataFusionError,
    },

    /// The log directory is gone or the view no longer resolves.
    #[error("Log directory {} is unavailable: {reason}", path.display())]
    Unavailable {
        /// The resolved directory.
        path: PathBuf,
        /// What failed.
        reason: String,
    },
}

/// Schema of a single NDJSON record (partition columns excluded).
#[must_use]
pub fn file_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::TS, DataType::Int64, true),
        Field::new(columns::LEVEL, DataType::Utf8, true),
        Field::new(columns::PID, DataType::Int64, true),
        Field::new(columns::FILE, DataType::Utf8, true),
        Field::new(columns::LINE, DataType::Int64, true),
        Field::new(columns::FUNC, DataType::Utf8, true),
        Field::new(columns::MSG, DataType::Utf8, true),
    ])
}

/// Partition columns, in directory nesting order.
#[must_use]
pub fn partition_columns() -> Vec<(String, DataType)> {
    vec![
        (columns::DATE.to_string(), DataType::Utf8),
        (columns::SOURCE.to_string(), DataType::Utf8),
    ]
}

/// Shared handle to the `logs` view.
///
/// Cloning is cheap; all clones share one engine session.
///
/// # Example
///
/// ```no_run
/// use shared::storage::LogStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LogStore::open("/tmp/app_logs").await?;
/// let batches = store.context().sql("SELECT count(*) FROM logs").await?.collect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LogStore {
    ctx: SessionContext,
    log_dir: PathBuf,
}

impl LogStore {
    /// Opens the log directory and registers the `logs` view.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be resolved or the view cannot be
    /// registered.
    pub async fn open(log_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let requested = log_dir.as_ref();
        let log_dir = std::fs::canonicalize(requested).map_err(|source| StorageError::Resolve {
            path: requested.to_path_buf(),
            source,
        })?;

        let config = SessionConfig::new().with_information_schema(true);
        let ctx = SessionContext::new_with_config(config);

        let schema = file_schema();
        let options = NdJsonReadOptions::default()
            .schema(&schema)
            .file_extension(FILE_EXTENSION)
            .table_partition_cols(partition_columns());

        ctx.register_json(LOGS_VIEW, &table_url(&log_dir), options)
            .await
            .map_err(|source| StorageError::Register {
                path: log_dir.clone(),
                source,
            })?;

        tracing::info!(log_dir = %log_dir.display(), view = LOGS_VIEW, "Registered log view");

        Ok(Self { ctx, log_dir })
    }

    /// Opens the store wrapped in an `Arc` for sharing across handlers.
    ///
    /// # Errors
    ///
    /// See [`LogStore::open`].
    pub async fn open_shared(log_dir: impl AsRef<Path>) -> Result<Arc<Self>, StorageError> {
        Ok(Arc::new(Self::open(log_dir).await?))
    }

    /// Returns the engine session with the `logs` view registered.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Returns the resolved log directory.
    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Checks that the log directory is still a directory and the view resolves.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] describing the first failure.
    pub async fn check(&self) -> Result<(), StorageError> {
        let unavailable = |reason: String| StorageError::Unavailable {
            path: self.log_dir.clone(),
            reason,
        };

        let metadata = std::fs::metadata(&self.log_dir).map_err(|e| unavailable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unavailable("not a directory".to_string()));
        }
        self.logs().await.map_err(|e| unavailable(e.to_string()))?;
        Ok(())
    }

    /// Starts a fresh scan of the `logs` view.
    ///
    /// # Errors
    ///
    /// Returns the engine error if the view cannot be resolved.
    pub async fn logs(&self) -> Result<DataFrame, DataFusionError> {
        self.ctx.table(LOGS_VIEW).await
    }
}

/// Directory URL for the listing table; the trailing slash marks it as a prefix.
fn table_url(dir: &Path) -> String {
    let path = dir.to_string_lossy();
    if path.ends_with('/') {
        path.into_owned()
    } else {
        format!("{path}/")
    }
}
