//! Query error type.

use datafusion::error::DataFusionError;
use thiserror::Error;

/// Errors surfaced to the caller of a query.
///
/// The message text is the response: engine diagnostics are passed through
/// unchanged.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The `date` parameter is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{value}' (expected YYYY-MM-DD): {reason}")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// The date parser's diagnostic.
        reason: String,
    },

    /// The relative window reaches outside the representable timestamp range.
    #[error("Time window of {minutes} minutes is out of range")]
    WindowOutOfRange {
        /// The requested window.
        minutes: i64,
    },

    /// The query engine rejected or failed the query.
    #[error("{0}")]
    Backend(#[from] DataFusionError),
}

impl From<datafusion::arrow::error::ArrowError> for QueryError {
    fn from(e: datafusion::arrow::error::ArrowError) -> Self {
        Self::Backend(DataFusionError::from(e))
    }
}
