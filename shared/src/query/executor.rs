//! Query execution against the `logs` view.
//!
//! Every call builds a fresh plan over the view, so each query sees the files on disk
//! at the time it runs. Nothing is cached between calls.

use super::error::QueryError;
use super::predicate::{LogQueryPlan, Predicate};
use crate::models::{columns, LogRow, SourceSummary};
use crate::render::ResultSet;
use crate::storage::LogStore;
use chrono::NaiveDate;
use datafusion::arrow::array::{Array, ArrayRef, AsArray};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::{DataType, Int64Type};
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::execution::context::SQLOptions;
use datafusion::functions_aggregate::expr_fn::{count, max, min};
use datafusion::logical_expr::{col, lit};
use std::sync::Arc;

const ENTRIES: &str = "entries";
const EARLIEST: &str = "earliest";
const LATEST: &str = "latest";

/// Runs structured plans, source listings and raw SQL against a shared [`LogStore`].
///
/// The executor holds no mutable state and can be shared across tasks.
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<LogStore>,
}

impl QueryExecutor {
    /// Creates an executor over `store`.
    #[must_use]
    pub fn new(store: Arc<LogStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Runs a structured plan: filter, sort, limit, then project the display columns.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Backend`] with the engine's diagnostic on failure.
    pub async fn query_logs(&self, plan: &LogQueryPlan) -> Result<Vec<LogRow>, QueryError> {
        let mut df = self.store.logs().await?;
        if let Some(filter) = plan.filter_expr() {
            df = df.filter(filter)?;
        }

        let batches = df
            .sort(plan.sort.sort_exprs())?
            .limit(0, Some(plan.limit))?
            .select(vec![
                col(columns::TS),
                col(columns::LEVEL),
                col(columns::SOURCE),
                col(columns::FUNC),
                col(columns::MSG),
            ])?
            .collect()
            .await?;

        let mut rows = Vec::with_capacity(plan.limit.min(1024));
        for batch in &batches {
            rows.extend(log_rows(batch)?);
        }
        Ok(rows)
    }

    /// Counts records and their time span per `(source, date)` partition.
    ///
    /// Rows are ordered newest date first, then by descending record count.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Backend`] with the engine's diagnostic on failure.
    pub async fn list_sources(&self, date: Option<NaiveDate>) -> Result<Vec<SourceSummary>, QueryError> {
        let mut df = self.store.logs().await?;
        if let Some(date) = date {
            df = df.filter(Predicate::DateEquals(date).to_expr())?;
        }

        let batches = df
            .aggregate(
                vec![col(columns::SOURCE), col(columns::DATE)],
                vec![
                    count(lit(1)).alias(ENTRIES),
                    min(col(columns::TS)).alias(EARLIEST),
                    max(col(columns::TS)).alias(LATEST),
                ],
            )?
            .sort(vec![
                col(columns::DATE).sort(false, false),
                col(ENTRIES).sort(false, false),
                col(columns::SOURCE).sort(true, false),
            ])?
            .collect()
            .await?;

        let mut summaries = Vec::new();
        for batch in &batches {
            summaries.extend(source_summaries(batch)?);
        }
        Ok(summaries)
    }

    /// Runs caller-supplied SQL against the `logs` view.
    ///
    /// Only queries are accepted; DDL, DML and engine statements are refused by the
    /// engine. The result keeps at most `max_rows` formatted rows alongside the true
    /// row count.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Backend`] with the engine's diagnostic on failure.
    pub async fn run_sql(&self, sql: &str, max_rows: usize) -> Result<ResultSet, QueryError> {
        let options = SQLOptions::new()
            .with_allow_ddl(false)
            .with_allow_dml(false)
            .with_allow_statements(false);

        let df = self.store.context().sql_with_options(sql, options).await?;
        let column_names = df
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let batches = df.collect().await?;

        Ok(ResultSet::from_batches(column_names, &batches, max_rows)?)
    }
}

fn log_rows(batch: &RecordBatch) -> Result<Vec<LogRow>, ArrowError> {
    let ts = int_values(batch.column(0))?;
    let level = text_values(batch.column(1))?;
    let source = text_values(batch.column(2))?;
    let function = text_values(batch.column(3))?;
    let message = text_values(batch.column(4))?;

    Ok((0..batch.num_rows())
        .map(|i| LogRow {
            timestamp_ns: ts[i],
            level: level[i].clone().unwrap_or_default(),
            source: source[i].clone().unwrap_or_default(),
            function: function[i].clone().unwrap_or_default(),
            message: message[i].clone().unwrap_or_default(),
        })
        .collect())
}

fn source_summaries(batch: &RecordBatch) -> Result<Vec<SourceSummary>, ArrowError> {
    let source = text_values(batch.column(0))?;
    let date = text_values(batch.column(1))?;
    let entries = int_values(batch.column(2))?;
    let earliest = int_values(batch.column(3))?;
    let latest = int_values(batch.column(4))?;

    Ok((0..batch.num_rows())
        .map(|i| SourceSummary {
            source: source[i].clone().unwrap_or_default(),
            date: date[i].clone().unwrap_or_default(),
            entries: entries[i].unwrap_or(0),
            earliest_ns: earliest[i],
            latest_ns: latest[i],
        })
        .collect())
}

/// Reads a column as optional strings, whatever its string encoding.
fn text_values(array: &ArrayRef) -> Result<Vec<Option<String>>, ArrowError> {
    let utf8 = cast(array, &DataType::Utf8)?;
    Ok(utf8
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Reads a column as optional `i64` values.
fn int_values(array: &ArrayRef) -> Result<Vec<Option<i64>>, ArrowError> {
    let ints = cast(array, &DataType::Int64)?;
    let ints = ints.as_primitive::<Int64Type>();
    Ok((0..ints.len())
        .map(|i| ints.is_valid(i).then(|| ints.value(i)))
        .collect())
}
