//! Text rendering of query results.
//!
//! Every operation answers with plain text: a heading, a blank line, and a table whose
//! columns are left-aligned and separated by two spaces. Empty results render as a
//! fixed sentence instead of an empty table.

use crate::models::{LogRow, SourceSummary};
use crate::timezone::TimeResolver;
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::util::display::{ArrayFormatter, FormatOptions};

/// Rendered when a structured query matches nothing.
pub const NO_LOG_ENTRIES: &str = "No log entries found matching the criteria.";

/// Rendered when the source listing is empty.
pub const NO_LOG_DATA: &str = "No log data found.";

/// Rendered when a raw SQL query returns no rows.
pub const NO_RESULTS: &str = "No results returned.";

const NULL_TEXT: &str = "NULL";

const LOG_COLUMNS: [&str; 5] = ["ts_local", "level", "source", "func", "msg"];
const SOURCE_COLUMNS: [&str; 5] = ["source", "date", "entries", "earliest", "latest"];

/// Tabular result of a raw SQL query, already formatted as strings.
///
/// `rows` may hold only a prefix of the result; `total_rows` is always the full count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Output column names.
    pub columns: Vec<String>,
    /// Formatted rows, at most the display cap.
    pub rows: Vec<Vec<String>>,
    /// Number of rows the query produced.
    pub total_rows: usize,
}

impl ResultSet {
    /// Formats up to `max_rows` rows of `batches`, counting all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if a column type has no display formatter.
    pub fn from_batches(
        columns: Vec<String>,
        batches: &[RecordBatch],
        max_rows: usize,
    ) -> Result<Self, ArrowError> {
        let total_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        let options = FormatOptions::default().with_null(NULL_TEXT);

        let mut rows = Vec::with_capacity(total_rows.min(max_rows));
        'batches: for batch in batches {
            if rows.len() >= max_rows {
                break;
            }
            let formatters = batch
                .columns()
                .iter()
                .map(|array| ArrayFormatter::try_new(array.as_ref(), &options))
                .collect::<Result<Vec<_>, _>>()?;

            for row in 0..batch.num_rows() {
                if rows.len() >= max_rows {
                    break 'batches;
                }
                rows.push(formatters.iter().map(|f| f.value(row).to_string()).collect());
            }
        }

        Ok(Self {
            columns,
            rows,
            total_rows,
        })
    }

    /// Whether the query produced no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    /// Whether some rows were dropped for display.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }
}

/// Renders structured query results with timestamps in the display timezone.
#[must_use]
pub fn render_log_rows(rows: &[LogRow], resolver: &TimeResolver) -> String {
    if rows.is_empty() {
        return NO_LOG_ENTRIES.to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                display_ts(row.timestamp_ns, resolver),
                row.level.clone(),
                row.source.clone(),
                row.function.clone(),
                row.message.clone(),
            ]
        })
        .collect();

    format!("Log entries: {}\n\n{}", rows.len(), table(&LOG_COLUMNS, &cells))
}

/// Renders the source listing.
#[must_use]
pub fn render_sources(summaries: &[SourceSummary], resolver: &TimeResolver) -> String {
    if summaries.is_empty() {
        return NO_LOG_DATA.to_string();
    }

    let cells: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.source.clone(),
                s.date.clone(),
                s.entries.to_string(),
                display_ts(s.earliest_ns, resolver),
                display_ts(s.latest_ns, resolver),
            ]
        })
        .collect();

    format!("Log sources:\n\n{}", table(&SOURCE_COLUMNS, &cells))
}

/// Renders a raw SQL result, noting when only a prefix is shown.
#[must_use]
pub fn render_result_set(result: &ResultSet) -> String {
    if result.is_empty() {
        return NO_RESULTS.to_string();
    }

    let heading = if result.is_truncated() {
        format!(
            "Rows: {} (showing first {})",
            result.total_rows,
            result.rows.len()
        )
    } else {
        format!("Rows: {}", result.total_rows)
    };

    let columns: Vec<&str> = result.columns.iter().map(String::as_str).collect();
    format!("{heading}\n\n{}", table(&columns, &result.rows))
}

fn display_ts(ts: Option<i64>, resolver: &TimeResolver) -> String {
    ts.map_or_else(|| NULL_TEXT.to_string(), |ts| resolver.display(ts))
}

/// Lays out `rows` under `columns`, padding every cell to its column width.
fn table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(columns.iter().copied(), &widths));
    lines.push(line(widths.iter().map(|w| "-".repeat(*w)), &widths));
    for row in rows {
        lines.push(line(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn line<S: AsRef<str>>(cells: impl Iterator<Item = S>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    padded.join("  ").trim_end().to_string()
}
