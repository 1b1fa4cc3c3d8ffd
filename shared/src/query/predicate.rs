//! Predicate building for structured log queries.
//!
//! Parameters become typed [`Predicate`] values. Each predicate converts straight
//! into an engine expression with its value as a literal, so no user input is ever
//! spliced into query text.

use super::error::QueryError;
use super::params::{QueryLogsParams, TimeSelection};
use crate::models::{columns, LogLevel};
use crate::timezone::TimeResolver;
use chrono::{DateTime, NaiveDate, Utc};
use datafusion::logical_expr::{col, lit, Expr, SortExpr};
use std::fmt;

/// Format of the `date` partition values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single filter over the `logs` view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `date = <day>`, prunes whole date partitions.
    DateEquals(NaiveDate),
    /// `ts >= <epoch ns>`.
    TimestampAtLeast(i64),
    /// `source = <name>`, prunes whole source partitions.
    SourceEquals(String),
    /// `level = <LEVEL>`.
    LevelEquals(String),
    /// Case-insensitive substring match on `msg`.
    MessageContains(String),
}

impl Predicate {
    /// Whether the predicate only touches partition columns.
    #[must_use]
    pub fn is_partition_filter(&self) -> bool {
        matches!(self, Self::DateEquals(_) | Self::SourceEquals(_))
    }

    /// Converts the predicate into an engine expression.
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::DateEquals(date) => col(columns::DATE).eq(lit(date.format(DATE_FORMAT).to_string())),
            Self::TimestampAtLeast(ns) => col(columns::TS).gt_eq(lit(*ns)),
            Self::SourceEquals(source) => col(columns::SOURCE).eq(lit(source.as_str())),
            Self::LevelEquals(level) => col(columns::LEVEL).eq(lit(level.as_str())),
            Self::MessageContains(keyword) => {
                col(columns::MSG).ilike(lit(format!("%{}%", escape_like(keyword))))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateEquals(date) => write!(f, "{} = '{}'", columns::DATE, date.format(DATE_FORMAT)),
            Self::TimestampAtLeast(ns) => write!(f, "{} >= {ns}", columns::TS),
            Self::SourceEquals(source) => write!(f, "{} = '{}'", columns::SOURCE, quote(source)),
            Self::LevelEquals(level) => write!(f, "{} = '{}'", columns::LEVEL, quote(level)),
            Self::MessageContains(keyword) => {
                write!(f, "{} ILIKE '%{}%'", columns::MSG, quote(&escape_like(keyword)))
            }
        }
    }
}

/// Result ordering of a structured query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first; ties broken by source, pid and line.
    #[default]
    TimestampDesc,
}

impl SortKey {
    /// Engine sort expressions, primary key first.
    #[must_use]
    pub fn sort_exprs(self) -> Vec<SortExpr> {
        match self {
            Self::TimestampDesc => vec![
                col(columns::TS).sort(false, false),
                col(columns::SOURCE).sort(true, false),
                col(columns::PID).sort(true, false),
                col(columns::LINE).sort(true, false),
            ],
        }
    }
}

/// A structured query ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQueryPlan {
    /// Conjunction of filters, partition filters first.
    pub predicates: Vec<Predicate>,
    /// Result ordering.
    pub sort: SortKey,
    /// Maximum rows returned.
    pub limit: usize,
}

impl LogQueryPlan {
    /// ANDs all predicates into one expression, `None` when there are none.
    #[must_use]
    pub fn filter_expr(&self) -> Option<Expr> {
        self.predicates.iter().map(Predicate::to_expr).reduce(Expr::and)
    }
}

impl fmt::Display for LogQueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.predicates.iter().map(ToString::to_string).collect();
        if !clauses.is_empty() {
            write!(f, "WHERE {} ", clauses.join(" AND "))?;
        }
        match self.sort {
            SortKey::TimestampDesc => write!(f, "ORDER BY {} DESC ", columns::TS)?,
        }
        write!(f, "LIMIT {}", self.limit)
    }
}

/// Turns [`QueryLogsParams`] into a [`LogQueryPlan`].
#[derive(Debug, Clone, Copy)]
pub struct PredicateBuilder<'a> {
    resolver: &'a TimeResolver,
}

impl<'a> PredicateBuilder<'a> {
    /// Creates a builder that anchors relative windows with `resolver`.
    #[must_use]
    pub fn new(resolver: &'a TimeResolver) -> Self {
        Self { resolver }
    }

    /// Builds the plan for `params`, with relative windows ending at `now`.
    ///
    /// Unknown level names are not rejected; they are uppercased and matched as
    /// given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `date` is not a `YYYY-MM-DD` date
    /// - the relative window start is out of range
    pub fn build(&self, params: &QueryLogsParams, now: DateTime<Utc>) -> Result<LogQueryPlan, QueryError> {
        let mut predicates = Vec::with_capacity(4);

        match params.time_selection() {
            TimeSelection::Date(date) => predicates.push(Predicate::DateEquals(parse_date(date)?)),
            TimeSelection::Relative { minutes_ago } => {
                let start = self.resolver.window_start_ns(now, minutes_ago)?;
                predicates.push(Predicate::TimestampAtLeast(start));
            }
        }

        if let Some(source) = params.source() {
            predicates.push(Predicate::SourceEquals(source.to_string()));
        }

        if let Some(level) = params.level() {
            let level = level.to_uppercase();
            if level.parse::<LogLevel>().is_err() {
                tracing::debug!(%level, "Level is not a known severity, matching as given");
            }
            predicates.push(Predicate::LevelEquals(level));
        }

        if let Some(keyword) = params.keyword() {
            predicates.push(Predicate::MessageContains(keyword.to_string()));
        }

        // Stable: keeps rule order within each group.
        predicates.sort_by_key(|p| !p.is_partition_filter());

        Ok(LogQueryPlan {
            predicates,
            sort: SortKey::TimestampDesc,
            limit: params.limit,
        })
    }
}

/// Parses a `YYYY-MM-DD` date parameter.
///
/// # Errors
///
/// Returns [`QueryError::InvalidDate`] carrying the parser's diagnostic.
pub fn parse_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| QueryError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Escapes LIKE metacharacters so the keyword matches literally.
///
/// ```
/// use shared::query::escape_like;
///
/// assert_eq!(escape_like("100%_done"), r"100\%\_done");
/// assert_eq!(escape_like("O'Brien"), "O'Brien");
/// ```
#[must_use]
pub fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn quote(value: &str) -> String {
    value.replace('\'', "''")
}
