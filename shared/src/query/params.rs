//! Per-call query parameters and their defaults.

use serde::{Deserialize, Serialize};

/// Default relative window, in minutes.
pub const DEFAULT_MINUTES_AGO: i64 = 60;

/// Default row limit of the structured query.
pub const DEFAULT_LIMIT: usize = 100;

/// Maximum number of rows rendered for a raw SQL query.
pub const SQL_DISPLAY_CAP: usize = 200;

/// Parameters of a structured log query.
///
/// Every field is optional on the wire; missing fields take the documented defaults.
/// Empty strings are treated the same as missing values.
///
/// # Example
///
/// ```
/// use shared::query::{QueryLogsParams, TimeSelection};
///
/// let params: QueryLogsParams = serde_json::from_str(r#"{"source": "web"}"#).unwrap();
/// assert_eq!(params.minutes_ago, 60);
/// assert_eq!(params.limit, 100);
/// assert_eq!(params.time_selection(), TimeSelection::Relative { minutes_ago: 60 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryLogsParams {
    /// How far back to search, in minutes. Ignored when `date` is set.
    pub minutes_ago: i64,

    /// Exact source name (partition filter).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Level name, matched case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Case-insensitive substring of the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    /// Calendar date partition, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Maximum rows returned.
    pub limit: usize,
}

/// Which time filter a structured query applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSelection<'a> {
    /// A single date partition.
    Date(&'a str),
    /// Records newer than `minutes_ago` minutes.
    Relative {
        /// Window size in minutes.
        minutes_ago: i64,
    },
}

impl QueryLogsParams {
    /// Creates parameters with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relative window.
    #[must_use]
    pub fn with_minutes_ago(mut self, minutes: i64) -> Self {
        self.minutes_ago = minutes;
        self
    }

    /// Sets the source filter.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the level filter.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Sets the message keyword filter.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Sets the date partition.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Source filter, if set and non-empty.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        non_empty(self.source.as_deref())
    }

    /// Level filter, if set and non-empty.
    #[must_use]
    pub fn level(&self) -> Option<&str> {
        non_empty(self.level.as_deref())
    }

    /// Keyword filter, if set and non-empty.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        non_empty(self.keyword.as_deref())
    }

    /// Date partition, if set and non-empty.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        non_empty(self.date.as_deref())
    }

    /// Returns the active time selection; an explicit date wins over the window.
    #[must_use]
    pub fn time_selection(&self) -> TimeSelection<'_> {
        match self.date() {
            Some(date) => TimeSelection::Date(date),
            None => TimeSelection::Relative {
                minutes_ago: self.minutes_ago,
            },
        }
    }
}

impl Default for QueryLogsParams {
    fn default() -> Self {
        Self {
            minutes_ago: DEFAULT_MINUTES_AGO,
            source: None,
            level: None,
            keyword: None,
            date: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Parameters of the source listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListSourcesParams {
    /// Restrict the listing to one date partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ListSourcesParams {
    /// Date partition, if set and non-empty.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        non_empty(self.date.as_deref())
    }
}

/// Parameters of a raw SQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlParams {
    /// SQL text run against the `logs` view.
    pub query: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
