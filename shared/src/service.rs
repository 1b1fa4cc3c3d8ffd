//! The callable log query tools.
//!
//! [`LogQueryService`] is the single surface every transport goes through: the HTTP
//! routes, the JSON-RPC endpoint, and the CLI all end up in one of its three
//! operations, each of which returns rendered text.

use crate::config::{ConfigError, LogQueryConfig};
use crate::query::{
    parse_date, ListSourcesParams, PredicateBuilder, QueryError, QueryExecutor,
    QueryLogsParams, SqlParams, SQL_DISPLAY_CAP,
};
use crate::render::{render_log_rows, render_result_set, render_sources};
use crate::storage::{LogStore, StorageError};
use crate::timezone::TimeResolver;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Name of the structured query tool.
pub const QUERY_LOGS: &str = "query_logs";

/// Name of the source listing tool.
pub const LIST_LOG_SOURCES: &str = "list_log_sources";

/// Name of the raw SQL tool.
pub const QUERY_LOG_SQL: &str = "query_log_sql";

/// Errors that prevent the service from starting.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The log directory could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors returned by [`LogQueryService::call_tool`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with that name exists.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not match the tool's parameters.
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        /// The tool that was called.
        tool: String,
        /// The deserialization error.
        source: serde_json::Error,
    },

    /// The query itself failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Name, description and argument schema of a tool, as advertised to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name used in calls.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema of the arguments object.
    pub input_schema: Value,
}

/// Returns the definitions of all tools.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: QUERY_LOGS,
            description: "Query log entries newest first. Filters are combined with AND. \
                          An explicit date selects one day partition and ignores minutes_ago. \
                          Timestamps are shown in the configured display timezone.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "minutes_ago": {
                        "type": "integer",
                        "default": 60,
                        "description": "How far back to search, in minutes. Ignored when date is set."
                    },
                    "source": { "type": "string", "description": "Exact log source name." },
                    "level": {
                        "type": "string",
                        "description": "DEBUG, INFO, WARNING or ERROR, any case."
                    },
                    "keyword": {
                        "type": "string",
                        "description": "Case-insensitive substring of the message."
                    },
                    "date": { "type": "string", "description": "Day partition, YYYY-MM-DD." },
                    "limit": {
                        "type": "integer",
                        "minimum": 0,
                        "default": 100,
                        "description": "Maximum rows returned."
                    }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: LIST_LOG_SOURCES,
            description: "List log sources per day with entry counts and time ranges. \
                          Useful for discovering what exists before querying.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "Only list this day, YYYY-MM-DD."
                    }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: QUERY_LOG_SQL,
            description: "Run a read-only SQL query (DataFusion dialect) against the `logs` \
                          table (ts, level, pid, file, line, func, msg, date, source). \
                          ts is epoch nanoseconds in UTC; date and source are strings. \
                          Filter the last 15 minutes with \
                          `WHERE ts >= arrow_cast(now() - INTERVAL '15 minutes', 'Int64')`. \
                          Show local time with \
                          `arrow_cast(ts, 'Timestamp(Nanosecond, Some(\"America/Chicago\"))')`, \
                          naming the display timezone. At most 200 rows are shown.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "SQL query text." }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
        },
    ]
}

/// Runs the log query tools against one shared store.
///
/// # Example
///
/// ```no_run
/// use shared::config::LogQueryConfig;
/// use shared::query::QueryLogsParams;
/// use shared::service::LogQueryService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = LogQueryService::open(&LogQueryConfig::from_env()).await?;
/// let text = service
///     .query_logs(&QueryLogsParams::new().with_level("error").with_minutes_ago(15))
///     .await?;
/// println!("{text}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LogQueryService {
    executor: QueryExecutor,
    resolver: TimeResolver,
}

impl LogQueryService {
    /// Creates a service over an opened store.
    #[must_use]
    pub fn new(store: Arc<LogStore>, resolver: TimeResolver) -> Self {
        Self {
            executor: QueryExecutor::new(store),
            resolver,
        }
    }

    /// Validates `config` and opens its log directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the store cannot be opened.
    pub async fn open(config: &LogQueryConfig) -> Result<Self, ServiceError> {
        let resolver = config.validate()?;
        let store = LogStore::open_shared(&config.log_dir).await?;
        Ok(Self::new(store, resolver))
    }

    /// Returns the resolved log directory.
    #[must_use]
    pub fn log_dir(&self) -> &Path {
        self.executor.store().log_dir()
    }

    /// Returns the display timezone.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.resolver.timezone()
    }

    /// Checks that the log directory can still be queried.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the directory is gone or the view no
    /// longer resolves.
    pub async fn check(&self) -> Result<(), StorageError> {
        self.executor.store().check().await
    }

    /// Runs a structured query relative to the current time.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid date or a failed query.
    pub async fn query_logs(&self, params: &QueryLogsParams) -> Result<String, QueryError> {
        self.query_logs_at(params, Utc::now()).await
    }

    /// Runs a structured query with the relative window anchored at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid date or a failed query.
    pub async fn query_logs_at(
        &self,
        params: &QueryLogsParams,
        now: DateTime<Utc>,
    ) -> Result<String, QueryError> {
        let plan = PredicateBuilder::new(&self.resolver).build(params, now)?;
        tracing::debug!(%plan, "Running log query");

        let rows = self.executor.query_logs(&plan).await?;
        tracing::debug!(rows = rows.len(), "Log query finished");

        Ok(render_log_rows(&rows, &self.resolver))
    }

    /// Lists sources per day, optionally for a single date.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid date or a failed query.
    pub async fn list_log_sources(&self, params: &ListSourcesParams) -> Result<String, QueryError> {
        let date = params.date().map(parse_date).transpose()?;
        tracing::debug!(?date, "Listing log sources");

        let summaries = self.executor.list_sources(date).await?;
        Ok(render_sources(&summaries, &self.resolver))
    }

    /// Runs caller-supplied SQL against the `logs` view.
    ///
    /// # Errors
    ///
    /// Returns the engine's diagnostic if the query is rejected or fails.
    pub async fn query_log_sql(&self, params: &SqlParams) -> Result<String, QueryError> {
        tracing::debug!(query = %params.query, "Running raw SQL");

        let result = self.executor.run_sql(&params.query, SQL_DISPLAY_CAP).await?;
        tracing::debug!(
            total_rows = result.total_rows,
            shown = result.rows.len(),
            "Raw SQL finished"
        );

        Ok(render_result_set(&result))
    }

    /// Dispatches a tool call by name with JSON arguments.
    ///
    /// A `null` arguments value is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for an unknown name,
    /// [`ToolError::InvalidArguments`] if the arguments do not fit the tool, and
    /// [`ToolError::Query`] if the query fails.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let result = match name {
            QUERY_LOGS => {
                let params: QueryLogsParams = parse_arguments(name, arguments)?;
                self.query_logs(&params).await
            }
            LIST_LOG_SOURCES => {
                let params: ListSourcesParams = parse_arguments(name, arguments)?;
                self.list_log_sources(&params).await
            }
            QUERY_LOG_SQL => {
                let params: SqlParams = parse_arguments(name, arguments)?;
                self.query_log_sql(&params).await
            }
            _ => {
                tracing::warn!(tool = name, "Unknown tool requested");
                return Err(ToolError::UnknownTool(name.to_string()));
            }
        };

        result.map_err(|e| {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
            ToolError::Query(e)
        })
    }
}

fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };

    serde_json::from_value(arguments).map_err(|source| {
        tracing::warn!(tool, error = %source, "Invalid tool arguments");
        ToolError::InvalidArguments {
            tool: tool.to_string(),
            source,
        }
    })
}
