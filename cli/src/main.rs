//! Logscope CLI
//!
//! Runs the log query tools locally against a partitioned NDJSON log directory.
//!
//! # Usage
//!
//! ```bash
//! logscope --help
//! logscope query --level error --minutes-ago 15
//! logscope query --date 2026-01-30 --source api --keyword timeout
//! logscope sources --date 2026-01-30
//! logscope sql "SELECT level, count(*) FROM logs GROUP BY level"
//! ```

#![deny(unsafe_code)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use shared::config::{LogQueryConfig, DEFAULT_LOG_DIR, DEFAULT_TIMEZONE};
use shared::query::{ListSourcesParams, QueryLogsParams, SqlParams, DEFAULT_LIMIT, DEFAULT_MINUTES_AGO};
use shared::service::{tool_definitions, LogQueryService};
use std::path::PathBuf;

/// Logscope CLI - query partitioned NDJSON logs
#[derive(Parser)]
#[command(name = "logscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the date=.../source=.../*.ndjson tree
    #[arg(long, global = true, env = "LOGSCOPE_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// IANA timezone used to display timestamps
    #[arg(long, global = true, env = "LOGSCOPE_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query log entries, newest first
    Query {
        /// How far back to search, in minutes (ignored with --date)
        #[arg(short, long, default_value_t = DEFAULT_MINUTES_AGO)]
        minutes_ago: i64,

        /// Exact log source name
        #[arg(short, long)]
        source: Option<String>,

        /// Level name, any case
        #[arg(short, long)]
        level: Option<String>,

        /// Case-insensitive substring of the message
        #[arg(short, long)]
        keyword: Option<String>,

        /// Day partition, YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,

        /// Maximum rows returned
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// List log sources with entry counts and time ranges
    Sources {
        /// Only list this day, YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Run a read-only SQL query against the `logs` table
    Sql {
        /// SQL query text
        query: String,
    },

    /// Print the tool definitions as JSON
    Tools,
}

impl Commands {
    async fn run(self, service: &LogQueryService) -> anyhow::Result<String> {
        let text = match self {
            Self::Query {
                minutes_ago,
                source,
                level,
                keyword,
                date,
                limit,
            } => {
                let params = QueryLogsParams {
                    minutes_ago,
                    source,
                    level,
                    keyword,
                    date,
                    limit,
                };
                service.query_logs(&params).await?
            }
            Self::Sources { date } => {
                service
                    .list_log_sources(&ListSourcesParams { date })
                    .await?
            }
            Self::Sql { query } => service.query_log_sql(&SqlParams { query }).await?,
            Self::Tools => serde_json::to_string_pretty(&tool_definitions())?,
        };
        Ok(text)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if matches!(cli.command, Commands::Tools) {
        println!("{}", serde_json::to_string_pretty(&tool_definitions())?);
        return Ok(());
    }

    let config = LogQueryConfig::new(cli.log_dir, cli.timezone);
    let service = LogQueryService::open(&config)
        .await
        .with_context(|| format!("Failed to open log directory {}", config.log_dir.display()))?;

    let text = cli.command.run(&service).await?;
    println!("{text}");

    Ok(())
}
