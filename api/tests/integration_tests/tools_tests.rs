//! Integration tests for the REST tool endpoints.
//!
//! Tests cover:
//! - Structured queries with every filter
//! - Source listing
//! - Raw SQL with truncation
//! - Error status codes
//! - Files written after startup

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use shared::models::{LogLevel, LogRecord};

use super::common::{post_text, seeded_app, test_app, write_records, JAN_30_21H_UTC_NS};

/// Data lines of a rendered table (after heading, blank line, header and rule).
fn table_rows(text: &str) -> Vec<&str> {
    text.lines().skip(4).collect()
}

#[tokio::test]
async fn test_query_by_date_is_newest_first() {
    let (app, _dir) = seeded_app().await;

    let (status, text) = post_text(app, "/api/v1/tools/query_logs", r#"{"date": "2026-01-30"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("Log entries: 5\n\n"));

    let rows = table_rows(&text);
    assert_eq!(rows.len(), 5);
    assert!(rows[0].starts_with("2026-01-30 14:55:00.000000"));
    assert!(rows[0].ends_with("job crashed"));
    assert!(rows[4].ends_with("request served"));
}

#[tokio::test]
async fn test_query_filters_combine() {
    let (app, _dir) = seeded_app().await;

    let (_, text) = post_text(
        app.clone(),
        "/api/v1/tools/query_logs",
        r#"{"date": "2026-01-30", "level": "error"}"#,
    )
    .await;
    assert!(text.starts_with("Log entries: 2\n\n"));

    let (_, text) = post_text(
        app.clone(),
        "/api/v1/tools/query_logs",
        r#"{"date": "2026-01-30", "level": "error", "source": "api"}"#,
    )
    .await;
    assert!(text.starts_with("Log entries: 1\n\n"));
    assert!(text.contains("lookup_user"));

    let (_, text) = post_text(
        app,
        "/api/v1/tools/query_logs",
        r#"{"date": "2026-01-30", "limit": 2}"#,
    )
    .await;
    assert!(text.starts_with("Log entries: 2\n\n"));
}

#[tokio::test]
async fn test_keyword_with_apostrophe() {
    let (app, _dir) = seeded_app().await;

    let (status, text) = post_text(
        app,
        "/api/v1/tools/query_logs",
        r#"{"date": "2026-01-30", "keyword": "o'brien"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("Log entries: 1\n\n"));
    assert!(text.contains("lookup failed for O'Brien"));
}

#[tokio::test]
async fn test_relative_window_uses_current_time() {
    let (app, dir) = seeded_app().await;
    let recent = (Utc::now() - Duration::minutes(3)).timestamp_nanos_opt().unwrap();
    let today = Utc::now().format("%Y-%m-%d").to_string();
    write_records(
        dir.path(),
        &today,
        "api",
        &[LogRecord::new(recent, LogLevel::Info, "just now")],
    );

    let (_, text) = post_text(app.clone(), "/api/v1/tools/query_logs", "{}").await;
    assert!(text.starts_with("Log entries: 1\n\n"));
    assert!(text.contains("just now"));
}

#[tokio::test]
async fn test_no_match_returns_sentinel() {
    let (app, _dir) = seeded_app().await;

    let (status, text) = post_text(
        app,
        "/api/v1/tools/query_logs",
        r#"{"date": "2026-01-31"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "No log entries found matching the criteria.");
}

#[tokio::test]
async fn test_list_log_sources() {
    let (app, _dir) = seeded_app().await;

    let (status, text) = post_text(app, "/api/v1/tools/list_log_sources", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("Log sources:\n\n"));

    let rows = table_rows(&text);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("api "));
    assert!(rows[0].contains(" 3 "));
    assert!(rows[1].starts_with("worker"));
    assert!(rows[1].contains(" 2 "));

    // Seeded at 20:30Z..20:50Z and 20:35Z..20:55Z, shown in Chicago time.
    assert!(rows[0].ends_with("2026-01-30 14:30:00.000000  2026-01-30 14:50:00.000000"));
    assert!(rows[1].ends_with("2026-01-30 14:35:00.000000  2026-01-30 14:55:00.000000"));
}

#[tokio::test]
async fn test_query_log_sql() {
    let (app, _dir) = seeded_app().await;

    let (status, text) = post_text(
        app,
        "/api/v1/tools/query_log_sql",
        r#"{"query": "SELECT level, count(*) AS n FROM logs GROUP BY level ORDER BY level"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        text,
        "Rows: 4\n\nlevel    n\n-------  -\nDEBUG    1\nERROR    2\nINFO     1\nWARNING  1"
    );
}

#[tokio::test]
async fn test_query_log_sql_text_and_truncation() {
    let (app, dir) = test_app().await;
    let records: Vec<LogRecord> = (0..250)
        .map(|i| LogRecord::new(JAN_30_21H_UTC_NS + i, LogLevel::Info, format!("line {i}")))
        .collect();
    write_records(dir.path(), "2026-01-30", "bulk", &records);

    let (status, text) = post_text(
        app.clone(),
        "/api/v1/tools/query_log_sql",
        r#"{"query": "SELECT ts, msg FROM logs ORDER BY ts"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("Rows: 250 (showing first 200)\n\n"));
    assert_eq!(table_rows(&text).len(), 200);

    let (_, text) = post_text(
        app,
        "/api/v1/tools/query_log_sql",
        r#"{"query": "SELECT count(*) AS n FROM logs"}"#,
    )
    .await;
    assert_eq!(text, "Rows: 1\n\nn\n---\n250");
}

#[tokio::test]
async fn test_error_statuses() {
    let (app, _dir) = seeded_app().await;

    let (status, text) = post_text(
        app.clone(),
        "/api/v1/tools/query_logs",
        r#"{"date": "01/30/2026"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.starts_with("Invalid date '01/30/2026'"));

    let (status, text) = post_text(
        app.clone(),
        "/api/v1/tools/query_log_sql",
        r#"{"query": "SELECT missing_column FROM logs"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.contains("missing_column"));

    let (status, _) = post_text(
        app.clone(),
        "/api/v1/tools/query_log_sql",
        r#"{"query": "DROP TABLE logs"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_text(app.clone(), "/api/v1/tools/query_logs", r#"{"minutes": 5}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_text(app, "/api/v1/tools/tail_logs", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_files_written_after_startup_are_visible() {
    let (app, dir) = test_app().await;

    let (_, text) = post_text(app.clone(), "/api/v1/tools/list_log_sources", "{}").await;
    assert_eq!(text, "No log data found.");

    write_records(
        dir.path(),
        "2026-01-30",
        "late",
        &[LogRecord::new(JAN_30_21H_UTC_NS, LogLevel::Info, "hello")],
    );

    let (_, text) = post_text(app, "/api/v1/tools/list_log_sources", "{}").await;
    assert!(text.starts_with("Log sources:\n\n"));
    assert!(text.contains("late"));
}
