//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including fixture writing, test app setup, and HTTP request helpers.

#![allow(dead_code)]

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shared::config::LogQueryConfig;
use shared::models::{LogLevel, LogRecord};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// 2026-01-30T21:00:00Z, 15:00 in Chicago.
pub const JAN_30_21H_UTC_NS: i64 = 1_769_806_800_000_000_000;

/// One minute in nanoseconds.
pub const MINUTE_NS: i64 = 60 * 1_000_000_000;

/// Appends `records` to `<root>/date=<date>/source=<source>/<source>.ndjson`.
pub fn write_records(root: &Path, date: &str, source: &str, records: &[LogRecord]) {
    let dir = root.join(format!("date={date}")).join(format!("source={source}"));
    std::fs::create_dir_all(&dir).unwrap();

    let mut out = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{source}.ndjson")))
        .unwrap();
    for record in records {
        writeln!(out, "{}", serde_json::to_string(record).unwrap()).unwrap();
    }
}

/// Writes a small two-source dataset for 2026-01-30.
///
/// - `api`: 3 records, one of them an ERROR mentioning O'Brien
/// - `worker`: 2 records
pub fn seed_sample_logs(root: &Path) {
    write_records(
        root,
        "2026-01-30",
        "api",
        &[
            LogRecord::new(JAN_30_21H_UTC_NS - 30 * MINUTE_NS, LogLevel::Info, "request served")
                .with_location("api.py", 10, "handle_request")
                .with_process_id(100),
            LogRecord::new(JAN_30_21H_UTC_NS - 20 * MINUTE_NS, LogLevel::Error, "lookup failed for O'Brien")
                .with_location("api.py", 42, "lookup_user")
                .with_process_id(100),
            LogRecord::new(JAN_30_21H_UTC_NS - 10 * MINUTE_NS, LogLevel::Warning, "slow response")
                .with_location("api.py", 55, "handle_request")
                .with_process_id(101),
        ],
    );
    write_records(
        root,
        "2026-01-30",
        "worker",
        &[
            LogRecord::new(JAN_30_21H_UTC_NS - 25 * MINUTE_NS, LogLevel::Debug, "poll tick")
                .with_location("worker.py", 5, "poll"),
            LogRecord::new(JAN_30_21H_UTC_NS - 5 * MINUTE_NS, LogLevel::Error, "job crashed")
                .with_location("worker.py", 80, "run_job"),
        ],
    );
}

/// Creates a test router over a fresh, empty log directory.
///
/// The directory lives as long as the returned `TempDir`.
pub async fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::open(&LogQueryConfig::new(dir.path(), "America/Chicago"))
        .await
        .unwrap();
    (create_router(state), dir)
}

/// Creates a test router over the sample dataset.
pub async fn seeded_app() -> (Router, TempDir) {
    let (app, dir) = test_app().await;
    seed_sample_logs(dir.path());
    (app, dir)
}

/// Helper to make a POST request with JSON body and a JSON response.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, text) = post_text(app, uri, &serde_json::to_string(&body).unwrap()).await;
    let json: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with a raw body and a text response.
pub async fn post_text(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
