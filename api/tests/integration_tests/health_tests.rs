//! Integration tests for health check and tool discovery.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _dir) = test_app().await;

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "logscope-api");
    assert_eq!(response["timezone"], "America/Chicago");
    assert!(response["log_dir"].is_string());
}

#[tokio::test]
async fn test_tool_listing() {
    let (app, _dir) = test_app().await;

    let (status, response) = get(app, "/api/v1/tools").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = response
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["query_logs", "list_log_sources", "query_log_sql"]);
    assert_eq!(response[0]["inputSchema"]["type"], "object");
}
