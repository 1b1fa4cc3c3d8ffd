//! Integration tests for the JSON-RPC endpoint.
//!
//! Tests cover:
//! - The initialize handshake and notifications
//! - Tool listing and tool calls
//! - Tool failures reported as results

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{post_json, seeded_app, test_app};

fn call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

fn result_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_handshake() {
    let (app, _dir) = test_app().await;

    let (status, response) = post_json(
        app.clone(),
        "/mcp",
        json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": api::PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 0);
    assert_eq!(response["result"]["protocolVersion"], api::PROTOCOL_VERSION);

    let (status, _) = post_json(
        app.clone(),
        "/mcp",
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, response) =
        post_json(app, "/mcp", json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_tools_list() {
    let (app, _dir) = test_app().await;

    let (_, response) = post_json(
        app,
        "/mcp",
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    )
    .await;

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 3);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    assert!(tools.iter().all(|t| t["description"].is_string()));
}

#[tokio::test]
async fn test_tools_call() {
    let (app, _dir) = seeded_app().await;

    let (_, response) = post_json(
        app.clone(),
        "/mcp",
        call(2, "query_logs", json!({"date": "2026-01-30", "source": "worker"})),
    )
    .await;
    assert_eq!(response["id"], 2);
    assert_eq!(response["result"]["isError"], false);
    assert!(result_text(&response).starts_with("Log entries: 2\n\n"));

    let (_, response) = post_json(
        app.clone(),
        "/mcp",
        call(3, "list_log_sources", json!({"date": "2026-01-30"})),
    )
    .await;
    assert!(result_text(&response).starts_with("Log sources:\n\n"));

    let (_, response) = post_json(
        app,
        "/mcp",
        call(4, "query_log_sql", json!({"query": "SELECT DISTINCT source FROM logs ORDER BY source"})),
    )
    .await;
    assert!(result_text(&response).starts_with("Rows: 2\n\n"));
}

#[tokio::test]
async fn test_tool_failures_are_results() {
    let (app, _dir) = seeded_app().await;

    let (status, response) = post_json(
        app.clone(),
        "/mcp",
        call(5, "query_logs", json!({"date": "2026-02-30"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"]["isError"], true);
    assert!(result_text(&response).starts_with("Invalid date '2026-02-30'"));

    let (_, response) = post_json(app.clone(), "/mcp", call(6, "no_such_tool", json!({}))).await;
    assert_eq!(response["error"]["code"], -32602);

    let (_, response) = post_json(
        app,
        "/mcp",
        call(7, "query_logs", json!({"limit": -5})),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
}
