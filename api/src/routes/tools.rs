//! REST tool endpoints.
//!
//! `POST /api/v1/tools/{name}` takes the tool's arguments as a JSON object and answers
//! with the rendered text. `GET /api/v1/tools` lists the available tools.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use shared::service::{tool_definitions, ToolDefinition, ToolError};

/// Creates the tool routes with application state.
pub fn tool_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/tools", get(list_tools))
        .route("/api/v1/tools/{name}", post(call_tool))
        .with_state(state)
}

async fn list_tools() -> Json<Vec<ToolDefinition>> {
    Json(tool_definitions())
}

/// Runs one tool. An empty body means no arguments.
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> (StatusCode, String) {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(tool = %name, error = %e, "Rejected malformed tool arguments");
                return (StatusCode::BAD_REQUEST, format!("Malformed JSON body: {e}"));
            }
        }
    };

    match state.service().call_tool(&name, arguments).await {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            let status = match e {
                ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
                ToolError::InvalidArguments { .. } | ToolError::Query(_) => {
                    StatusCode::BAD_REQUEST
                }
            };
            (status, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use shared::config::LogQueryConfig;
    use tower::ServiceExt;

    async fn create_test_router() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(&LogQueryConfig::new(dir.path(), "UTC"))
            .await
            .unwrap();
        (tool_routes(state), dir)
    }

    async fn post_text(app: Router, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(
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
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_call_tool_returns_plain_text() {
        let (app, _dir) = create_test_router().await;

        let (status, content_type, body) =
            post_text(app, "/api/v1/tools/list_log_sources", "{}").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.is_some_and(|ct| ct.starts_with("text/plain")));
        assert_eq!(body, "No log data found.");
    }

    #[tokio::test]
    async fn test_empty_body_means_no_arguments() {
        let (app, _dir) = create_test_router().await;

        let (status, _, body) = post_text(app, "/api/v1/tools/query_logs", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "No log entries found matching the criteria.");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_404() {
        let (app, _dir) = create_test_router().await;

        let (status, _, body) = post_text(app, "/api/v1/tools/delete_logs", "{}").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Unknown tool: delete_logs");
    }

    #[tokio::test]
    async fn test_bad_arguments_are_400() {
        let (app, _dir) = create_test_router().await;

        let (status, _, body) = post_text(app.clone(), "/api/v1/tools/query_logs", "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("Malformed JSON body"));

        let (status, _, body) =
            post_text(app, "/api/v1/tools/query_logs", r#"{"date": "yesterday"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("Invalid date 'yesterday'"));
    }

    #[tokio::test]
    async fn test_list_tools() {
        let (app, _dir) = create_test_router().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/tools")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let tools: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tools.as_array().unwrap().len(), 3);
        assert_eq!(tools[0]["name"], "query_logs");
    }
}
