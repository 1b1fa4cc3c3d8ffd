//! JSON-RPC tool endpoint for Model Context Protocol clients.
//!
//! Stateless streamable-HTTP flavor: every `POST /mcp` carries one JSON-RPC message
//! and gets one JSON response. Notifications are acknowledged with `202 Accepted` and
//! no body. No sessions and no server-sent event streams.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use shared::service::{tool_definitions, ToolError};

/// Protocol revision reported when the client does not ask for one.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

const JSONRPC_VERSION: &str = "2.0";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// Creates the JSON-RPC route with application state.
pub fn mcp_routes(state: AppState) -> Router {
    Router::new()
        .route("/mcp", post(handle_message))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    /// `None` when the member is absent (a notification), `Some(Null)` for `"id": null`.
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl RpcResponse {
    fn new(id: Value, outcome: Result<Value, RpcError>) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(error) => (None, Some(error)),
        };
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
            error,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

async fn handle_message(State(state): State<AppState>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            let error = RpcError::new(PARSE_ERROR, format!("Parse error: {e}"));
            return Json(RpcResponse::new(Value::Null, Err(error))).into_response();
        }
    };

    let request = match parse_request(&message) {
        Ok(request) => request,
        Err(error) => {
            let id = message.get("id").cloned().unwrap_or(Value::Null);
            return Json(RpcResponse::new(id, Err(error))).into_response();
        }
    };

    let Some(id) = request.id else {
        tracing::debug!(method = %request.method, "Received notification");
        return StatusCode::ACCEPTED.into_response();
    };

    let outcome = dispatch(&state, &request.method, request.params).await;
    Json(RpcResponse::new(id, outcome)).into_response()
}

fn parse_request(message: &Value) -> Result<RpcRequest, RpcError> {
    if message.is_array() {
        return Err(RpcError::new(INVALID_REQUEST, "Batch requests are not supported"));
    }

    let request = RpcRequest::deserialize(message)
        .map_err(|e| RpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")))?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(RpcError::new(
            INVALID_REQUEST,
            format!("Unsupported jsonrpc version '{}'", request.jsonrpc),
        ));
    }
    Ok(request)
}

async fn dispatch(state: &AppState, method: &str, params: Value) -> Result<Value, RpcError> {
    match method {
        "initialize" => {
            let protocol_version = params
                .get("protocolVersion")
                .and_then(Value::as_str)
                .unwrap_or(PROTOCOL_VERSION);
            tracing::info!(protocol_version, "Client initialized");

            Ok(json!({
                "protocolVersion": protocol_version,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": { "name": "logscope", "version": env!("CARGO_PKG_VERSION") }
            }))
        }
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": tool_definitions() })),
        "tools/call" => call_tool(state, params).await,
        _ => {
            tracing::debug!(method, "Unknown JSON-RPC method");
            Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            ))
        }
    }
}

/// Query failures are tool results with `isError` set; bad calls are protocol errors.
async fn call_tool(state: &AppState, params: Value) -> Result<Value, RpcError> {
    let params: CallToolParams = serde_json::from_value(params)
        .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;

    match state.service().call_tool(&params.name, params.arguments).await {
        Ok(text) => Ok(tool_result(text, false)),
        Err(e @ ToolError::Query(_)) => Ok(tool_result(e.to_string(), true)),
        Err(e @ (ToolError::UnknownTool(_) | ToolError::InvalidArguments { .. })) => {
            Err(RpcError::new(INVALID_PARAMS, e.to_string()))
        }
    }
}

fn tool_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error
    })
}
