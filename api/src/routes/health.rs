//! Health check endpoint.
//!
//! Reports whether the log directory can still be queried, along with the directory
//! and display timezone the server was started with.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` when the `logs` view resolves, `unhealthy` otherwise.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Resolved log directory.
    pub log_dir: String,
    /// Display timezone.
    pub timezone: String,
    /// Why the check failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let service = state.service();
    let check = service.check().await;

    let (code, status, error) = match check {
        Ok(()) => (StatusCode::OK, "healthy", None),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(e.to_string()))
        }
    };

    let response = HealthResponse {
        status,
        service: "logscope-api",
        version: env!("CARGO_PKG_VERSION"),
        log_dir: service.log_dir().display().to_string(),
        timezone: service.timezone().to_string(),
        error,
    };
    (code, Json(response))
}
