//! Health check handlers.

use axum::{Json, extract::State};

use crate::api::state::AppState;
use crate::domain::{ApiResponse, HealthResponse};

/// Liveness check: always returns 200 if the service is running.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        registrar: state.registrar.backend_name().to_string(),
    }))
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<AppState>) -> String {
    let mut output = String::new();

    output.push_str("# HELP deveui_up Whether the service is up\n");
    output.push_str("# TYPE deveui_up gauge\n");
    output.push_str("deveui_up 1\n");

    if let Some(handle) = &state.metrics {
        output.push_str(&handle.render());
    }

    output
}
