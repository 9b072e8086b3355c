//! Health check endpoint.

use axum::{extract::State, Json};
use telemetry::metrics;
use worker::Phase;

use crate::response::{EnvironmentFlags, HealthResponse};
use crate::state::AppState;

/// GET /health - liveness plus configuration presence flags.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let worker_running = state.lifecycle.phase() == Phase::Running;

    Json(HealthResponse {
        status: "healthy".to_string(),
        api_running: true,
        worker_running,
        environment: EnvironmentFlags {
            provider_token_configured: state.provider_configured,
            llm_key_configured: state.llm_configured,
        },
        metrics: metrics().snapshot(),
    })
}
