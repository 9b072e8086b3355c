//! Worker lifecycle endpoints.

use axum::{extract::State, Json};
use tracing::info;
use worker::StopOutcome;

use crate::response::{ApiError, LifecycleResponse, StatusResponse};
use crate::state::AppState;

/// GET or POST /start - idempotent worker start.
///
/// Blocks until the worker signals readiness, so a 200 means the worker
/// verified its provider connection.
pub async fn start_handler(
    State(state): State<AppState>,
) -> Result<Json<LifecycleResponse>, ApiError> {
    state.lifecycle.start().await?;
    info!("worker started via API");

    Ok(Json(LifecycleResponse {
        status: "success".to_string(),
        message: "ingestion worker started".to_string(),
        phase: state.lifecycle.phase(),
    }))
}

/// POST /stop - idempotent worker stop.
pub async fn stop_handler(
    State(state): State<AppState>,
) -> Result<Json<LifecycleResponse>, ApiError> {
    let outcome = state.lifecycle.stop().await?;
    info!(outcome = ?outcome, "worker stop requested via API");

    let message = match outcome {
        StopOutcome::Clean => "ingestion worker stopped".to_string(),
        StopOutcome::TimedOut => {
            "stop signal sent; the worker is finishing an in-flight call".to_string()
        }
    };

    Ok(Json(LifecycleResponse {
        status: "success".to_string(),
        message,
        phase: state.lifecycle.phase(),
    }))
}

/// GET /status - lifecycle phase, pure read.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let report = state.lifecycle.status();
    Json(StatusResponse {
        phase: report.phase,
        worker_alive: report.worker_alive,
        crashed: report.crashed,
    })
}
