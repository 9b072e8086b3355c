//! Session inspection and export endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use conversation::{SessionSnapshot, SessionSummary};

use crate::response::{ApiError, ExportResponse};
use crate::state::AppState;

/// GET /api/session/:id - read-only view of one session.
pub async fn session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state.machine.session_snapshot(&id).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub success: bool,
    pub sessions: Vec<SessionSummary>,
}

/// GET /api/sessions - summaries of all live sessions.
pub async fn list_sessions_handler(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions = state.machine.list_sessions().await;
    Json(SessionListResponse {
        success: true,
        sessions,
    })
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub session_id: String,
}

/// POST /api/export-json - raw analyzed data plus its rendering.
pub async fn export_json_handler(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, ApiError> {
    let (resume_data, formatted) = state.machine.resume_export(&request.session_id).await?;
    Ok(Json(ExportResponse {
        success: true,
        resume_data,
        formatted,
    }))
}
