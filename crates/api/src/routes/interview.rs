//! Interview preparation endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use telemetry::metrics;
use tracing::info;

use resume_core::{InterviewGuide, InterviewType};

use crate::response::{ApiError, InterviewPrepResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterviewPrepRequest {
    pub session_id: String,
    /// One of: general, technical, behavioral, leadership. Unknown values
    /// are rejected, not defaulted.
    pub interview_type: String,
}

/// POST /api/interview-prep - generate a preparation guide.
pub async fn interview_prep_handler(
    State(state): State<AppState>,
    Json(request): Json<InterviewPrepRequest>,
) -> Result<Json<InterviewPrepResponse>, ApiError> {
    let interview_type: InterviewType = request.interview_type.parse()?;

    let reply = state
        .machine
        .handle_interview_prep(&request.session_id, interview_type)
        .await?;

    metrics().guides_generated.inc();
    info!(session_id = %request.session_id, interview_type = %interview_type, "guide generated via API");

    Ok(Json(InterviewPrepResponse {
        success: true,
        interview_prep: reply.formatted,
        export_token: reply.export_token,
    }))
}

/// GET /api/interview-prep/export/:token - one-shot raw guide download.
pub async fn export_guide_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InterviewGuide>, ApiError> {
    let guide = state.machine.export_guide(&token).await?;
    Ok(Json(guide))
}
