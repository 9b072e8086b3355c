//! Resume upload endpoint.

use axum::{
    extract::{Multipart, State},
    Json,
};
use telemetry::metrics;
use tracing::{error, info};
use uuid::Uuid;

use conversation::UploadOutcome;

use crate::response::{ApiError, UploadResponse};
use crate::state::AppState;

/// POST /upload and /api/upload - submit a document for analysis.
///
/// Expects a multipart form with a `file` field. A fresh session id is
/// minted per upload and returned for the follow-up chat and interview-prep
/// calls.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .ok_or_else(|| ApiError::bad_request("file field has no filename"))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("could not read file field: {e}")))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| ApiError::bad_request("no file provided"))?;

    metrics().uploads_received.inc();
    let session_id = Uuid::new_v4().to_string();

    let outcome = state
        .machine
        .handle_upload(&session_id, &file_name, bytes)
        .await
        .map_err(|e| {
            metrics().analyses_failed.inc();
            error!(session_id = %session_id, file = %file_name, error = %e, "upload failed");
            ApiError::from(e)
        })?;

    match outcome {
        UploadOutcome::Analyzed {
            resume_data,
            formatted,
        } => {
            metrics().analyses_completed.inc();
            info!(session_id = %session_id, file = %file_name, "resume analyzed via API");
            Ok(Json(UploadResponse {
                success: true,
                session_id,
                resume_data: Some(resume_data),
                formatted: Some(formatted),
                message: "Resume analyzed successfully".to_string(),
            }))
        }
        UploadOutcome::ImageNotSupported { message } => Ok(Json(UploadResponse {
            success: false,
            session_id,
            resume_data: None,
            formatted: None,
            message,
        })),
    }
}
