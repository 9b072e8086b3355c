//! Chat endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;
use telemetry::metrics;
use validator::Validate;

use crate::response::{ApiError, ChatResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub session_id: String,
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

/// POST /api/chat - one chat turn against the analyzed resume.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(format!("invalid chat request: {e}")))?;

    // The HTTP flow has no explicit chat-mode toggle; entering here keeps
    // the mode precondition honest for sessions fresh off an upload.
    state.machine.enter_chat(&request.session_id).await?;

    let reply = state
        .machine
        .handle_chat_message(&request.session_id, request.message.trim())
        .await?;

    metrics().chat_turns.inc();

    Ok(Json(ChatResponse {
        success: true,
        response: reply.answer,
        chat_history: reply.chat_history,
    }))
}
