//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use telemetry::MetricsSnapshot;
use worker::Phase;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API error carrying the HTTP status and a short user-visible message.
/// Raw internal errors never cross this boundary.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: msg.into(),
                code: code.into(),
            },
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<resume_core::Error> for ApiError {
    fn from(err: resume_core::Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::new(status, err.code(), err.to_string())
    }
}

/// GET / body.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: serde_json::Value,
}

/// GET /health body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub api_running: bool,
    pub worker_running: bool,
    pub environment: EnvironmentFlags,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnvironmentFlags {
    pub provider_token_configured: bool,
    pub llm_key_configured: bool,
}

/// GET /status body.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub phase: Phase,
    pub worker_alive: bool,
    pub crashed: bool,
}

/// POST /start and /stop body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LifecycleResponse {
    pub status: String,
    pub message: String,
    pub phase: Phase,
}

/// POST /upload body.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_data: Option<resume_core::ResumeData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    pub message: String,
}

/// POST /api/chat body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub chat_history: Vec<resume_core::ChatTurn>,
}

/// POST /api/interview-prep body.
#[derive(Debug, Serialize, Deserialize)]
pub struct InterviewPrepResponse {
    pub success: bool,
    pub interview_prep: String,
    pub export_token: String,
}

/// POST /api/export-json body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub resume_data: resume_core::ResumeData,
    pub formatted: String,
}
