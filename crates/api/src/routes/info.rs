//! Info banner endpoint.

use axum::Json;

use crate::response::InfoResponse;

/// GET / - API information.
pub async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Resume Analysis Engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: serde_json::json!({
            "/health": "GET - liveness and configuration flags",
            "/status": "GET - worker lifecycle phase",
            "/start": "GET/POST - start the ingestion worker",
            "/stop": "POST - stop the ingestion worker",
            "/upload": "POST - submit a resume document (multipart field 'file')",
            "/api/chat": "POST - chat about the analyzed resume",
            "/api/interview-prep": "POST - generate an interview preparation guide",
            "/api/sessions": "GET - list active sessions",
        }),
    })
}
