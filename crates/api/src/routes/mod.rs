//! API routes.

pub mod chat;
pub mod health;
pub mod info;
pub mod interview;
pub mod lifecycle;
pub mod sessions;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use resume_core::limits::MAX_UPLOAD_SIZE_BYTES;

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(info::info_handler))
        .route("/health", get(health::health_handler))
        .route("/status", get(lifecycle::status_handler))
        .route(
            "/start",
            get(lifecycle::start_handler).post(lifecycle::start_handler),
        )
        .route("/stop", post(lifecycle::stop_handler))
        .route("/upload", post(upload::upload_handler))
        .route("/api/upload", post(upload::upload_handler))
        .route("/api/chat", post(chat::chat_handler))
        .route("/api/interview-prep", post(interview::interview_prep_handler))
        .route(
            "/api/interview-prep/export/:token",
            get(interview::export_guide_handler),
        )
        .route("/api/session/:id", get(sessions::session_handler))
        .route("/api/sessions", get(sessions::list_sessions_handler))
        .route("/api/export-json", post(sessions::export_json_handler))
        // Multipart bodies must fit the upload ceiling plus form overhead.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE_BYTES + 64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
