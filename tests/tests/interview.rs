//! Tests for the interview-prep endpoints.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use integration_tests::fixtures::RESUME_TXT;
use integration_tests::setup::TestContext;

async fn upload_session(server: &TestServer) -> String {
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(RESUME_TXT)
            .file_name("resume.txt")
            .mime_type("application/octet-stream"),
    );
    let body: serde_json::Value = server.post("/upload").multipart(form).await.json();
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_interview_prep_returns_guide_and_token() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let session_id = upload_session(&server).await;

    let response = server
        .post("/api/interview-prep")
        .json(&serde_json::json!({"session_id": session_id, "interview_type": "technical"}))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["interview_prep"]
        .as_str()
        .unwrap()
        .contains("INTERVIEW PREPARATION GUIDE"));
    assert!(!body["export_token"].as_str().unwrap().is_empty());

    // The session lands back in Analyzed after generation.
    let snapshot: serde_json::Value =
        server.get(&format!("/api/session/{session_id}")).await.json();
    assert_eq!(snapshot["mode"], "analyzed");
}

#[tokio::test]
async fn test_export_token_is_single_use() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let session_id = upload_session(&server).await;

    let body: serde_json::Value = server
        .post("/api/interview-prep")
        .json(&serde_json::json!({"session_id": session_id, "interview_type": "general"}))
        .await
        .json();
    let token = body["export_token"].as_str().unwrap();

    let first = server
        .get(&format!("/api/interview-prep/export/{token}"))
        .await;
    first.assert_status_ok();
    let guide: serde_json::Value = first.json();
    assert!(guide["interview_tips"][0]
        .as_str()
        .unwrap()
        .contains("general"));

    let second = server
        .get(&format!("/api/interview-prep/export/{token}"))
        .await;
    second.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_interview_type_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let session_id = upload_session(&server).await;

    let response = server
        .post("/api/interview-prep")
        .json(&serde_json::json!({"session_id": session_id, "interview_type": "casual"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INTERVIEW_TYPE");
}

#[tokio::test]
async fn test_interview_prep_without_analysis_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/interview-prep")
        .json(&serde_json::json!({"session_id": "ghost", "interview_type": "general"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NO_ACTIVE_ANALYSIS");
}

#[tokio::test]
async fn test_new_upload_invalidates_export_token() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let session_id = upload_session(&server).await;

    let body: serde_json::Value = server
        .post("/api/interview-prep")
        .json(&serde_json::json!({"session_id": session_id, "interview_type": "behavioral"}))
        .await
        .json();
    let token = body["export_token"].as_str().unwrap().to_string();

    ctx.machine
        .handle_upload(&session_id, "new.txt", bytes::Bytes::from_static(RESUME_TXT))
        .await
        .unwrap();

    let response = server
        .get(&format!("/api/interview-prep/export/{token}"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
