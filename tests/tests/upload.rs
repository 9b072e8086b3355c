//! Tests for the upload endpoint.

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use integration_tests::fixtures::RESUME_TXT;
use integration_tests::setup::TestContext;

fn resume_form(file_name: &str, bytes: &'static [u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes).file_name(file_name).mime_type("application/octet-stream"),
    )
}

#[tokio::test]
async fn test_upload_analyzes_resume() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/upload")
        .multipart(resume_form("resume.txt", RESUME_TXT))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert!(!body["session_id"].as_str().unwrap().is_empty());
    assert_eq!(body["resume_data"]["personal_info"]["name"], "Jane Doe");

    // The rendering is deterministic and carries the literal contact fields.
    let formatted = body["formatted"].as_str().unwrap();
    assert!(formatted.contains("Jane Doe"));
    assert!(formatted.contains("jane@x.com"));
}

#[tokio::test]
async fn test_api_upload_alias_matches() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/upload")
        .multipart(resume_form("resume.txt", RESUME_TXT))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_unsupported_extension_rejected_before_any_call() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/upload")
        .multipart(resume_form("malware.exe", b"MZ fake binary"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_FILE");

    // Rejected before extraction: the analyzer was never invoked.
    assert_eq!(ctx.mock_analyzer.analyze_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_file_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/upload")
        .multipart(resume_form("resume.txt", b""))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_FILE");
}

#[tokio::test]
async fn test_missing_file_field_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_image_upload_reports_not_supported() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/upload")
        .multipart(resume_form("scan.png", b"\x89PNG fake image"))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("not supported yet"));
    assert_eq!(ctx.mock_analyzer.analyze_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_analysis_failure_surfaces_typed_error() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    ctx.mock_analyzer.set_should_fail(true);
    let response = server
        .post("/upload")
        .multipart(resume_form("resume.txt", RESUME_TXT))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "ANALYSIS_FAILED");
}
