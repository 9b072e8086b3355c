//! Tests for the worker lifecycle endpoints.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn test_status_starts_stopped() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/status").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["phase"], "stopped");
    assert_eq!(body["worker_alive"], false);
    assert_eq!(body["crashed"], false);
}

#[tokio::test]
async fn test_start_then_double_start() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/start").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["phase"], "running");

    // Second start without an intervening stop is a conflict, and exactly
    // one worker stays alive.
    let response = server.post("/start").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "LIFECYCLE_CONFLICT");

    let status: serde_json::Value = server.get("/status").await.json();
    assert_eq!(status["phase"], "running");
    assert_eq!(status["worker_alive"], true);

    server.post("/stop").await.assert_status_ok();
}

#[tokio::test]
async fn test_start_via_get_is_supported() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.get("/start").await.assert_status_ok();
    server.post("/stop").await.assert_status_ok();
}

#[tokio::test]
async fn test_stop_when_stopped_is_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/stop").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "LIFECYCLE_CONFLICT");

    // And it was a no-op.
    let status: serde_json::Value = server.get("/status").await.json();
    assert_eq!(status["phase"], "stopped");
}

#[tokio::test]
async fn test_stop_then_restart_cycle() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.post("/start").await.assert_status_ok();
    server.post("/stop").await.assert_status_ok();

    let status: serde_json::Value = server.get("/status").await.json();
    assert_eq!(status["phase"], "stopped");

    server.post("/start").await.assert_status_ok();
    server.post("/stop").await.assert_status_ok();
}

#[tokio::test]
async fn test_failed_connection_start_returns_500() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    ctx.mock_gateway.set_fail_connection(true);
    let response = server.post("/start").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let status: serde_json::Value = server.get("/status").await.json();
    assert_eq!(status["phase"], "stopped");
}
