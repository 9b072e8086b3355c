//! Tests for the info and health endpoints.

use axum_test::TestServer;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn test_info_banner() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("version").is_some());
    assert!(body.get("endpoints").is_some());
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_running"], true);
    assert!(
        body.get("worker_running").is_some(),
        "Response should have 'worker_running' field"
    );
    assert_eq!(body["environment"]["provider_token_configured"], true);
    assert_eq!(body["environment"]["llm_key_configured"], true);
    assert!(
        body["metrics"].get("uploads_received").is_some(),
        "Response should surface metrics"
    );
}

#[tokio::test]
async fn test_health_reports_worker_state() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["worker_running"], false);

    ctx.lifecycle.start().await.unwrap();
    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["worker_running"], true);

    ctx.lifecycle.stop().await.unwrap();
}
