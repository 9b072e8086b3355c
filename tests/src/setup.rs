//! Common test setup functions.

use std::sync::Arc;
use std::time::Duration;

use api::{router, AppState};
use axum::Router;
use conversation::{ConversationStateMachine, SessionStore};
use extract::DocumentTextExtractor;
use worker::{DeploymentMode, LifecycleConfig, ProcessLifecycleManager};

use crate::mocks::{MockAnalyzer, MockGateway};

/// Test context exercising the production code paths:
/// - the real axum router with all middleware
/// - the real state machine, store, and lifecycle manager
/// - mock analyzer and gateway behind the production traits
pub struct TestContext {
    pub router: Router,
    pub machine: Arc<ConversationStateMachine>,
    pub lifecycle: Arc<ProcessLifecycleManager>,
    pub mock_analyzer: Arc<MockAnalyzer>,
    pub mock_gateway: Arc<MockGateway>,
}

impl TestContext {
    pub fn new() -> Self {
        let mock_analyzer = MockAnalyzer::new();
        let mock_gateway = MockGateway::new();

        let machine = Arc::new(ConversationStateMachine::new(
            Arc::new(SessionStore::new()),
            Arc::new(DocumentTextExtractor::new()),
            mock_analyzer.clone(),
        ));

        let lifecycle_config = LifecycleConfig {
            mode: DeploymentMode::Direct,
            start_timeout: Duration::from_secs(1),
            stop_timeout: Duration::from_secs(1),
            poll_backoff: Duration::from_millis(1),
            ..Default::default()
        };
        let lifecycle = Arc::new(ProcessLifecycleManager::new(
            lifecycle_config,
            mock_gateway.clone(),
            machine.clone(),
        ));

        let state = AppState::new(machine.clone(), lifecycle.clone(), true, true);
        let router = router(state);

        Self {
            router,
            machine,
            lifecycle,
            mock_analyzer,
            mock_gateway,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
