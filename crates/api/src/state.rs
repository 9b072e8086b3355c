//! Application state shared across handlers.

use std::sync::Arc;

use conversation::ConversationStateMachine;
use worker::ProcessLifecycleManager;

/// Shared application state.
///
/// Handlers reach the worker only through the lifecycle manager; the
/// provider connection itself is owned by the worker.
#[derive(Clone)]
pub struct AppState {
    pub machine: Arc<ConversationStateMachine>,
    pub lifecycle: Arc<ProcessLifecycleManager>,
    /// Messaging-provider token present at startup.
    pub provider_configured: bool,
    /// LLM API key present at startup.
    pub llm_configured: bool,
}

impl AppState {
    pub fn new(
        machine: Arc<ConversationStateMachine>,
        lifecycle: Arc<ProcessLifecycleManager>,
        provider_configured: bool,
        llm_configured: bool,
    ) -> Self {
        Self {
            machine,
            lifecycle,
            provider_configured,
            llm_configured,
        }
    }
}
