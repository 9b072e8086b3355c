//! Messaging-provider gateway abstraction.

use async_trait::async_trait;
use bytes::Bytes;

use resume_core::error::Result;

/// One inbound event from the messaging provider.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundUpdate {
    /// A document was sent to the bot.
    Document {
        chat_id: i64,
        file_id: String,
        file_name: String,
        file_size: u64,
    },
    /// A plain text message (commands included).
    Text { chat_id: i64, text: String },
    /// A button press.
    Callback { chat_id: i64, data: String },
}

impl InboundUpdate {
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Document { chat_id, .. }
            | Self::Text { chat_id, .. }
            | Self::Callback { chat_id, .. } => *chat_id,
        }
    }
}

/// Connection to the messaging provider. Owned exclusively by the ingestion
/// worker; implementations must be safe to long-poll from a single task.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Verifies provider credentials. Called once before the worker signals
    /// readiness.
    async fn check_connection(&self) -> Result<()>;

    /// Long-polls for updates after `offset`. Returns the updates and the
    /// next offset to poll from.
    async fn poll_updates(&self, offset: i64) -> Result<(Vec<InboundUpdate>, i64)>;

    /// Downloads a document referenced by an inbound update.
    async fn download_document(&self, file_id: &str) -> Result<Bytes>;

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn send_document(&self, chat_id: i64, file_name: &str, bytes: Bytes) -> Result<()>;
}
