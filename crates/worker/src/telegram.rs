//! Telegram Bot API gateway.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use resume_core::error::{Error, Result};

use crate::gateway::{InboundUpdate, MessageGateway};

/// Bot gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Provider token; presence is validated at startup.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Long-poll window passed to the provider.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    10
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: default_base_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

/// Reqwest-backed Telegram gateway.
pub struct BotGateway {
    config: BotConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUpdate {
    update_id: i64,
    message: Option<WireMessage>,
    callback_query: Option<WireCallback>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    chat: WireChat,
    text: Option<String>,
    document: Option<WireDocument>,
}

#[derive(Debug, Deserialize)]
struct WireChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    file_id: String,
    file_name: Option<String>,
    #[serde(default)]
    file_size: u64,
}

#[derive(Debug, Deserialize)]
struct WireCallback {
    message: Option<WireMessage>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireFile {
    file_path: Option<String>,
}

impl BotGateway {
    pub fn new(config: BotConfig) -> Result<Self> {
        // The overall request timeout must exceed the long-poll window.
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.poll_timeout_secs + 20))
            .build()
            .map_err(|e| Error::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.config.base_url, self.config.token)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(format!("{method} request failed: {e}")))?;

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("{method} returned invalid JSON: {e}")))?;

        if !envelope.ok {
            return Err(Error::provider(format!(
                "{method} rejected: {}",
                envelope.description.unwrap_or_else(|| "unknown".to_string())
            )));
        }
        envelope
            .result
            .ok_or_else(|| Error::provider(format!("{method} returned no result")))
    }
}

#[async_trait]
impl MessageGateway for BotGateway {
    async fn check_connection(&self) -> Result<()> {
        let _me: serde_json::Value = self.call("getMe", serde_json::json!({})).await?;
        debug!("provider credentials verified");
        Ok(())
    }

    async fn poll_updates(&self, offset: i64) -> Result<(Vec<InboundUpdate>, i64)> {
        let wire: Vec<WireUpdate> = self
            .call(
                "getUpdates",
                serde_json::json!({
                    "offset": offset,
                    "timeout": self.config.poll_timeout_secs,
                    "allowed_updates": ["message", "callback_query"],
                }),
            )
            .await?;

        let mut next_offset = offset;
        let mut updates = Vec::new();

        for update in wire {
            next_offset = next_offset.max(update.update_id + 1);

            if let Some(message) = update.message {
                if let Some(document) = message.document {
                    updates.push(InboundUpdate::Document {
                        chat_id: message.chat.id,
                        file_id: document.file_id,
                        file_name: document
                            .file_name
                            .unwrap_or_else(|| "document".to_string()),
                        file_size: document.file_size,
                    });
                } else if let Some(text) = message.text {
                    updates.push(InboundUpdate::Text {
                        chat_id: message.chat.id,
                        text,
                    });
                }
            } else if let Some(callback) = update.callback_query {
                if let (Some(message), Some(data)) = (callback.message, callback.data) {
                    updates.push(InboundUpdate::Callback {
                        chat_id: message.chat.id,
                        data,
                    });
                }
            }
        }

        Ok((updates, next_offset))
    }

    async fn download_document(&self, file_id: &str) -> Result<Bytes> {
        let file: WireFile = self
            .call("getFile", serde_json::json!({ "file_id": file_id }))
            .await?;
        let file_path = file
            .file_path
            .ok_or_else(|| Error::provider("getFile returned no path"))?;

        let url = format!(
            "{}/file/bot{}/{file_path}",
            self.config.base_url, self.config.token
        );
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::provider(format!("document download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::provider(format!(
                "document download returned {}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| Error::provider(format!("document download failed: {e}")))
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let _sent: serde_json::Value = self
            .call(
                "sendMessage",
                serde_json::json!({ "chat_id": chat_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, file_name: &str, bytes: Bytes) -> Result<()> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/json")
            .map_err(|e| Error::internal(format!("invalid document part: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);

        let response = self
            .http_client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::provider(format!("sendDocument request failed: {e}")))?;

        let envelope: ApiEnvelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("sendDocument returned invalid JSON: {e}")))?;

        if !envelope.ok {
            return Err(Error::provider(format!(
                "sendDocument rejected: {}",
                envelope.description.unwrap_or_else(|| "unknown".to_string())
            )));
        }
        Ok(())
    }
}
