//! Gemini client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use resume_core::limits::{ANALYSIS_TIMEOUT, CHAT_TIMEOUT};

/// Gemini client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; presence is validated at startup.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Retries for transient transport failures (timeouts, connect errors,
    /// 5xx). Parse failures never retry.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl GeminiConfig {
    /// Upper bound on a single extraction or interview-prep call.
    pub fn analysis_timeout(&self) -> Duration {
        ANALYSIS_TIMEOUT
    }

    /// Upper bound on a single chat call.
    pub fn chat_timeout(&self) -> Duration {
        CHAT_TIMEOUT
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
