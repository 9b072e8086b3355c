//! Reqwest-backed Gemini client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use resume_core::error::{Error, Result};
use resume_core::{InterviewGuide, InterviewType, ResumeData};

use crate::config::GeminiConfig;
use crate::prompts;
use crate::ResumeAnalyzer;

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Creates a new client. No global request timeout is set on the
    /// underlying client; each call applies the operation's bound.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// One `generateContent` call with retry for transient transport
    /// failures. Returns the concatenated candidate text.
    async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = self.config.retry_backoff() * attempt;
                warn!(
                    attempt = attempt,
                    backoff_ms = %backoff.as_millis(),
                    "retrying Gemini call"
                );
                tokio::time::sleep(backoff).await;
            }

            match self.send_once(&url, &request, timeout).await {
                Ok(text) => return Ok(text),
                Err(SendError::Transient(msg)) => {
                    last_error = Some(msg);
                }
                Err(SendError::Fatal(err)) => return Err(err),
            }
        }

        Err(Error::analysis(format!(
            "Gemini unavailable after {} attempts: {}",
            self.config.max_retries + 1,
            last_error.unwrap_or_else(|| "unknown transport error".to_string())
        )))
    }

    async fn send_once(
        &self,
        url: &str,
        request: &GenerateRequest<'_>,
        timeout: Duration,
    ) -> std::result::Result<String, SendError> {
        debug!(url = %url, "calling Gemini");

        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    SendError::Transient(e.to_string())
                } else {
                    SendError::Fatal(Error::analysis(format!("Gemini request failed: {e}")))
                }
            })?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Transient(format!("{status}: {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Fatal(Error::analysis(format!(
                "Gemini returned {status}: {body}"
            ))));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            SendError::Fatal(Error::analysis(format!("invalid Gemini response: {e}")))
        })?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SendError::Fatal(Error::analysis(
                "Gemini returned no candidates",
            )));
        }

        Ok(text)
    }
}

enum SendError {
    /// Worth retrying: timeout, connect failure, 5xx, 429.
    Transient(String),
    /// Not worth retrying: 4xx, malformed response.
    Fatal(Error),
}

/// Strips a leading/trailing markdown code fence, if present.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parses a model reply into `T` after fence stripping. Parse failures are
/// terminal, never retried.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let payload = strip_code_fences(text);
    serde_json::from_str(payload)
        .map_err(|e| Error::analysis(format!("model returned non-parseable JSON: {e}")))
}

#[async_trait]
impl ResumeAnalyzer for GeminiClient {
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeData> {
        let prompt = prompts::extraction_prompt(resume_text);
        let reply = self
            .generate(&prompt, self.config.analysis_timeout())
            .await?;
        parse_model_json(&reply)
    }

    async fn chat(&self, question: &str, resume: &ResumeData) -> Result<String> {
        let prompt = prompts::chat_prompt(question, resume);
        let reply = self.generate(&prompt, self.config.chat_timeout()).await?;
        Ok(reply.trim().to_string())
    }

    async fn interview_prep(
        &self,
        resume: &ResumeData,
        interview_type: InterviewType,
    ) -> Result<InterviewGuide> {
        let prompt = prompts::interview_prompt(interview_type, resume);
        let reply = self
            .generate(&prompt, self.config.analysis_timeout())
            .await?;
        parse_model_json(&reply)
    }
}
