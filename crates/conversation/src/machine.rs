//! Conversational state machine.
//!
//! Routes each inbound event to the right collaborator and applies the
//! resulting session transition. A session's entry lock is held for the
//! whole turn, so turns serialize per session while distinct sessions run
//! concurrently.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use extract::{Extraction, TextExtractor};
use gemini_client::ResumeAnalyzer;
use resume_core::error::{Error, Result};
use resume_core::format::{render_guide, render_resume};
use resume_core::limits::{
    self, EXPORT_TOKEN_TTL, MAX_UPLOAD_SIZE_BYTES, MIN_RESUME_TEXT_CHARS,
};
use resume_core::{ChatTurn, InterviewGuide, InterviewType, ResumeData, SessionMode};

use crate::store::SessionStore;

/// Result of a document upload.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// Extraction and analysis succeeded; the session is Analyzed.
    Analyzed {
        resume_data: ResumeData,
        formatted: String,
    },
    /// Image uploads are accepted but OCR is unimplemented; the session
    /// returns to Idle.
    ImageNotSupported { message: String },
}

/// One completed chat turn plus the session's full history.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub answer: String,
    pub chat_history: Vec<ChatTurn>,
}

/// One generated interview guide, renderable now and exportable once.
#[derive(Debug, Clone, Serialize)]
pub struct GuideReply {
    pub formatted: String,
    pub export_token: String,
}

/// Read-only view of a single session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub mode: SessionMode,
    pub filename: Option<String>,
    pub resume_data: Option<ResumeData>,
    pub chat_history: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

/// Summary line for the session listing.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub mode: SessionMode,
    pub name: String,
    pub filename: Option<String>,
    pub chat_count: usize,
    pub last_active_at: DateTime<Utc>,
}

/// Governs legal mode transitions per session and mediates all access to the
/// session store.
pub struct ConversationStateMachine {
    store: Arc<SessionStore>,
    extractor: Arc<dyn TextExtractor>,
    analyzer: Arc<dyn ResumeAnalyzer>,
    /// One-shot raw guides keyed by export token.
    guide_vault: Cache<String, InterviewGuide>,
}

impl ConversationStateMachine {
    pub fn new(
        store: Arc<SessionStore>,
        extractor: Arc<dyn TextExtractor>,
        analyzer: Arc<dyn ResumeAnalyzer>,
    ) -> Self {
        Self {
            store,
            extractor,
            analyzer,
            guide_vault: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(EXPORT_TOKEN_TTL)
                .build(),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Handles a document upload. Legal from any mode: a new upload always
    /// supersedes the current analysis and resets the chat history.
    ///
    /// Extension and size checks fail before any decoding or network call.
    pub async fn handle_upload(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<UploadOutcome> {
        let ext = limits::file_extension(file_name)
            .ok_or_else(|| Error::invalid_file(format!("{file_name}: missing extension")))?;
        if !limits::is_supported_extension(&ext) {
            return Err(Error::invalid_file(format!(
                "unsupported file format .{ext} (supported: {})",
                limits::SUPPORTED_EXTENSIONS.join(", ")
            )));
        }
        if bytes.is_empty() {
            return Err(Error::invalid_file("file is empty"));
        }
        if bytes.len() > MAX_UPLOAD_SIZE_BYTES {
            return Err(Error::invalid_file(format!(
                "file is {} bytes, limit is {} bytes",
                bytes.len(),
                MAX_UPLOAD_SIZE_BYTES
            )));
        }

        let handle = self.store.get_or_create(session_id);
        let mut session = handle.lock().await;

        if let Some(stale_token) = session.begin_analysis(file_name) {
            self.guide_vault.invalidate(&stale_token).await;
        }

        let text = match self.extractor.extract(file_name, bytes).await {
            Ok(Extraction::Text(text)) => text,
            Ok(Extraction::ImageUnsupported) => {
                session.fail_analysis();
                return Ok(UploadOutcome::ImageNotSupported {
                    message: "Text extraction from images is not supported yet. \
                              Please upload a PDF, DOCX, or TXT file."
                        .to_string(),
                });
            }
            Err(e) => {
                session.fail_analysis();
                return Err(e);
            }
        };

        if text.chars().count() < MIN_RESUME_TEXT_CHARS {
            session.fail_analysis();
            return Err(Error::extraction(format!(
                "extracted text is too short to be a resume ({} chars)",
                text.chars().count()
            )));
        }

        let resume_data = match self.analyzer.analyze_resume(&text).await {
            Ok(data) => data,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "analysis failed");
                session.fail_analysis();
                return Err(e);
            }
        };

        session.complete_analysis(resume_data.clone());
        info!(session_id = %session_id, file = %file_name, "resume analyzed");

        let formatted = render_resume(&resume_data);
        Ok(UploadOutcome::Analyzed {
            resume_data,
            formatted,
        })
    }

    /// Analyzed → Chatting.
    pub async fn enter_chat(&self, session_id: &str) -> Result<()> {
        let handle = self.require_session(session_id)?;
        let mut session = handle.lock().await;
        session.enter_chat()
    }

    /// Chatting → Analyzed.
    pub async fn exit_chat(&self, session_id: &str) -> Result<()> {
        let handle = self.require_session(session_id)?;
        let mut session = handle.lock().await;
        session.exit_chat();
        Ok(())
    }

    /// One chat turn. Requires Chatting mode; the session lock is held
    /// across the LLM call, so turns serialize per session. The question and
    /// answer are recorded together after the call succeeds; a failed call
    /// records neither.
    pub async fn handle_chat_message(&self, session_id: &str, question: &str) -> Result<ChatReply> {
        let handle = self.require_session(session_id)?;
        let mut session = handle.lock().await;

        if session.mode != SessionMode::Chatting {
            return Err(Error::no_analysis(
                "chat mode is not active; enter chat first",
            ));
        }
        let resume = session.analyzed_data()?.clone();

        let answer = self.analyzer.chat(question, &resume).await?;
        session.record_turn(question, answer.clone());

        Ok(ChatReply {
            answer,
            chat_history: session.chat_history.clone(),
        })
    }

    /// Generates an interview-preparation guide. The session passes through
    /// PreppingInterview and lands back in Analyzed on success and failure
    /// alike; failures are reported, never retried automatically.
    pub async fn handle_interview_prep(
        &self,
        session_id: &str,
        interview_type: InterviewType,
    ) -> Result<GuideReply> {
        let handle = self.require_session(session_id)?;
        let mut session = handle.lock().await;

        // Interview prep is reachable from chat mode; step back to Analyzed
        // before the transition.
        session.exit_chat();
        session.begin_interview_prep()?;
        let resume = session.analyzed_data()?.clone();

        let guide = match self.analyzer.interview_prep(&resume, interview_type).await {
            Ok(guide) => guide,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "interview prep failed");
                session.finish_interview_prep(None);
                return Err(e);
            }
        };

        let token = Uuid::new_v4().to_string();
        self.guide_vault.insert(token.clone(), guide.clone()).await;
        session.finish_interview_prep(Some(token.clone()));
        info!(session_id = %session_id, interview_type = %interview_type, "interview guide generated");

        Ok(GuideReply {
            formatted: render_guide(&guide),
            export_token: token,
        })
    }

    /// Consumes an export token, returning the raw guide. A token is valid
    /// for exactly one export.
    pub async fn export_guide(&self, token: &str) -> Result<InterviewGuide> {
        match self.guide_vault.get(token).await {
            Some(guide) => {
                self.guide_vault.invalidate(token).await;
                Ok(guide)
            }
            None => Err(Error::ExportNotFound(token.to_string())),
        }
    }

    /// Raw analyzed data plus its rendering, for the export endpoint.
    pub async fn resume_export(&self, session_id: &str) -> Result<(ResumeData, String)> {
        let handle = self.require_session(session_id)?;
        let session = handle.lock().await;
        let data = session.analyzed_data()?.clone();
        let formatted = render_resume(&data);
        Ok((data, formatted))
    }

    /// Resets a session to Idle (the bot's /start), dropping analysis,
    /// history, and any outstanding export token.
    pub async fn reset_session(&self, session_id: &str) {
        let stale_token = self.store.mutate(session_id, |session| session.reset()).await;
        if let Some(stale_token) = stale_token {
            self.guide_vault.invalidate(&stale_token).await;
        }
    }

    /// Read-only view of one session.
    pub async fn session_snapshot(&self, session_id: &str) -> Result<SessionSnapshot> {
        let handle = self
            .store
            .get(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let session = handle.lock().await;

        Ok(SessionSnapshot {
            session_id: session.id.clone(),
            mode: session.mode,
            filename: session.source_filename.clone(),
            resume_data: session.resume_data.clone(),
            chat_history: session.chat_history.clone(),
            created_at: session.created_at,
            last_active_at: session.last_active_at,
        })
    }

    /// Summary of all live sessions.
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut summaries = Vec::new();
        for handle in self.store.handles() {
            let session = handle.lock().await;
            summaries.push(SessionSummary {
                session_id: session.id.clone(),
                mode: session.mode,
                name: session
                    .resume_data
                    .as_ref()
                    .map(|d| d.display_name().to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                filename: session.source_filename.clone(),
                chat_count: session.chat_history.len(),
                last_active_at: session.last_active_at,
            });
        }
        summaries.sort_by(|a, b| b.last_active_at.cmp(&a.last_active_at));
        summaries
    }

    fn require_session(&self, session_id: &str) -> Result<crate::store::SessionHandle> {
        self.store.get(session_id).ok_or_else(|| {
            Error::no_analysis("no session found; upload a resume first")
        })
    }
}
