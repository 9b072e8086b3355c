//! Per-user conversational session state.
//!
//! All mode transitions live here as methods returning typed errors, so the
//! invariant (chat and interview modes require analyzed data) cannot be
//! violated from outside.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resume::ResumeData;

/// Conversational mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Idle,
    Analyzing,
    Analyzed,
    Chatting,
    PreppingInterview,
}

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

/// Per-user conversational context.
///
/// Invariant: `mode ∈ {Chatting, PreppingInterview}` implies
/// `resume_data.is_some()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unique id, created on first upload, never reused.
    pub id: String,
    pub mode: SessionMode,
    /// Present only once analysis succeeds; replaced wholesale by a new
    /// upload.
    pub resume_data: Option<ResumeData>,
    /// Append-only within the session's lifetime; reset by a new upload.
    pub chat_history: Vec<ChatTurn>,
    /// Reference into the one-shot guide export vault.
    pub guide_token: Option<String>,
    /// Name of the most recently uploaded file.
    pub source_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new idle session.
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            mode: SessionMode::Idle,
            resume_data: None,
            chat_history: Vec::new(),
            guide_token: None,
            source_filename: None,
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    /// Checks whether the session has been inactive longer than `ttl`.
    pub fn is_idle_beyond(&self, ttl: Duration) -> bool {
        Utc::now() - self.last_active_at > ttl
    }

    /// A new upload supersedes everything: previous analysis, chat history,
    /// and any outstanding guide token are discarded. Legal from ANY mode.
    ///
    /// Returns the invalidated guide token, if one was outstanding, so the
    /// caller can drop the vault entry.
    pub fn begin_analysis(&mut self, file_name: impl Into<String>) -> Option<String> {
        self.mode = SessionMode::Analyzing;
        self.resume_data = None;
        self.chat_history.clear();
        self.source_filename = Some(file_name.into());
        self.touch();
        self.guide_token.take()
    }

    /// Analyzing → Analyzed with fresh data.
    pub fn complete_analysis(&mut self, data: ResumeData) {
        self.resume_data = Some(data);
        self.mode = SessionMode::Analyzed;
        self.touch();
    }

    /// Analyzing → Idle on extraction or analysis failure.
    pub fn fail_analysis(&mut self) {
        self.resume_data = None;
        self.mode = SessionMode::Idle;
        self.touch();
    }

    /// Analyzed → Chatting. Re-entering from Chatting is a no-op.
    pub fn enter_chat(&mut self) -> Result<()> {
        self.require_analysis("chat")?;
        self.mode = SessionMode::Chatting;
        self.touch();
        Ok(())
    }

    /// Chatting → Analyzed. Exiting while already Analyzed is a no-op.
    pub fn exit_chat(&mut self) {
        if self.mode == SessionMode::Chatting {
            self.mode = SessionMode::Analyzed;
        }
        self.touch();
    }

    /// Records a completed chat turn. The question/answer pair is appended
    /// together; a failed call records neither.
    pub fn record_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.chat_history.push(ChatTurn {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        });
        self.touch();
    }

    /// Analyzed → PreppingInterview.
    pub fn begin_interview_prep(&mut self) -> Result<()> {
        self.require_analysis("interview preparation")?;
        self.mode = SessionMode::PreppingInterview;
        self.touch();
        Ok(())
    }

    /// PreppingInterview → Analyzed, on both generation success and failure.
    pub fn finish_interview_prep(&mut self, guide_token: Option<String>) {
        self.guide_token = guide_token;
        self.mode = SessionMode::Analyzed;
        self.touch();
    }

    /// Resets to Idle, dropping analysis and history (the bot's /start).
    pub fn reset(&mut self) -> Option<String> {
        self.mode = SessionMode::Idle;
        self.resume_data = None;
        self.chat_history.clear();
        self.source_filename = None;
        self.touch();
        self.guide_token.take()
    }

    /// The analyzed data, or `NoActiveAnalysis`.
    pub fn analyzed_data(&self) -> Result<&ResumeData> {
        self.resume_data
            .as_ref()
            .ok_or_else(|| Error::no_analysis("upload and analyze a resume first".to_string()))
    }

    fn require_analysis(&self, action: &str) -> Result<()> {
        if self.resume_data.is_none() {
            return Err(Error::no_analysis(format!(
                "cannot start {action} before a resume has been analyzed"
            )));
        }
        Ok(())
    }
}
