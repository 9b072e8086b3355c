//! Mock implementations for testing.
//!
//! These implement the same traits as the production collaborators
//! (`ResumeAnalyzer`, `MessageGateway`), so the full router and lifecycle
//! manager run their real code paths against canned backends.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use resume_core::error::{Error, Result};
use resume_core::{InterviewGuide, InterviewType, ResumeData};
use worker::{InboundUpdate, MessageGateway};

use crate::fixtures;

/// Analyzer returning the Jane Doe fixture, with programmable failure and
/// call counting.
#[derive(Default)]
pub struct MockAnalyzer {
    pub analyze_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    pub prep_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockAnalyzer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(Error::analysis("mock analyzer failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl gemini_client::ResumeAnalyzer for MockAnalyzer {
    async fn analyze_resume(&self, _resume_text: &str) -> Result<ResumeData> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(fixtures::jane_doe())
    }

    async fn chat(&self, question: &str, _resume: &ResumeData) -> Result<String> {
        let call = self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        // First answer is the slowest; ordering must not depend on latency.
        if call == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        Ok(format!("re: {question}"))
    }

    async fn interview_prep(
        &self,
        _resume: &ResumeData,
        interview_type: InterviewType,
    ) -> Result<InterviewGuide> {
        self.prep_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(InterviewGuide {
            interview_tips: vec![format!("prepare for a {interview_type} interview")],
            ..Default::default()
        })
    }
}

/// Gateway that polls nothing and records outbound traffic.
#[derive(Default)]
pub struct MockGateway {
    pub sent_texts: Mutex<Vec<(i64, String)>>,
    fail_connection: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_connection(&self, fail: bool) {
        self.fail_connection.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageGateway for MockGateway {
    async fn check_connection(&self) -> Result<()> {
        if self.fail_connection.load(Ordering::SeqCst) {
            return Err(Error::provider("mock gateway unauthorized"));
        }
        Ok(())
    }

    async fn poll_updates(&self, offset: i64) -> Result<(Vec<InboundUpdate>, i64)> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok((Vec::new(), offset))
    }

    async fn download_document(&self, _file_id: &str) -> Result<Bytes> {
        Ok(Bytes::from_static(fixtures::RESUME_TXT))
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent_texts.lock().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_document(&self, _chat_id: i64, _file_name: &str, _bytes: Bytes) -> Result<()> {
        Ok(())
    }
}
