//! Gemini-backed resume analysis.
//!
//! Three operations share one wire shape: structured extraction from resume
//! text, free-form chat grounded in analyzed data, and interview-guide
//! generation. All network failures are converted to `AnalysisFailed` at
//! this boundary.

pub mod client;
pub mod config;
pub mod prompts;

use async_trait::async_trait;

use resume_core::error::Result;
use resume_core::{InterviewGuide, InterviewType, ResumeData};

pub use client::GeminiClient;
pub use config::GeminiConfig;

/// LLM-backed analysis operations.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    /// Converts extracted plain text into structured resume data.
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeData>;

    /// Answers a question about previously analyzed data.
    async fn chat(&self, question: &str, resume: &ResumeData) -> Result<String>;

    /// Generates an interview-preparation guide from analyzed data.
    async fn interview_prep(
        &self,
        resume: &ResumeData,
        interview_type: InterviewType,
    ) -> Result<InterviewGuide>;
}
