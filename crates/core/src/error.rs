//! Unified error types for the resume engine.
//!
//! Every external-collaborator failure (decoder, LLM, messaging provider)
//! is converted into one of these kinds at the component boundary; handlers
//! never see raw transport errors.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the resume engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Upload rejected before any extraction attempt: unsupported extension,
    /// oversized, or empty payload.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// The decoder could not produce text, or the text is too short to be a
    /// plausible resume.
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    /// The LLM call errored or returned a non-parseable structure.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// Chat or interview prep requested without a prior successful analysis.
    #[error("no analyzed resume for this session: {0}")]
    NoActiveAnalysis(String),

    /// Interview type not in the supported set.
    #[error("invalid interview type: {0}")]
    InvalidInterviewType(String),

    /// Session id not present in the store.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Export token unknown, already consumed, or expired.
    #[error("export not found: {0}")]
    ExportNotFound(String),

    /// Start when running, or stop when stopped. Rejected synchronously,
    /// never queued.
    #[error("lifecycle conflict: {0}")]
    LifecycleConflict(&'static str),

    /// The background worker exited on an unhandled error.
    #[error("worker crashed: {0}")]
    WorkerCrashed(String),

    /// Messaging-provider failure (poll, download, send).
    #[error("provider error: {0}")]
    Provider(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// `LifecycleConflict` message for a start while not stopped.
pub const ALREADY_RUNNING: &str = "already running";

/// `LifecycleConflict` message for a stop while not running.
pub const NOT_RUNNING: &str = "not running";

impl Error {
    pub fn invalid_file(msg: impl Into<String>) -> Self {
        Self::InvalidFile(msg.into())
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::ExtractionFailed(msg.into())
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::AnalysisFailed(msg.into())
    }

    pub fn no_analysis(msg: impl Into<String>) -> Self {
        Self::NoActiveAnalysis(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn already_running() -> Self {
        Self::LifecycleConflict(ALREADY_RUNNING)
    }

    pub fn not_running() -> Self {
        Self::LifecycleConflict(NOT_RUNNING)
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidFile(_) => 400,
            Self::ExtractionFailed(_) => 400,
            Self::AnalysisFailed(_) => 502,
            Self::NoActiveAnalysis(_) => 400,
            Self::InvalidInterviewType(_) => 400,
            Self::SessionNotFound(_) => 404,
            Self::ExportNotFound(_) => 404,
            Self::LifecycleConflict(_) => 400,
            Self::WorkerCrashed(_) => 500,
            Self::Provider(_) => 502,
            Self::Serialization(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFile(_) => "INVALID_FILE",
            Self::ExtractionFailed(_) => "EXTRACTION_FAILED",
            Self::AnalysisFailed(_) => "ANALYSIS_FAILED",
            Self::NoActiveAnalysis(_) => "NO_ACTIVE_ANALYSIS",
            Self::InvalidInterviewType(_) => "INVALID_INTERVIEW_TYPE",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::ExportNotFound(_) => "EXPORT_NOT_FOUND",
            Self::LifecycleConflict(_) => "LIFECYCLE_CONFLICT",
            Self::WorkerCrashed(_) => "WORKER_CRASHED",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
