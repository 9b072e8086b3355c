//! Size and time limits for the resume engine.
//!
//! Upload limits are checked before any decoding or network call so that
//! oversized or unsupported files fail fast and cheaply.

use std::time::Duration;

// === Upload Limits ===

/// Maximum upload size in bytes (20 MiB), matching the messaging provider's
/// document ceiling.
pub const MAX_UPLOAD_SIZE_BYTES: usize = 20 * 1024 * 1024;

/// Extensions accepted for upload. Image types are accepted but text
/// extraction for them is unimplemented; the user gets an explicit
/// "not supported yet" reply instead of a silent failure.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "docx", "txt", "jpg", "jpeg", "png", "bmp", "tiff",
];

/// Image extensions within the supported set (accepted, not extracted).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

/// Minimum extracted-text length for a plausible resume. Shorter output is
/// treated as an extraction failure rather than sent to the analyzer.
pub const MIN_RESUME_TEXT_CHARS: usize = 50;

// === Rendering Limits ===

/// Cap on rendered analysis and guide text (messaging-provider message
/// ceiling).
pub const MAX_RENDERED_CHARS: usize = 4000;

/// Maximum chat question length accepted from callers.
pub const MAX_CHAT_MESSAGE_CHARS: usize = 4000;

// === Timeout Policy ===

/// Upper bound on a single extraction or interview-prep LLM call.
pub const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a single chat LLM call.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

// === Session Eviction ===

/// Default inactivity window before a session is reclaimed by the sweep.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default interval between eviction sweeps.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Lifetime of an interview-guide export token.
pub const EXPORT_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Returns true when `ext` (lowercase, no dot) is in the supported set.
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext)
}

/// Returns true when `ext` is an accepted-but-unextractable image type.
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// Lowercased extension of `file_name`, without the dot.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
