//! Document text extraction.
//!
//! Converts uploaded bytes into plain text, or reports the accepted-but-
//! unsupported image case. Decoding is CPU-bound and runs on the blocking
//! pool; the uploaded bytes are owned values scoped to the call, so there is
//! no temporary storage to clean up on any path.

pub mod docx;
pub mod pdf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use resume_core::error::{Error, Result};
use resume_core::limits;

/// Outcome of text extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Plain text pulled out of the document.
    Text(String),
    /// The file type is accepted but OCR is not implemented; the caller must
    /// surface this to the user rather than fail silently.
    ImageUnsupported,
}

/// Converts file bytes into extracted text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file_name: &str, bytes: Bytes) -> Result<Extraction>;
}

/// Default extractor dispatching on file extension.
#[derive(Debug, Default, Clone)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, file_name: &str, bytes: Bytes) -> Result<Extraction> {
        let ext = limits::file_extension(file_name)
            .ok_or_else(|| Error::invalid_file(format!("{file_name}: missing extension")))?;

        if limits::is_image_extension(&ext) {
            warn!(file = %file_name, "image upload accepted but OCR is not implemented");
            return Ok(Extraction::ImageUnsupported);
        }

        let text = match ext.as_str() {
            "txt" => text_from_utf8(&bytes)?,
            "pdf" => {
                tokio::task::spawn_blocking(move || pdf::extract_pdf(&bytes))
                    .await
                    .map_err(|e| Error::internal(format!("decoder task failed: {e}")))??
            }
            "docx" => {
                tokio::task::spawn_blocking(move || docx::extract_docx(&bytes))
                    .await
                    .map_err(|e| Error::internal(format!("decoder task failed: {e}")))??
            }
            // Unreachable behind the upload extension gate.
            other => return Err(Error::invalid_file(format!("unsupported extension: {other}"))),
        };

        debug!(file = %file_name, chars = text.len(), "extracted document text");
        Ok(Extraction::Text(text))
    }
}

fn text_from_utf8(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::extraction(format!("text file is not valid UTF-8: {e}")))?;
    Ok(text.trim().to_string())
}
