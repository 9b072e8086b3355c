//! PDF text extraction.

use resume_core::error::{Error, Result};

/// Extracts text from in-memory PDF bytes.
///
/// Page text arrives already newline-separated; we only trim.
pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| Error::extraction(format!("could not decode PDF: {e}")))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(Error::extraction("PDF contained no extractable text"));
    }
    Ok(text.to_string())
}
