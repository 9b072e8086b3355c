//! DOCX text extraction.
//!
//! A .docx is a zip archive; the body lives in `word/document.xml`. Text is
//! collected from `w:t` runs, with a newline per paragraph and a space per
//! tab, which also covers table cells (they contain ordinary paragraphs).

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use resume_core::error::{Error, Result};

pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::extraction(format!("could not open DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| Error::extraction(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| Error::extraction(format!("could not read DOCX body: {e}")))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push(' '),
                b"br" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let chunk = t
                    .unescape()
                    .map_err(|e| Error::extraction(format!("malformed DOCX text run: {e}")))?;
                text.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::extraction(format!("malformed DOCX XML: {e}")));
            }
        }
    }

    let text = text.trim();
    if text.is_empty() {
        return Err(Error::extraction("DOCX contained no extractable text"));
    }
    Ok(text.to_string())
}
