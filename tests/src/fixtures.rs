//! Shared test fixtures.

use resume_core::ResumeData;

/// Plain-text resume long enough to pass the minimum-length gate.
pub const RESUME_TXT: &[u8] = b"Jane Doe\n\
jane@x.com | +1 555 0100 | Springfield\n\
Senior Rust Engineer\n\
Experience: Acme Corp, 2018-2024, built ingestion pipelines in Rust.\n\
Education: Springfield University, BSc Computer Science, 2017.\n\
Skills: Rust, Tokio, Axum, PostgreSQL.";

/// The synthetic extraction result every mock analysis returns.
pub fn jane_doe() -> ResumeData {
    serde_json::from_str(
        r#"{
            "personal_info": {"name": "Jane Doe", "email": "jane@x.com"},
            "experience": [],
            "education": [],
            "skills": {}
        }"#,
    )
    .expect("fixture must parse")
}
