//! Deterministic plain-text rendering of analysis results and guides.
//!
//! Output is section-ordered and capped at the provider message limit so
//! the same data always renders to the same string.

use std::fmt::Write;

use crate::guide::InterviewGuide;
use crate::limits::MAX_RENDERED_CHARS;
use crate::resume::ResumeData;

/// Renders analyzed resume data for display.
pub fn render_resume(data: &ResumeData) -> String {
    let mut out = String::from("RESUME ANALYSIS\n\n");

    let pi = &data.personal_info;
    if pi != &Default::default() {
        out.push_str("Personal Information:\n");
        push_field(&mut out, "Name", pi.name.as_deref());
        push_field(&mut out, "Email", pi.email.as_deref());
        push_field(&mut out, "Phone", pi.phone.as_deref());
        push_field(&mut out, "Location", pi.location.as_deref());
        push_field(&mut out, "LinkedIn", pi.linkedin.as_deref());
        push_field(&mut out, "GitHub", pi.github.as_deref());
        out.push('\n');
    }

    if let Some(summary) = data.summary.as_deref() {
        let _ = writeln!(out, "Summary:\n{summary}\n");
    }

    if !data.experience.is_empty() {
        out.push_str("Work Experience:\n");
        for exp in &data.experience {
            let _ = writeln!(
                out,
                "- {} at {}",
                exp.position.as_deref().unwrap_or("N/A"),
                exp.company.as_deref().unwrap_or("N/A"),
            );
            if let Some(duration) = exp.duration.as_deref() {
                let _ = writeln!(out, "  Duration: {duration}");
            }
            for resp in exp.responsibilities.iter().take(3) {
                let _ = writeln!(out, "    * {resp}");
            }
        }
        out.push('\n');
    }

    if !data.education.is_empty() {
        out.push_str("Education:\n");
        for edu in &data.education {
            let _ = writeln!(
                out,
                "- {} from {}",
                edu.degree.as_deref().unwrap_or("N/A"),
                edu.institution.as_deref().unwrap_or("N/A"),
            );
            if let Some(date) = edu.graduation_date.as_deref() {
                let _ = writeln!(out, "  Graduated: {date}");
            }
            if let Some(gpa) = edu.gpa.as_deref() {
                let _ = writeln!(out, "  GPA: {gpa}");
            }
        }
        out.push('\n');
    }

    if !data.skills.is_empty() {
        out.push_str("Skills:\n");
        push_list(&mut out, "Technical", &data.skills.technical, 10);
        push_list(&mut out, "Programming", &data.skills.languages, 8);
        push_list(&mut out, "Tools", &data.skills.tools, 8);
        push_list(&mut out, "Soft skills", &data.skills.soft, 8);
        out.push('\n');
    }

    if !data.achievements.is_empty() {
        out.push_str("Achievements:\n");
        for ach in data.achievements.iter().take(5) {
            let _ = writeln!(out, "- {ach}");
        }
    }

    truncate_chars(out, MAX_RENDERED_CHARS)
}

/// Renders an interview guide for display.
pub fn render_guide(guide: &InterviewGuide) -> String {
    let mut out = String::from("INTERVIEW PREPARATION GUIDE\n\n");

    if !guide.likely_questions.is_empty() {
        out.push_str("Likely Interview Questions:\n");
        for (i, q) in guide.likely_questions.iter().take(5).enumerate() {
            let _ = writeln!(
                out,
                "{}. {} [{}]",
                i + 1,
                q.question.as_deref().unwrap_or("N/A"),
                q.category.as_deref().unwrap_or("general"),
            );
            if !q.key_points.is_empty() {
                let _ = writeln!(out, "   Key points: {}", q.key_points[..q.key_points.len().min(3)].join(", "));
            }
        }
        out.push('\n');
    }

    if !guide.strengths_to_highlight.is_empty() {
        out.push_str("Your Key Strengths:\n");
        for s in guide.strengths_to_highlight.iter().take(3) {
            let _ = writeln!(out, "- {}", s.strength.as_deref().unwrap_or("N/A"));
            if let Some(evidence) = s.evidence.as_deref() {
                let _ = writeln!(out, "  Evidence: {evidence}");
            }
        }
        out.push('\n');
    }

    if !guide.technical_preparation.is_empty() {
        out.push_str("Technical Preparation:\n");
        for t in guide.technical_preparation.iter().take(3) {
            let _ = writeln!(out, "- {}", t.skill.as_deref().unwrap_or("N/A"));
            if let Some(first) = t.depth_questions.first() {
                let _ = writeln!(out, "  Expect: {first}");
            }
        }
        out.push('\n');
    }

    if !guide.questions_to_ask.is_empty() {
        out.push_str("Questions You Should Ask:\n");
        for (i, q) in guide.questions_to_ask.iter().take(3).enumerate() {
            let _ = writeln!(out, "{}. {q}", i + 1);
        }
        out.push('\n');
    }

    if !guide.interview_tips.is_empty() {
        out.push_str("Tips:\n");
        for tip in guide.interview_tips.iter().take(3) {
            let _ = writeln!(out, "- {tip}");
        }
    }

    truncate_chars(out, MAX_RENDERED_CHARS)
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(v) = value {
        let _ = writeln!(out, "- {label}: {v}");
    }
}

fn push_list(out: &mut String, label: &str, items: &[String], cap: usize) {
    if !items.is_empty() {
        let _ = writeln!(out, "- {label}: {}", items[..items.len().min(cap)].join(", "));
    }
}

/// Truncates to at most `max` characters on a char boundary.
fn truncate_chars(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        return s;
    }
    s.chars().take(max).collect()
}
