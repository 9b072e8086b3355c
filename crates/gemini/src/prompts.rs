//! Prompt templates for the three analysis operations.
//!
//! JSON-producing prompts instruct the model to return bare JSON; the client
//! still strips markdown fences defensively before parsing.

use resume_core::{InterviewType, ResumeData};

pub const EXTRACTION_PROMPT: &str = r#"You are an expert resume parser. Extract the following information from the resume text and return it as a JSON object:

{
    "personal_info": {
        "name": "Full name",
        "email": "Email address",
        "phone": "Phone number",
        "location": "City, State/Country",
        "linkedin": "LinkedIn profile URL",
        "github": "GitHub profile URL",
        "portfolio": "Portfolio website URL"
    },
    "summary": "Professional summary or objective",
    "experience": [
        {
            "company": "Company name",
            "position": "Job title",
            "duration": "Start date - End date",
            "location": "City, State",
            "responsibilities": ["List of key responsibilities and achievements"]
        }
    ],
    "education": [
        {
            "institution": "School/University name",
            "degree": "Degree type and field",
            "graduation_date": "Graduation date",
            "gpa": "GPA if mentioned",
            "location": "City, State"
        }
    ],
    "skills": {
        "technical": ["List of technical skills"],
        "soft": ["List of soft skills"],
        "languages": ["Programming languages"],
        "tools": ["Tools and software"]
    },
    "projects": [
        {
            "name": "Project name",
            "description": "Project description",
            "technologies": ["Technologies used"],
            "url": "Project URL if available"
        }
    ],
    "certifications": [
        {
            "name": "Certification name",
            "issuer": "Issuing organization",
            "date": "Issue date",
            "expiry": "Expiry date if applicable"
        }
    ],
    "achievements": ["List of notable achievements or awards"]
}

Instructions:
1. Extract only information that is explicitly mentioned in the resume
2. If information is not available, use null or an empty array
3. Be accurate and do not make assumptions
4. Return valid JSON only, no markdown fences and no explanations
5. For dates, keep the original format from the resume

Resume text:
"#;

/// Builds the extraction prompt for one resume.
pub fn extraction_prompt(resume_text: &str) -> String {
    format!("{EXTRACTION_PROMPT}{resume_text}")
}

/// Builds the chat prompt for one question over analyzed data.
pub fn chat_prompt(question: &str, resume: &ResumeData) -> String {
    let context = serde_json::to_string_pretty(resume).unwrap_or_default();
    format!(
        "You are a helpful assistant specializing in resume analysis and career advice.\n\
         You have access to the following resume data:\n\n{context}\n\n\
         The user is asking: \"{question}\"\n\n\
         Provide a helpful, informative response based on the resume data. You can \
         answer questions about specific details, give career advice, suggest resume \
         improvements, and offer interview preparation tips grounded in this background.\n\
         Keep the response conversational and under 1000 characters."
    )
}

/// Builds the interview-preparation prompt for one interview type.
pub fn interview_prompt(interview_type: InterviewType, resume: &ResumeData) -> String {
    let context = serde_json::to_string_pretty(resume).unwrap_or_default();
    format!(
        r#"You are an expert interview coach. Based on the following resume data, create a comprehensive preparation guide for a {interview_type} interview.

Resume data:
{context}

Return a JSON object with exactly this structure:

{{
    "likely_questions": [
        {{
            "question": "Sample interview question",
            "category": "behavioral/technical/situational",
            "suggested_answer": "How to approach this question based on the resume",
            "key_points": ["Point 1", "Point 2"]
        }}
    ],
    "strengths_to_highlight": [
        {{"strength": "Key strength", "evidence": "Specific examples from the resume", "how_to_present": "How to articulate it"}}
    ],
    "potential_weaknesses": [
        {{"weakness": "Potential concern", "mitigation": "How to address it", "reframe": "How to turn it into a positive"}}
    ],
    "technical_preparation": [
        {{"skill": "Skill from the resume", "depth_questions": ["Possible deep-dive questions"], "preparation_tips": "How to prepare"}}
    ],
    "behavioral_scenarios": [
        {{"scenario": "STAR scenario from experience", "situation": "Context", "task": "What needed doing", "action": "What they did", "result": "Outcome"}}
    ],
    "questions_to_ask": ["Thoughtful questions for the interviewer"],
    "salary_negotiation": {{
        "market_range": "Estimated range based on experience",
        "negotiation_points": ["Factors justifying higher compensation"],
        "preparation_tips": "How to approach the discussion"
    }},
    "interview_tips": ["Specific tips based on this background"]
}}

Every suggestion must be grounded in the resume data provided. Return valid JSON only, no markdown fences."#
    )
}
