//! Interview-preparation guide types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Interview flavor a guide is generated for.
///
/// Parsing is strict: an unrecognized value is a validation error, not a
/// silent fallback to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    General,
    Technical,
    Behavioral,
    Leadership,
}

impl InterviewType {
    pub const ALL: [InterviewType; 4] = [
        Self::General,
        Self::Technical,
        Self::Behavioral,
        Self::Leadership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
            Self::Leadership => "leadership",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "technical" => Ok(Self::Technical),
            "behavioral" => Ok(Self::Behavioral),
            "leadership" => Ok(Self::Leadership),
            other => Err(Error::InvalidInterviewType(format!(
                "{other:?} (expected one of: general, technical, behavioral, leadership)"
            ))),
        }
    }
}

/// A likely interview question with guidance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikelyQuestion {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub suggested_answer: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// A strength worth leading with, plus supporting evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub how_to_present: Option<String>,
}

/// A potential concern and how to reframe it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    #[serde(default)]
    pub weakness: Option<String>,
    #[serde(default)]
    pub mitigation: Option<String>,
    #[serde(default)]
    pub reframe: Option<String>,
}

/// Deep-dive preparation for one technical skill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalPrep {
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub depth_questions: Vec<String>,
    #[serde(default)]
    pub preparation_tips: Option<String>,
}

/// A STAR-method scenario drawn from the candidate's experience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehavioralScenario {
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub situation: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

/// Compensation-discussion guidance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryNegotiation {
    #[serde(default)]
    pub market_range: Option<String>,
    #[serde(default)]
    pub negotiation_points: Vec<String>,
    #[serde(default)]
    pub preparation_tips: Option<String>,
}

/// Full structured interview-preparation guide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewGuide {
    #[serde(default)]
    pub likely_questions: Vec<LikelyQuestion>,
    #[serde(default)]
    pub strengths_to_highlight: Vec<Strength>,
    #[serde(default)]
    pub potential_weaknesses: Vec<Weakness>,
    #[serde(default)]
    pub technical_preparation: Vec<TechnicalPrep>,
    #[serde(default)]
    pub behavioral_scenarios: Vec<BehavioralScenario>,
    #[serde(default)]
    pub questions_to_ask: Vec<String>,
    #[serde(default)]
    pub salary_negotiation: Option<SalaryNegotiation>,
    #[serde(default)]
    pub interview_tips: Vec<String>,
}
