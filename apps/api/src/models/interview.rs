use serde::{Deserialize, Serialize};

/// Highest score the evaluation endpoint may assign to a single answer.
pub const MAX_SCORE: u8 = 10;

/// A generated interview question. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    /// One of "basic", "medium", "hard", "deep_dive". Kept as free text.
    pub difficulty: String,
    pub skill_focus: String,
}

/// Everything the resume-analysis endpoint returns besides the skill list.
/// Parsed leniently: the workflow only depends on `skills`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

/// A single question paired with the candidate's answer, in question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub question: String,
    pub score: u8, // 0..=10
    pub feedback: String,
}

/// Scored feedback for a full answer set. Every field is required on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub evaluations: Vec<Evaluation>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub overall_readiness_summary: String,
}

impl Feedback {
    /// Checks the constraints serde cannot express. Returns a description of
    /// the first violation.
    pub fn validate(&self) -> Result<(), String> {
        match self.evaluations.iter().find(|e| e.score > MAX_SCORE) {
            Some(e) => Err(format!(
                "score {} for \"{}\" is outside 0-{MAX_SCORE}",
                e.score, e.question
            )),
            None => Ok(()),
        }
    }
}
