use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::inference::RequestError;
use crate::models::interview::{CandidateProfile, Feedback, QaPair, Question};

/// The four workflow stages, in order. Transitions are linear; `reset` is the
/// only way back to `Input`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Input,
    SkillsReady,
    QuestionsReady,
    FeedbackReady,
}

/// The single mutable aggregate. Only the orchestrator mutates it; everyone
/// else sees clones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub stage: Stage,
    pub resume_text: String,
    /// Extraction order is preserved.
    pub skills: Vec<String>,
    pub profile: Option<CandidateProfile>,
    pub questions: Vec<Question>,
    /// question text -> answer text
    pub answers: HashMap<String, String>,
    pub feedback: Option<Feedback>,
    pub error: Option<String>,
    pub pending: bool,
}

/// The external call made by a stage transition. Names the failed step in
/// user-facing error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ResumeAnalysis,
    QuestionGeneration,
    AnswerEvaluation,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::ResumeAnalysis => "Resume analysis",
            Operation::QuestionGeneration => "Question generation",
            Operation::AnswerEvaluation => "Answer evaluation",
        })
    }
}

/// An unmet precondition. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("resume text required")]
    EmptyResume,

    #[error("could not read PDF: {0}")]
    UnreadablePdf(String),

    #[error("no skills available")]
    NoSkills,

    #[error("no questions available")]
    NoQuestions,

    #[error("{unanswered} of {total} questions unanswered")]
    Unanswered { unanswered: usize, total: usize },
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(#[from] Precondition),

    #[error("a request is already in progress")]
    Busy,

    #[error("{operation} failed: {source}")]
    Request {
        operation: Operation,
        #[source]
        source: RequestError,
    },

    /// The session was reset while this call's request was outstanding. Its
    /// result was dropped instead of being folded into the new session.
    #[error("session was reset before the response arrived")]
    Superseded,
}

/// Pairs every question with its answer, in question order. Fails with the
/// number of questions lacking a non-blank answer.
pub fn build_qa_pairs(
    questions: &[Question],
    answers: &HashMap<String, String>,
) -> Result<Vec<QaPair>, Precondition> {
    let pairs: Vec<QaPair> = questions
        .iter()
        .filter_map(|q| {
            answers
                .get(&q.question)
                .filter(|a| !a.trim().is_empty())
                .map(|a| QaPair {
                    question: q.question.clone(),
                    answer: a.clone(),
                })
        })
        .collect();

    let unanswered = questions.len() - pairs.len();
    if unanswered > 0 {
        return Err(Precondition::Unanswered {
            unanswered,
            total: questions.len(),
        });
    }
    Ok(pairs)
}
