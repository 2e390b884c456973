//! Scripted in-process `InferenceService` for orchestrator and route tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::inference::{InferenceService, RequestError, ResumeAnalysis};
use crate::models::interview::{Evaluation, Feedback, QaPair, Question};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AnalyzeResume(String),
    GenerateQuestions(Vec<String>),
    EvaluateAnswers(Vec<QaPair>),
}

/// Replies from per-endpoint queues, in order. An empty queue answers 500.
/// With a gate set, every call parks until the gate is notified.
#[derive(Default)]
pub struct ScriptedService {
    resume: Mutex<VecDeque<Result<ResumeAnalysis, RequestError>>>,
    questions: Mutex<VecDeque<Result<Vec<Question>, RequestError>>>,
    feedback: Mutex<VecDeque<Result<Feedback, RequestError>>>,
    calls: Mutex<Vec<Call>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn with_skills(self, skills: &[&str]) -> Self {
        self.resume.lock().unwrap().push_back(Ok(ResumeAnalysis {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..ResumeAnalysis::default()
        }));
        self
    }

    pub fn with_resume_result(self, result: Result<ResumeAnalysis, RequestError>) -> Self {
        self.resume.lock().unwrap().push_back(result);
        self
    }

    pub fn with_questions(self, texts: &[&str]) -> Self {
        self.questions
            .lock()
            .unwrap()
            .push_back(Ok(texts.iter().map(|t| question(t)).collect()));
        self
    }

    pub fn with_questions_result(self, result: Result<Vec<Question>, RequestError>) -> Self {
        self.questions.lock().unwrap().push_back(result);
        self
    }

    pub fn with_feedback(self, feedback: Feedback) -> Self {
        self.feedback.lock().unwrap().push_back(Ok(feedback));
        self
    }

    pub fn with_feedback_result(self, result: Result<Feedback, RequestError>) -> Self {
        self.feedback.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn park(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

fn unscripted<T>() -> Result<T, RequestError> {
    Err(RequestError::Status {
        status: 500,
        detail: Some("unscripted call".to_string()),
    })
}

pub fn question(text: &str) -> Question {
    Question {
        question: text.to_string(),
        difficulty: "medium".to_string(),
        skill_focus: "distributed systems".to_string(),
    }
}

pub fn feedback_scoring(question: &str, score: u8) -> Feedback {
    Feedback {
        evaluations: vec![Evaluation {
            question: question.to_string(),
            score,
            feedback: "Covers the main trade-offs.".to_string(),
        }],
        strengths: vec!["Clear structure".to_string()],
        improvements: vec!["Quantify impact".to_string()],
        overall_readiness_summary: "Close to interview ready.".to_string(),
    }
}

pub fn server_error(detail: &str) -> RequestError {
    RequestError::Status {
        status: 500,
        detail: Some(detail.to_string()),
    }
}

/// A one-page PDF showing `text` in Helvetica, with a correct xref table.
pub fn single_line_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.into_bytes()
}

#[async_trait]
impl InferenceService for ScriptedService {
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, RequestError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::AnalyzeResume(resume_text.to_string()));
        self.park().await;
        let next = self.resume.lock().unwrap().pop_front();
        next.unwrap_or_else(unscripted)
    }

    async fn generate_questions(&self, skills: &[String]) -> Result<Vec<Question>, RequestError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::GenerateQuestions(skills.to_vec()));
        self.park().await;
        let next = self.questions.lock().unwrap().pop_front();
        next.unwrap_or_else(unscripted)
    }

    async fn evaluate_answers(&self, qa_pairs: &[QaPair]) -> Result<Feedback, RequestError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::EvaluateAnswers(qa_pairs.to_vec()));
        self.park().await;
        let next = self.feedback.lock().unwrap().pop_front();
        next.unwrap_or_else(unscripted)
    }
}
