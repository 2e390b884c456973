//! Workflow Orchestrator. Owns the single `Session`, gates every stage
//! transition, and folds inference responses back into the session.
//!
//! Locking: the session mutex is never held across a network call. The
//! `pending` flag is the one in-flight slot; a transition that finds it set
//! fails with `WorkflowError::Busy` without dispatching anything.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::inference::{InferenceService, RequestError};
use crate::workflow::resume_text::extract_pdf_text;
use crate::workflow::session::{
    build_qa_pairs, Operation, Precondition, Session, Stage, WorkflowError,
};

struct Inner {
    session: Session,
    /// Bumped by `reset`. A response whose ticket no longer matches belongs to
    /// a discarded session.
    epoch: u64,
}

impl Inner {
    /// Entry check shared by every network-invoking operation.
    fn begin(&mut self) -> Result<(), WorkflowError> {
        self.session.error = None;
        if self.session.pending {
            return Err(self.reject(WorkflowError::Busy));
        }
        Ok(())
    }

    /// Records `err` as the displayable session error and hands it back.
    fn reject(&mut self, err: impl Into<WorkflowError>) -> WorkflowError {
        let err = err.into();
        self.session.error = Some(err.to_string());
        err
    }

    fn dispatch(&mut self) -> u64 {
        self.session.pending = true;
        self.epoch
    }
}

pub struct Orchestrator {
    service: Arc<dyn InferenceService>,
    inner: Mutex<Inner>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn InferenceService>) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner {
                session: Session::default(),
                epoch: 0,
            }),
        }
    }

    /// Read-only copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.inner.lock().await.session.clone()
    }

    /// Input -> SkillsReady.
    pub async fn submit_resume(&self, text: &str) -> Result<(), WorkflowError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.begin()?;
            if text.trim().is_empty() {
                return Err(inner.reject(Precondition::EmptyResume));
            }
            inner.session.resume_text = text.to_string();
            inner.dispatch()
        };

        info!("Submitting resume for analysis ({} chars)", text.len());
        let result = self.service.analyze_resume(text).await;

        self.fold(ticket, Operation::ResumeAnalysis, result, |session, analysis| {
            session.skills = analysis.skills;
            session.profile = Some(analysis.profile);
            session.questions.clear();
            session.answers.clear();
            session.feedback = None;
            session.stage = Stage::SkillsReady;
        })
        .await
    }

    /// Extracts text from a PDF resume, then proceeds as `submit_resume`.
    pub async fn submit_resume_pdf(&self, pdf: Vec<u8>) -> Result<(), WorkflowError> {
        self.inner.lock().await.begin()?;

        // pdf-extract can panic on malformed input; the join error covers it.
        let extracted = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf))
            .await
            .unwrap_or_else(|e| Err(Precondition::UnreadablePdf(e.to_string())));

        match extracted {
            Ok(text) => self.submit_resume(&text).await,
            Err(precondition) => Err(self.reject_extraction(precondition).await),
        }
    }

    /// Records an extraction failure. No busy check: a request started during
    /// extraction must not mask why this upload was refused.
    async fn reject_extraction(&self, precondition: Precondition) -> WorkflowError {
        self.inner.lock().await.reject(precondition)
    }

    /// SkillsReady -> QuestionsReady. Clears any previously recorded answers.
    pub async fn request_questions(&self) -> Result<(), WorkflowError> {
        let (ticket, skills) = {
            let mut inner = self.inner.lock().await;
            inner.begin()?;
            // Skills are only ever non-empty from SkillsReady on.
            if inner.session.skills.is_empty() {
                return Err(inner.reject(Precondition::NoSkills));
            }
            let skills = inner.session.skills.clone();
            (inner.dispatch(), skills)
        };

        info!("Requesting questions for {} skills", skills.len());
        let result = self.service.generate_questions(&skills).await;

        self.fold(ticket, Operation::QuestionGeneration, result, |session, questions| {
            session.questions = questions;
            session.answers.clear();
            session.feedback = None;
            session.stage = Stage::QuestionsReady;
        })
        .await
    }

    /// Local upsert. Never touches `pending`, `error` or `stage`.
    pub async fn record_answer(&self, question: &str, answer: &str) -> Result<(), WorkflowError> {
        let mut inner = self.inner.lock().await;
        if inner.session.questions.is_empty() {
            return Err(Precondition::NoQuestions.into());
        }
        inner
            .session
            .answers
            .insert(question.to_string(), answer.to_string());
        Ok(())
    }

    /// QuestionsReady -> FeedbackReady. Every question needs a non-blank answer.
    pub async fn submit_answers(&self) -> Result<(), WorkflowError> {
        let (ticket, qa_pairs) = {
            let mut inner = self.inner.lock().await;
            inner.begin()?;
            if inner.session.stage < Stage::QuestionsReady || inner.session.questions.is_empty() {
                return Err(inner.reject(Precondition::NoQuestions));
            }
            let qa_pairs = match build_qa_pairs(&inner.session.questions, &inner.session.answers) {
                Ok(pairs) => pairs,
                Err(precondition) => return Err(inner.reject(precondition)),
            };
            (inner.dispatch(), qa_pairs)
        };

        info!("Submitting {} answers for evaluation", qa_pairs.len());
        let result = self.service.evaluate_answers(&qa_pairs).await;

        self.fold(ticket, Operation::AnswerEvaluation, result, |session, feedback| {
            session.feedback = Some(feedback);
            session.stage = Stage::FeedbackReady;
        })
        .await
    }

    /// Back to an empty `Input` session. Any response still in flight will be
    /// dropped when it arrives.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        if inner.session.pending {
            debug!("Reset while a request is in flight; its response will be discarded");
        }
        inner.session = Session::default();
        inner.epoch = inner.epoch.wrapping_add(1);
        info!("Session reset");
    }

    /// Merges a response (or failure) into the session that dispatched it.
    async fn fold<T>(
        &self,
        ticket: u64,
        operation: Operation,
        result: Result<T, RequestError>,
        apply: impl FnOnce(&mut Session, T),
    ) -> Result<(), WorkflowError> {
        let mut inner = self.inner.lock().await;
        if inner.epoch != ticket {
            debug!("Dropping {operation} response for a reset session");
            return Err(WorkflowError::Superseded);
        }
        inner.session.pending = false;

        match result {
            Ok(value) => {
                apply(&mut inner.session, value);
                inner.session.error = None;
                info!("{operation} succeeded, stage is now {:?}", inner.session.stage);
                Ok(())
            }
            Err(source) => {
                let err = WorkflowError::Request { operation, source };
                warn!("{err}");
                Err(inner.reject(err))
            }
        }
    }
}
