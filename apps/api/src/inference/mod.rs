//! Inference client: the single point of entry for calls to the external
//! inference service (resume analysis, question generation, answer scoring).
//!
//! ARCHITECTURAL RULE: the workflow never talks HTTP itself. It only sees the
//! `InferenceService` trait, so tests can swap in an in-process fake.
//!
//! Every failure is normalized into one
//! `RequestError` whose `Display` is safe to show to the user.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::interview::{CandidateProfile, Feedback, QaPair, Question};

const ANALYZE_RESUME_PATH: &str = "/analyze-resume";
const GENERATE_QUESTIONS_PATH: &str = "/generate-questions";
const EVALUATE_ANSWERS_PATH: &str = "/evaluate-answers";
const HEALTH_PATH: &str = "/";

#[derive(Debug, Error)]
pub enum RequestError {
    /// Non-2xx response. `detail` is the server-supplied message, if any.
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },

    #[error("network request failed")]
    Network(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => format!("HTTP {status}: request failed"),
    }
}

/// Body shape of an error response. `detail` is a string for handled
/// failures but a list for request-validation failures; only strings are used.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct AnalyzeResumeRequest<'a> {
    resume_text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateQuestionsRequest<'a> {
    skills: &'a [String],
}

#[derive(Debug, Serialize)]
struct EvaluateAnswersRequest<'a> {
    qa_pairs: &'a [QaPair],
}

/// Resume-analysis response. An absent or `null` `skills` field means no skills.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct QuestionSet {
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: String,
}

/// The request/response contract of the external inference service.
#[async_trait]
pub trait InferenceService: Send + Sync {
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, RequestError>;

    async fn generate_questions(&self, skills: &[String]) -> Result<Vec<Question>, RequestError>;

    async fn evaluate_answers(&self, qa_pairs: &[QaPair]) -> Result<Feedback, RequestError>;
}

/// JSON-over-HTTP implementation of `InferenceService`.
#[derive(Clone)]
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
}

impl HttpInferenceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET / on the inference service. Used as a startup probe only.
    pub async fn health(&self) -> Result<ServiceStatus, RequestError> {
        let response = self
            .client
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .send()
            .await
            .map_err(RequestError::Network)?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {url} failed: {e}");
                RequestError::Network(e)
            })?;

        read_json(response).await
    }
}

/// Folds a raw response into `T`, normalizing failures.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestError> {
    let status = response.status();
    let body = response.text().await.map_err(RequestError::Network)?;

    if !status.is_success() {
        warn!("Inference service returned {status}: {body}");
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail.as_str().map(str::to_string));
        return Err(RequestError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|e| RequestError::Malformed(e.to_string()))
}

#[async_trait]
impl InferenceService for HttpInferenceClient {
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, RequestError> {
        self.post_json(ANALYZE_RESUME_PATH, &AnalyzeResumeRequest { resume_text })
            .await
    }

    async fn generate_questions(&self, skills: &[String]) -> Result<Vec<Question>, RequestError> {
        let set: QuestionSet = self
            .post_json(GENERATE_QUESTIONS_PATH, &GenerateQuestionsRequest { skills })
            .await?;
        if set.questions.is_empty() {
            return Err(RequestError::Malformed(
                "response contained no questions".to_string(),
            ));
        }
        Ok(set.questions)
    }

    async fn evaluate_answers(&self, qa_pairs: &[QaPair]) -> Result<Feedback, RequestError> {
        let feedback: Feedback = self
            .post_json(EVALUATE_ANSWERS_PATH, &EvaluateAnswersRequest { qa_pairs })
            .await?;
        feedback.validate().map_err(RequestError::Malformed)?;
        Ok(feedback)
    }
}
