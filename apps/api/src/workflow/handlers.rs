//! Axum route handlers for the renderer-facing Session API.
//!
//! Every handler returns the session snapshot after the operation, so the
//! renderer never has to re-fetch to see the new stage.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::session::Session;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordAnswerRequest {
    pub question: String,
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.orchestrator.snapshot().await)
}

/// POST /api/v1/session/resume
pub async fn handle_submit_resume(
    State(state): State<AppState>,
    Json(request): Json<SubmitResumeRequest>,
) -> Result<Json<Session>, AppError> {
    state.orchestrator.submit_resume(&request.resume_text).await?;
    Ok(Json(state.orchestrator.snapshot().await))
}

/// POST /api/v1/session/resume/pdf
///
/// Multipart upload with a single `file` field. Only `.pdf` files are accepted.
pub async fn handle_submit_resume_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Session>, AppError> {
    let mut pdf = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let is_pdf = field
            .file_name()
            .map(|name| name.to_lowercase().ends_with(".pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(AppError::Validation(
                "Only PDF files are supported".to_string(),
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        pdf = Some(bytes.to_vec());
    }

    let pdf = pdf.ok_or_else(|| AppError::Validation("missing `file` field".to_string()))?;
    state.orchestrator.submit_resume_pdf(pdf).await?;
    Ok(Json(state.orchestrator.snapshot().await))
}

/// POST /api/v1/session/questions
pub async fn handle_request_questions(
    State(state): State<AppState>,
) -> Result<Json<Session>, AppError> {
    state.orchestrator.request_questions().await?;
    Ok(Json(state.orchestrator.snapshot().await))
}

/// PUT /api/v1/session/answers
pub async fn handle_record_answer(
    State(state): State<AppState>,
    Json(request): Json<RecordAnswerRequest>,
) -> Result<Json<Session>, AppError> {
    state
        .orchestrator
        .record_answer(&request.question, &request.answer)
        .await?;
    Ok(Json(state.orchestrator.snapshot().await))
}

/// POST /api/v1/session/answers/submit
pub async fn handle_submit_answers(
    State(state): State<AppState>,
) -> Result<Json<Session>, AppError> {
    state.orchestrator.submit_answers().await?;
    Ok(Json(state.orchestrator.snapshot().await))
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<Session> {
    state.orchestrator.reset().await;
    Json(state.orchestrator.snapshot().await)
}
