use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::workflow::session::WorkflowError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Workflow(err) => {
                let (status, code) = match err {
                    WorkflowError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    WorkflowError::Busy => (StatusCode::CONFLICT, "BUSY"),
                    WorkflowError::Superseded => (StatusCode::CONFLICT, "SUPERSEDED"),
                    WorkflowError::Request { .. } => {
                        tracing::error!("Inference error: {err}");
                        (StatusCode::BAD_GATEWAY, "REQUEST_ERROR")
                    }
                };
                (status, code, err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
