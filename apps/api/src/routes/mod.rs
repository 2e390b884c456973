pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route(
            "/api/v1/session/resume",
            post(handlers::handle_submit_resume),
        )
        .route(
            "/api/v1/session/resume/pdf",
            post(handlers::handle_submit_resume_pdf),
        )
        .route(
            "/api/v1/session/questions",
            post(handlers::handle_request_questions),
        )
        .route(
            "/api/v1/session/answers",
            put(handlers::handle_record_answer),
        )
        .route(
            "/api/v1/session/answers/submit",
            post(handlers::handle_submit_answers),
        )
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        .with_state(state)
}
