use std::sync::Arc;

use crate::workflow::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one workflow instance this process serves.
    pub orchestrator: Arc<Orchestrator>,
}
