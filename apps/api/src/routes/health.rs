use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness of this session API only; the inference service is checked once at startup.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "codeclutch-api"
    }))
}
