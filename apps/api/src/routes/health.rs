use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-analyzer"
    }))
}

/// GET /api/test
/// Liveness probe used by the upload page.
pub async fn test_handler() -> Json<Value> {
    Json(json!({ "message": "Server is working!" }))
}
