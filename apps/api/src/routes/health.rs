use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Banner confirming the service is up and reachable.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Scorecard API connected successfully!"
    }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scorecard-api"
    }))
}
