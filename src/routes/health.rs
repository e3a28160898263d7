use axum::response::Json;
use serde_json::json;

/// Health check endpoint handler.
///
/// Always answers `{"status": "pong"}` and touches no dependencies, so it is
/// safe for load balancer and container liveness probes.
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}
