use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

pub async fn health_check() -> Json<Value> {
    debug!("Health check requested");
    Json(json!({ "status": "ok" }))
}
