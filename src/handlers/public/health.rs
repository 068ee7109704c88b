// handlers/public/health.rs - GET /health

use axum::response::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub async fn health_get() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
