use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Liveness probe. Never touches the cache or the upstream page.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) })
}
