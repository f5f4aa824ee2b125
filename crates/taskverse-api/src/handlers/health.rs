//! Health check handlers.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Root banner, kept stable for uptime monitors.
pub async fn root() -> &'static str {
    "Server is running fine!"
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
