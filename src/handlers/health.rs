use axum::response::Json;
use tracing::debug;

use crate::models::HealthResponse;
use crate::services::MODEL;

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    debug!("Health check requested");

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: MODEL.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
