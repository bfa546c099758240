// handlers/public/health.rs - GET /api/health handler

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET /api/health - Liveness plus a datastore reachability probe
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now();

    match state.directory.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "datastore": "ok",
                "timestamp": timestamp,
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check: datastore unavailable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "datastore": "unavailable",
                    "timestamp": timestamp,
                })),
            )
        }
    }
}
