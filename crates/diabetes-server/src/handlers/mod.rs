//! HTTP route handlers for the prediction server.

pub mod predict;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{HealthResponse, HealthStatus};
use crate::ServerState;

/// Health check endpoint. Answers 503 while the models are not loaded.
pub async fn health(State(state): State<Arc<ServerState>>) -> (StatusCode, Json<HealthResponse>) {
    if state.models.is_ok() {
        let body = HealthResponse { status: HealthStatus::Ok, models_loaded: true };
        (StatusCode::OK, Json(body))
    } else {
        let body = HealthResponse { status: HealthStatus::Degraded, models_loaded: false };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body))
    }
}
