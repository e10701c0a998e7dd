//! `POST /predict`.

use std::sync::Arc;

use axum::{extract::State, Json};
use diabetes_core::PredictionResult;
use tracing::error;

use crate::error::AppError;
use crate::extract::ValidatedInput;
use crate::services::prediction as prediction_service;
use crate::ServerState;

/// Scores the record with both models.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    ValidatedInput(input): ValidatedInput,
) -> Result<Json<PredictionResult>, AppError> {
    let store = state.store()?;

    let result = prediction_service::predict(store, &input).map_err(|e| {
        error!(error = ?e, input = ?input, "Prediction failed: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(result))
}
