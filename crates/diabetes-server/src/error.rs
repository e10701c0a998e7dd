//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diabetes_core::{FieldError, PredictError};
use serde::Serialize;

/// Request failures with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or incomplete input (422).
    Validation(Vec<FieldError>),
    /// A predictor failed (500).
    Prediction(PredictError),
    /// Models were never loaded (503).
    Unavailable(String),
}

impl From<PredictError> for AppError {
    fn from(e: PredictError) -> Self {
        AppError::Prediction(e)
    }
}

#[derive(Serialize)]
struct ErrorResponse<T> {
    detail: T,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse { detail: errors }),
            )
                .into_response(),
            AppError::Prediction(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { detail: e.to_string() }),
            )
                .into_response(),
            AppError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse { detail: message }),
            )
                .into_response(),
        }
    }
}
