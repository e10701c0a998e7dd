//! Request body extraction for the prediction endpoint.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use diabetes_core::{FieldError, PredictionInput};
use serde_json::Value;
use tracing::debug;

use crate::error::AppError;

/// A validated [`PredictionInput`].
///
/// The body is decoded as JSON regardless of `Content-Type`. Decode failures
/// and field errors are both rejected with 422.
pub struct ValidatedInput(pub PredictionInput);

impl<S> FromRequest<S> for ValidatedInput
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            debug!("Rejected undecodable body: {}", e);
            AppError::Validation(vec![FieldError::body(
                format!("JSON decode error: {}", e),
                "json_invalid",
            )])
            .into_response()
        })?;

        PredictionInput::from_json(&value)
            .map(ValidatedInput)
            .map_err(|errors| {
                debug!(?errors, "Rejected invalid prediction input");
                AppError::Validation(errors).into_response()
            })
    }
}
