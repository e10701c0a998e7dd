//! Scores one input record against both loaded models.

use diabetes_core::{FeatureFrame, PredictError, PredictionInput, PredictionResult, Predictor};
use diabetes_models::ModelStore;
use tracing::info;

/// Builds the single-row frame and runs both predictors on it.
///
/// Runs synchronously inside the calling task. Either predictor failing fails
/// the whole request.
pub fn predict(store: &ModelStore, input: &PredictionInput) -> Result<PredictionResult, PredictError> {
    let frame = input.to_frame();
    info!("Received data shape: {:?}", frame.shape());

    let (lr, dt) = store.get();
    let lr_pred = first_label(lr, &frame)?;
    let dt_pred = first_label(dt, &frame)?;

    Ok(PredictionResult::success(lr_pred, dt_pred))
}

fn first_label(predictor: &dyn Predictor, frame: &FeatureFrame) -> Result<i64, PredictError> {
    predictor
        .predict(frame)?
        .first()
        .copied()
        .ok_or_else(|| PredictError::NoOutput(predictor.name().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Constant(Vec<i64>);

    impl Predictor for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn predict(&self, _frame: &FeatureFrame) -> Result<Vec<i64>, PredictError> {
            Ok(self.0.clone())
        }
    }

    fn input() -> PredictionInput {
        PredictionInput::from_values([2.0, 120.0, 70.0, 20.0, 79.0, 25.5, 0.5, 33.0])
    }

    #[test]
    fn test_takes_first_label_of_each_model() {
        let store = ModelStore::from_predictors(Arc::new(Constant(vec![1, 0])), Arc::new(Constant(vec![0])));
        assert_eq!(predict(&store, &input()).unwrap(), PredictionResult::success(1, 0));
    }

    #[test]
    fn test_empty_output_is_an_error() {
        let store = ModelStore::from_predictors(Arc::new(Constant(vec![1])), Arc::new(Constant(vec![])));
        assert_eq!(
            predict(&store, &input()).unwrap_err(),
            PredictError::NoOutput("constant".into())
        );
    }
}
