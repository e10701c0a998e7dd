//! Predictors backed by ONNX model artifacts.

use std::fs::File;
use std::path::{Path, PathBuf};

use diabetes_core::{FeatureFrame, PredictError, Predictor, FEATURE_NAMES};
use thiserror::Error;
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Errors from reading a model artifact.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// The graph decoded but could not be typed or optimized.
    #[error("model artifact {} is not runnable: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// A classifier exported to ONNX.
///
/// The graph takes a `float32` tensor of shape `[rows, 8]` in
/// [`FEATURE_NAMES`] order; its first output holds one label per row.
pub struct OnnxPredictor {
    name: String,
    plan: Plan,
}

impl OnnxPredictor {
    pub fn load(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let model = tract_onnx::onnx()
            .model_for_read(&mut file)
            .map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                reason: format!("{:#}", e),
            })?;

        let plan = model
            .into_optimized()
            .and_then(|m| m.into_runnable())
            .map_err(|e| LoadError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("{:#}", e),
            })?;

        Ok(Self {
            name: name.into(),
            plan,
        })
    }

    fn inference_error(&self, e: TractError) -> PredictError {
        PredictError::Inference {
            model: self.name.clone(),
            message: format!("{:#}", e),
        }
    }
}

impl Predictor for OnnxPredictor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, PredictError> {
        let rows = frame.select(&self.name, &FEATURE_NAMES)?;
        let data: Vec<f32> = rows.iter().flatten().map(|&v| v as f32).collect();

        let input = Tensor::from_shape(&[rows.len(), FEATURE_NAMES.len()], &data)
            .map_err(|e| self.inference_error(e))?;
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| self.inference_error(e))?;

        let output = outputs
            .first()
            .ok_or_else(|| PredictError::NoOutput(self.name.clone()))?;
        let labels = output
            .cast_to::<i64>()
            .map_err(|e| self.inference_error(e))?;
        let labels = labels
            .as_slice::<i64>()
            .map_err(|e| self.inference_error(e))?
            .to_vec();

        Ok(labels)
    }
}
