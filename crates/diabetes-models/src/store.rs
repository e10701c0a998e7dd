//! Write-once holder for the two loaded classifiers.

use std::path::Path;
use std::sync::Arc;

use diabetes_core::Predictor;
use tracing::info;

use crate::onnx::{LoadError, OnnxPredictor};

pub const LOGISTIC_REGRESSION: &str = "logistic_regression";
pub const DECISION_TREE: &str = "decision_tree";

/// Both predictors, loaded once and shared read-only.
#[derive(Clone)]
pub struct ModelStore {
    logistic_regression: Arc<dyn Predictor>,
    decision_tree: Arc<dyn Predictor>,
}

impl ModelStore {
    /// Loads the logistic-regression and decision-tree artifacts.
    ///
    /// Fails if either file is missing, unreadable or not a runnable graph.
    /// Whether a graph accepts the eight-column input is only known on first use.
    pub fn load(lr_path: impl AsRef<Path>, dt_path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let logistic_regression = load_slot(LOGISTIC_REGRESSION, lr_path.as_ref())?;
        let decision_tree = load_slot(DECISION_TREE, dt_path.as_ref())?;
        Ok(Self::from_predictors(logistic_regression, decision_tree))
    }

    /// Builds a store from already constructed predictors.
    pub fn from_predictors(
        logistic_regression: Arc<dyn Predictor>,
        decision_tree: Arc<dyn Predictor>,
    ) -> Self {
        Self {
            logistic_regression,
            decision_tree,
        }
    }

    /// Returns `(logistic_regression, decision_tree)`.
    pub fn get(&self) -> (&dyn Predictor, &dyn Predictor) {
        (self.logistic_regression.as_ref(), self.decision_tree.as_ref())
    }
}

fn load_slot(name: &str, path: &Path) -> Result<Arc<dyn Predictor>, LoadError> {
    let predictor = OnnxPredictor::load(name, path)?;
    info!("Loaded {} model from {}", name, path.display());
    Ok(Arc::new(predictor))
}
