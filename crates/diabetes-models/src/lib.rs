//! ONNX model loading and the process-wide model store.

mod onnx;
mod store;

pub use onnx::{LoadError, OnnxPredictor};
pub use store::{ModelStore, DECISION_TREE, LOGISTIC_REGRESSION};
