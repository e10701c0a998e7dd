//! Core domain types for the diabetes prediction service.
//!
//! - [`PredictionInput`] — the eight-measurement request record
//! - [`FeatureFrame`] — named-column tabular rows handed to predictors
//! - [`Predictor`] — the scoring seam implemented by loaded models
//! - [`PredictionResult`] — the response record
//!
//! # Example
//!
//! ```rust
//! use diabetes_core::{PredictionInput, FEATURE_NAMES};
//!
//! let body = serde_json::json!({
//!     "Pregnancies": 2, "Glucose": 120, "BloodPressure": 70, "SkinThickness": 20,
//!     "Insulin": 79, "BMI": 25.5, "DiabetesPedigreeFunction": 0.5, "Age": 33,
//! });
//! let input = PredictionInput::from_json(&body).unwrap();
//! let frame = input.to_frame();
//! assert_eq!(frame.shape(), (1, FEATURE_NAMES.len()));
//! ```

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while scoring a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// The frame lacks a column the model was trained on.
    #[error("{model}: feature '{column}' is missing from the input frame")]
    MissingColumn { model: String, column: String },

    /// A row does not have one value per column.
    #[error("frame row {row} has {found} values, expected {expected}")]
    FeatureCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("input frame has no rows")]
    EmptyFrame,

    /// The model produced no label for the frame.
    #[error("{0}: model returned no prediction")]
    NoOutput(String),

    /// The inference runtime rejected the input or failed while running.
    #[error("{model}: inference failed: {message}")]
    Inference { model: String, message: String },

    /// NaN or infinite values cannot be scored.
    #[error("{model}: input contains a non-finite value in '{column}'")]
    NonFinite { model: String, column: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Input
// ─────────────────────────────────────────────────────────────────────────────

/// Column names in the order the models were trained on.
pub const FEATURE_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// One patient record, built by [`PredictionInput::from_json`]. No range
/// constraints are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInput {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    fn new(loc: Vec<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field_loc(field), "Field required", "missing")
    }

    pub fn not_a_number(field: &str) -> Self {
        Self::new(field_loc(field), "Input should be a valid number", "float_type")
    }

    pub fn unparsable(field: &str) -> Self {
        Self::new(
            field_loc(field),
            "Input should be a valid number, unable to parse string as a number",
            "float_parsing",
        )
    }

    /// An error about the request body as a whole.
    pub fn body(msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(vec!["body".to_string()], msg, kind)
    }
}

fn field_loc(field: &str) -> Vec<String> {
    vec!["body".to_string(), field.to_string()]
}

impl PredictionInput {
    /// Validates a decoded JSON body, collecting every field error.
    ///
    /// Numbers are taken as-is; numeric strings and booleans are coerced.
    /// Numbers beyond the `f64` range become infinite and fail at scoring.
    /// Unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(obj) = value.as_object() else {
            return Err(vec![FieldError::body(
                "Input should be a valid dictionary or object",
                "model_attributes_type",
            )]);
        };

        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let Some(raw) = obj.get(name) else {
                errors.push(FieldError::missing(name));
                continue;
            };
            match coerce_number(name, raw) {
                Ok(v) => *slot = v,
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self::from_values(values))
    }

    pub fn from_values(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            pregnancies: v[0],
            glucose: v[1],
            blood_pressure: v[2],
            skin_thickness: v[3],
            insulin: v[4],
            bmi: v[5],
            diabetes_pedigree_function: v[6],
            age: v[7],
        }
    }

    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
    }

    /// Builds the single-row frame the predictors score.
    pub fn to_frame(&self) -> FeatureFrame {
        FeatureFrame {
            columns: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            rows: vec![self.to_values().to_vec()],
        }
    }
}

fn coerce_number(name: &str, value: &Value) -> Result<f64, FieldError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .or_else(|| n.to_string().parse().ok())
            .ok_or_else(|| FieldError::not_a_number(name)),
        Value::String(s) => s.trim().parse().map_err(|_| FieldError::unparsable(name)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err(FieldError::not_a_number(name)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame
// ─────────────────────────────────────────────────────────────────────────────

/// Rows of named numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Projects every row onto `features`, in that order.
    ///
    /// `model` names the caller in error messages.
    pub fn select<S: AsRef<str>>(
        &self,
        model: &str,
        features: &[S],
    ) -> Result<Vec<Vec<f64>>, PredictError> {
        if self.rows.is_empty() {
            return Err(PredictError::EmptyFrame);
        }

        let indices = features
            .iter()
            .map(|f| {
                let f = f.as_ref();
                self.column_index(f).ok_or_else(|| PredictError::MissingColumn {
                    model: model.to_string(),
                    column: f.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != self.columns.len() {
                    return Err(PredictError::FeatureCount {
                        row: i,
                        expected: self.columns.len(),
                        found: row.len(),
                    });
                }
                indices
                    .iter()
                    .map(|&idx| {
                        let v = row[idx];
                        if v.is_finite() {
                            Ok(v)
                        } else {
                            Err(PredictError::NonFinite {
                                model: model.to_string(),
                                column: self.columns[idx].clone(),
                            })
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Predictor Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A trained binary classifier. Implementations are immutable once built and
/// shared across request tasks.
pub trait Predictor: Send + Sync {
    fn name(&self) -> &str;

    /// Returns one class label per frame row.
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, PredictError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub logistic_regression: i64,
    pub decision_tree: i64,
    pub status: PredictionStatus,
}

impl PredictionResult {
    pub fn success(logistic_regression: i64, decision_tree: i64) -> Self {
        Self {
            logistic_regression,
            decision_tree,
            status: PredictionStatus::Success,
        }
    }
}
