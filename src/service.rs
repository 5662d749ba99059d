//! Prediction Service
//!
//! The decision pipeline shared by every front end:
//!
//! 1. Validate the six raw inputs (all field errors reported together)
//! 2. Check the model is loaded
//! 3. Build the feature row in training order and run inference
//! 4. Cap at 500, round to two decimals
//! 5. Categorize, look up the advisory, flag hazardous scores
//!
//! Collaborator failures never escape raw: errors and panics raised during
//! inference become `PredictionError::Inference`.
//!
//! Sanity warnings are not part of a `Prediction`: their thresholds sit at the
//! permitted maxima, so a validated reading can never trigger one. Front ends
//! that accept unbounded input (the CLI prompt) call `sanity_warnings` directly.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use thiserror::Error;

use crate::advisory::advice;
use crate::category::{categorize, hazard_alert, AqiCategory};
use crate::context::AdvisoryContext;
use crate::model::{AqiRegressor, ModelError};
use crate::reading::{FeatureVector, PollutantReading};
use crate::score::AqiScore;
use crate::validation::{validate_inputs, FieldErrors, RawInputs};

pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed.";
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Prediction model is not available on the server.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected server error occurred.";

// ============================================================================
// Errors and results
// ============================================================================

#[derive(Debug, Error)]
pub enum PredictionError {
    /// One or more inputs failed range validation
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// No model was loaded at startup
    #[error("prediction model is not loaded")]
    ModelUnavailable,

    /// The model failed while predicting. Detail is for server logs only.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictionError {
    /// Message safe to show to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            PredictionError::Validation(_) => VALIDATION_FAILED_MESSAGE,
            PredictionError::ModelUnavailable => MODEL_UNAVAILABLE_MESSAGE,
            PredictionError::Inference(_) => UNEXPECTED_ERROR_MESSAGE,
        }
    }
}

/// Successful prediction for one reading
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Validated inputs echoed back
    pub inputs: PollutantReading,
    pub pollution_score: AqiScore,
    pub category: AqiCategory,
    pub advice: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_alert: Option<&'static str>,
}

// ============================================================================
// Service
// ============================================================================

#[derive(Debug, Clone)]
pub struct PredictionService {
    context: AdvisoryContext,
}

impl PredictionService {
    pub fn new(context: AdvisoryContext) -> Self {
        PredictionService { context }
    }

    pub fn context(&self) -> &AdvisoryContext {
        &self.context
    }

    /// Validate raw inputs and predict. The model is not touched unless
    /// validation passes.
    pub fn predict(&self, raw: &RawInputs) -> Result<Prediction, PredictionError> {
        let reading = validate_inputs(raw)
            .into_result()
            .map_err(PredictionError::Validation)?;
        self.predict_reading(reading)
    }

    /// Predict for a reading that has already passed validation
    pub fn predict_reading(&self, reading: PollutantReading) -> Result<Prediction, PredictionError> {
        let model = self.context.model().ok_or(PredictionError::ModelUnavailable)?;

        let raw_aqi = infer(model, reading.features()).map_err(|e| {
            tracing::error!("AQI inference failed: {}", e);
            e
        })?;

        let pollution_score = AqiScore::from_raw(raw_aqi);
        let category = categorize(pollution_score.value());

        Ok(Prediction {
            inputs: reading,
            pollution_score,
            category,
            advice: advice(category),
            hazard_alert: hazard_alert(pollution_score.value()),
        })
    }
}

/// Run the model on a single row and take its only output
fn infer(model: &dyn AqiRegressor, features: FeatureVector) -> Result<f64, PredictionError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| model.predict(&[features])));

    let outputs = match outcome {
        Ok(Ok(outputs)) => outputs,
        Ok(Err(e)) => return Err(PredictionError::Inference(e.to_string())),
        Err(_) => return Err(PredictionError::Inference("model panicked".to_string())),
    };

    let raw = outputs.first().copied().ok_or_else(|| {
        PredictionError::Inference(ModelError::OutputLength { expected: 1, got: 0 }.to_string())
    })?;

    if !raw.is_finite() {
        return Err(PredictionError::Inference(format!("non-finite model output: {}", raw)));
    }

    Ok(raw)
}
