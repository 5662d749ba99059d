//! AQI Advisor
//!
//! Predicts an Air Quality Index from six pollutant readings with a
//! pre-trained tree-ensemble regressor, maps the score to a severity band,
//! and returns health advice. One prediction pipeline serves two front ends
//! (the axum web app and the interactive terminal app).
//!
//! Module layout:
//! - `reading`, `validation`, `sanity`: inputs, hard range checks, soft warnings
//! - `category`, `advisory`, `score`: severity bands, advice text, capped score
//! - `model`: regressor contract + JSON forest artifact
//! - `dataset`, `ranking`: historical AQI table (Polars) and city ranking
//! - `context`, `service`, `response`: startup state, pipeline, response shape
//! - `config`: environment settings
//! - `api_server`, `web`: HTTP adapter (feature `api`)

pub mod advisory;
pub mod category;
pub mod config;
pub mod context;
pub mod dataset;
pub mod model;
pub mod ranking;
pub mod reading;
pub mod response;
pub mod sanity;
pub mod score;
pub mod service;
pub mod validation;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use advisory::advice;
pub use category::{categorize, AqiCategory};
pub use config::Settings;
pub use context::AdvisoryContext;
pub use model::{AqiRegressor, ForestRegressor, ModelError};
pub use ranking::{CityAggregate, CityRanking};
pub use reading::{permitted_ranges, FeatureVector, PermittedRange, Pollutant, PollutantReading};
pub use response::PollutionResponse;
pub use sanity::sanity_warnings;
pub use score::AqiScore;
pub use service::{Prediction, PredictionError, PredictionService};
pub use validation::{validate_inputs, FieldErrors, RawInputs, ValidationResult};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
