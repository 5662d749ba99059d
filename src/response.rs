//! Response shape delivered to the presentation layer
//!
//! ```text
//! success: { success, inputs, pollutionScore, category, advice,
//!            hazardAlert?, mostPolluted: [{city, avgAqi}] }
//! failure: { success: false, message, errors? }
//! ```

use serde::Serialize;

use crate::ranking::{CityAggregate, CityRanking};
use crate::service::{Prediction, PredictionError};
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutionResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,

    #[serde(flatten)]
    pub prediction: Option<Prediction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_polluted: Option<Vec<CityAggregate>>,
}

impl PollutionResponse {
    pub fn success(prediction: Prediction, most_polluted: Vec<CityAggregate>) -> Self {
        PollutionResponse {
            success: true,
            message: None,
            errors: None,
            prediction: Some(prediction),
            most_polluted: Some(most_polluted),
        }
    }

    /// Failure body. Only validation failures carry field errors; other
    /// failures expose nothing beyond the public message.
    pub fn failure(error: &PredictionError) -> Self {
        let errors = match error {
            PredictionError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };
        PollutionResponse {
            success: false,
            message: Some(error.public_message().to_string()),
            errors,
            prediction: None,
            most_polluted: None,
        }
    }

    /// Attach the top-`n` ranking to a successful prediction
    pub fn from_result(
        result: &Result<Prediction, PredictionError>,
        ranking: &CityRanking,
        top_n: usize,
    ) -> Self {
        match result {
            Ok(prediction) => Self::success(prediction.clone(), ranking.top_polluted(top_n)),
            Err(e) => Self::failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::AqiCategory;
    use crate::reading::PollutantReading;
    use crate::score::AqiScore;
    use serde_json::json;

    fn prediction() -> Prediction {
        Prediction {
            inputs: PollutantReading::from_ordered([40.0, 80.0, 1.2, 30.0, 10.0, 25.0]),
            pollution_score: AqiScore::from_raw(145.7),
            category: AqiCategory::Moderate,
            advice: crate::advisory::advice(AqiCategory::Moderate),
            hazard_alert: None,
        }
    }

    #[test]
    fn test_success_shape() {
        let ranking = CityRanking::from_rows(vec![(Some("Delhi"), Some(300.0)), (Some("Pune"), Some(90.0))]);
        let response = PollutionResponse::from_result(&Ok(prediction()), &ranking, 5);
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["pollutionScore"], 145.7);
        assert_eq!(body["category"], "Moderate");
        assert_eq!(body["inputs"]["pm25"], 40.0);
        assert_eq!(body["mostPolluted"][0], json!({"city": "Delhi", "avgAqi": 300.0}));
        assert!(body.get("message").is_none());
        assert!(body.get("errors").is_none());
        assert!(body.get("hazardAlert").is_none());
        assert!(body.get("warnings").is_none());
    }

    #[test]
    fn test_validation_failure_shape() {
        let mut errors = FieldErrors::new();
        errors.insert("pm25".into(), "This field is required.".into());
        let response = PollutionResponse::failure(&PredictionError::Validation(errors));
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Validation failed.",
                "errors": {"pm25": "This field is required."}
            })
        );
    }

    #[test]
    fn test_inference_failure_hides_detail() {
        let response = PollutionResponse::failure(&PredictionError::Inference("stack trace here".into()));
        let body = serde_json::to_string(&response).unwrap();
        assert!(!body.contains("stack trace"));
        assert!(body.contains("An unexpected server error occurred."));
    }
}
