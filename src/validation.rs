//! Range Validation
//!
//! Server-side checks on the six raw pollutant inputs: presence, numeric
//! type, and the inclusive permitted range. Every field is checked so all
//! errors surface together.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::reading::{PermittedRange, Pollutant, PollutantReading};

/// Raw request inputs keyed by field name (`pm25`, `pm10`, ...).
/// Values may arrive as JSON strings (forms) or JSON numbers.
pub type RawInputs = HashMap<String, Value>;

/// Field name → error message
pub type FieldErrors = BTreeMap<String, String>;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NOT_A_NUMBER_MESSAGE: &str = "Value must be a number.";

/// Outcome of validating one request: never both a reading and errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(PollutantReading),
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn into_result(self) -> Result<PollutantReading, FieldErrors> {
        match self {
            ValidationResult::Valid(reading) => Ok(reading),
            ValidationResult::Invalid(errors) => Err(errors),
        }
    }
}

/// Validate all six inputs against their permitted ranges
pub fn validate_inputs(raw: &RawInputs) -> ValidationResult {
    let mut errors = FieldErrors::new();
    let mut values = [0.0; 6];

    for pollutant in Pollutant::ALL {
        match check_field(raw.get(pollutant.key()), &pollutant.permitted_range()) {
            Ok(value) => values[pollutant.index()] = value,
            Err(message) => {
                errors.insert(pollutant.key().to_string(), message);
            }
        }
    }

    if errors.is_empty() {
        ValidationResult::Valid(PollutantReading::from_ordered(values))
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Check a single field, returning the parsed value or its error message
fn check_field(raw: Option<&Value>, range: &PermittedRange) -> Result<f64, String> {
    let value = match raw {
        None | Some(Value::Null) => return Err(REQUIRED_MESSAGE.to_string()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(REQUIRED_MESSAGE.to_string());
            }
            trimmed.parse::<f64>().map_err(|_| NOT_A_NUMBER_MESSAGE.to_string())?
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| NOT_A_NUMBER_MESSAGE.to_string())?,
        Some(_) => return Err(NOT_A_NUMBER_MESSAGE.to_string()),
    };

    // "nan" and "inf" parse as f64 but are not usable readings
    if !value.is_finite() {
        return Err(NOT_A_NUMBER_MESSAGE.to_string());
    }

    if !range.contains(value) {
        return Err(range_message(range));
    }

    Ok(value)
}

/// "Value must be between 0.0 and 500.0."
pub fn range_message(range: &PermittedRange) -> String {
    format!(
        "Value must be between {} and {}.",
        format_bound(range.min),
        format_bound(range.max)
    )
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_inputs() -> RawInputs {
        [
            ("pm25", json!("40")),
            ("pm10", json!("80")),
            ("co", json!("1.2")),
            ("no2", json!("30")),
            ("so2", json!("10")),
            ("o3", json!("25")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_valid_inputs_yield_reading() {
        let result = validate_inputs(&valid_inputs());
        let reading = result.into_result().expect("inputs should be valid");
        assert_eq!(reading.pm25, 40.0);
        assert_eq!(reading.co, 1.2);
        assert_eq!(reading.o3, 25.0);
    }

    #[test]
    fn test_numbers_and_padded_strings_accepted() {
        let mut inputs = valid_inputs();
        inputs.insert("pm25".into(), json!(12.5));
        inputs.insert("so2".into(), json!("  7  "));

        let reading = validate_inputs(&inputs).into_result().unwrap();
        assert_eq!(reading.pm25, 12.5);
        assert_eq!(reading.so2, 7.0);
    }

    #[test]
    fn test_missing_field_is_required() {
        let mut inputs = valid_inputs();
        inputs.remove("pm25");

        let errors = validate_inputs(&inputs).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["pm25"], REQUIRED_MESSAGE);
    }

    #[test]
    fn test_blank_and_null_are_required() {
        let mut inputs = valid_inputs();
        inputs.insert("co".into(), json!("   "));
        inputs.insert("o3".into(), Value::Null);

        let errors = validate_inputs(&inputs).into_result().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["co"], REQUIRED_MESSAGE);
        assert_eq!(errors["o3"], REQUIRED_MESSAGE);
    }

    #[test]
    fn test_non_numeric_values() {
        let mut inputs = valid_inputs();
        inputs.insert("no2".into(), json!("abc"));
        inputs.insert("so2".into(), json!("NaN"));
        inputs.insert("pm10".into(), json!(true));

        let errors = validate_inputs(&inputs).into_result().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["no2"], NOT_A_NUMBER_MESSAGE);
        assert_eq!(errors["so2"], NOT_A_NUMBER_MESSAGE);
        assert_eq!(errors["pm10"], NOT_A_NUMBER_MESSAGE);
    }

    #[test]
    fn test_out_of_range_flags_only_that_field() {
        for pollutant in Pollutant::ALL {
            let range = pollutant.permitted_range();
            for bad in [range.min - 0.01, range.max + 0.01] {
                let mut inputs = valid_inputs();
                inputs.insert(pollutant.key().into(), json!(bad));

                let errors = validate_inputs(&inputs).into_result().unwrap_err();
                assert_eq!(errors.len(), 1, "{} = {}", pollutant.key(), bad);
                assert_eq!(errors[pollutant.key()], range_message(&range));
            }
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut inputs = valid_inputs();
        inputs.insert("pm25".into(), json!("0"));
        inputs.insert("co".into(), json!("5"));
        inputs.insert("pm10".into(), json!(600));
        assert!(validate_inputs(&inputs).is_valid());
    }

    #[test]
    fn test_all_errors_reported_together() {
        let errors = validate_inputs(&RawInputs::new()).into_result().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.values().all(|m| m == REQUIRED_MESSAGE));
    }

    #[test]
    fn test_range_message_format() {
        assert_eq!(
            range_message(&Pollutant::Pm25.permitted_range()),
            "Value must be between 0.0 and 500.0."
        );
        assert_eq!(
            range_message(&Pollutant::Co.permitted_range()),
            "Value must be between 0.0 and 5.0."
        );
    }
}
