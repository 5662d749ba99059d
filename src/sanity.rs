//! Sanity Warnings
//!
//! Soft "unusually high" flags, independent of the hard permitted ranges.
//! Warnings annotate a reading; they never block a prediction.

use crate::reading::{Pollutant, PollutantReading};

/// Banner shown above the individual warnings
pub const SANITY_BANNER: &str = "Some entered values are outside typical urban air quality ranges. \
     Predictions may be less reliable.";

/// Threshold above which a value is reported as unusual
pub fn unusual_threshold(pollutant: Pollutant) -> f64 {
    match pollutant {
        Pollutant::Pm25 => 500.0,
        Pollutant::Pm10 => 600.0,
        Pollutant::Co => 5.0,
        Pollutant::No2 | Pollutant::So2 | Pollutant::O3 => 200.0,
    }
}

fn warning_text(pollutant: Pollutant) -> String {
    match pollutant {
        Pollutant::Co => "CO value is higher than typical urban levels".to_string(),
        other => format!("{} value is unusually high", other.label()),
    }
}

/// Warnings in field order, one per exceeded threshold
pub fn sanity_warnings(reading: &PollutantReading) -> Vec<String> {
    Pollutant::ALL
        .into_iter()
        .filter(|&p| reading.get(p) > unusual_threshold(p))
        .map(warning_text)
        .collect()
}
