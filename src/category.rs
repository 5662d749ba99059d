//! AQI Categorization
//!
//! Maps a capped AQI score to one of six ordered severity bands.
//! Upper bounds are inclusive, so a boundary value belongs to the lower band.

use serde::Serialize;

/// AQI severity band, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
}

/// Inclusive upper bound of each band below Severe
const BAND_UPPER_BOUNDS: [(f64, AqiCategory); 5] = [
    (50.0, AqiCategory::Good),
    (100.0, AqiCategory::Satisfactory),
    (200.0, AqiCategory::Moderate),
    (300.0, AqiCategory::Poor),
    (400.0, AqiCategory::VeryPoor),
];

/// Scores at or above this trigger the extreme-hazard alert
pub const HAZARD_ALERT_THRESHOLD: f64 = 400.0;

pub const HAZARD_ALERT: &str = "This AQI level indicates extremely hazardous air quality. \
     All individuals should avoid outdoor exposure.";

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Satisfactory,
        AqiCategory::Moderate,
        AqiCategory::Poor,
        AqiCategory::VeryPoor,
        AqiCategory::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Satisfactory => "Satisfactory",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Poor => "Poor",
            AqiCategory::VeryPoor => "Very Poor",
            AqiCategory::Severe => "Severe",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band for an AQI score. Anything above 400 (or NaN) is Severe.
pub fn categorize(aqi: f64) -> AqiCategory {
    BAND_UPPER_BOUNDS
        .iter()
        .find(|(upper, _)| aqi <= *upper)
        .map(|(_, category)| *category)
        .unwrap_or(AqiCategory::Severe)
}

/// Extreme-hazard alert text for very high scores
pub fn hazard_alert(aqi: f64) -> Option<&'static str> {
    (aqi >= HAZARD_ALERT_THRESHOLD).then_some(HAZARD_ALERT)
}
