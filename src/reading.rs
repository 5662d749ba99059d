//! Pollutant Readings
//!
//! The six pollutant fields, their permitted ranges, and the feature vector
//! handed to the regressor.
//!
//! Field order is fixed everywhere: PM2.5, PM10, CO, NO2, SO2, O3. The model
//! was fitted on columns in exactly this order, so `FeatureVector` is built
//! only from a `PollutantReading` and never from a loose slice.

use serde::{Deserialize, Serialize};

// ============================================================================
// Pollutant fields
// ============================================================================

/// One of the six model input pollutants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pollutant {
    Pm25,
    Pm10,
    Co,
    No2,
    So2,
    O3,
}

impl Pollutant {
    /// All pollutants in model feature order
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::Co,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::O3,
    ];

    /// Request field name (form inputs, JSON keys, error keys)
    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::Co => "co",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::O3 => "o3",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO₂",
            Pollutant::So2 => "SO₂",
            Pollutant::O3 => "O₃",
        }
    }

    /// Column name the model artifact was trained on
    pub fn feature_name(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::O3 => "O3",
        }
    }

    /// Position in the feature vector
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Hard validation bounds for this field
    pub fn permitted_range(&self) -> PermittedRange {
        let max = match self {
            Pollutant::Pm25 => 500.0,
            Pollutant::Pm10 => 600.0,
            Pollutant::Co => 5.0,
            Pollutant::No2 | Pollutant::So2 | Pollutant::O3 => 200.0,
        };
        PermittedRange {
            key: self.key(),
            label: self.label(),
            min: 0.0,
            max,
        }
    }
}

// ============================================================================
// Permitted ranges
// ============================================================================

/// Inclusive bounds for one input field, shared with the presentation layer
/// so client-side and server-side validation agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PermittedRange {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

impl PermittedRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Permitted range table in field order
pub fn permitted_ranges() -> [PermittedRange; 6] {
    Pollutant::ALL.map(|p| p.permitted_range())
}

// ============================================================================
// Readings and features
// ============================================================================

/// Six validated pollutant concentrations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    pub pm25: f64,
    pub pm10: f64,
    pub co: f64,
    pub no2: f64,
    pub so2: f64,
    pub o3: f64,
}

impl PollutantReading {
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Co => self.co,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::O3 => self.o3,
        }
    }

    /// Build from values indexed by feature position
    pub fn from_ordered(values: [f64; 6]) -> Self {
        let [pm25, pm10, co, no2, so2, o3] = values;
        PollutantReading { pm25, pm10, co, no2, so2, o3 }
    }

    /// Assemble the model input row
    pub fn features(&self) -> FeatureVector {
        FeatureVector([self.pm25, self.pm10, self.co, self.no2, self.so2, self.o3])
    }
}

/// Model input row: `[PM2.5, PM10, CO, NO2, SO2, O3]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; 6]);

impl FeatureVector {
    /// Column names matching each position
    pub const NAMES: [&'static str; 6] = ["PM2.5", "PM10", "CO", "NO2", "SO2", "O3"];

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, pollutant: Pollutant) -> f64 {
        self.0[pollutant.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> PollutantReading {
        PollutantReading {
            pm25: 40.0,
            pm10: 80.0,
            co: 1.2,
            no2: 30.0,
            so2: 10.0,
            o3: 25.0,
        }
    }

    #[test]
    fn test_feature_order_matches_training_columns() {
        let features = reading().features();
        assert_eq!(features.as_slice(), &[40.0, 80.0, 1.2, 30.0, 10.0, 25.0]);

        for pollutant in Pollutant::ALL {
            assert_eq!(features.get(pollutant), reading().get(pollutant));
            assert_eq!(FeatureVector::NAMES[pollutant.index()], pollutant.feature_name());
        }
    }

    #[test]
    fn test_from_ordered_round_trips_features() {
        let r = PollutantReading::from_ordered([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(r.co, 3.0);
        assert_eq!(r.o3, 6.0);
        assert_eq!(r.features().as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_permitted_ranges_table() {
        let ranges = permitted_ranges();
        let maxima: Vec<f64> = ranges.iter().map(|r| r.max).collect();
        assert_eq!(maxima, vec![500.0, 600.0, 5.0, 200.0, 200.0, 200.0]);
        assert!(ranges.iter().all(|r| r.min == 0.0));
        assert_eq!(ranges[0].key, "pm25");
        assert_eq!(ranges[0].label, "PM2.5");
    }

    #[test]
    fn test_range_is_inclusive() {
        let co = Pollutant::Co.permitted_range();
        assert!(co.contains(0.0));
        assert!(co.contains(5.0));
        assert!(!co.contains(5.01));
        assert!(!co.contains(-0.1));
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Pollutant::from_key("so2"), Some(Pollutant::So2));
        assert_eq!(Pollutant::from_key("PM2.5"), None);
    }
}
