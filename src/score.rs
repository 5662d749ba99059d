//! AQI Score
//!
//! Raw regressor output capped to the standard 0-500 scale and rounded to
//! two decimal places (cap first, then round).

use serde::Serialize;

/// Upper end of the AQI scale
pub const AQI_MAX: f64 = 500.0;

/// Bounded AQI value, `0 <= score <= 500`, two decimals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct AqiScore(f64);

impl AqiScore {
    /// Cap, floor at zero, then round. Caller guarantees `raw` is finite.
    pub fn from_raw(raw: f64) -> Self {
        AqiScore(round2(cap(raw).max(0.0)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for AqiScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// `min(raw, 500)`
pub fn cap(raw: f64) -> f64 {
    raw.min(AQI_MAX)
}

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
