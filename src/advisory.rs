//! Health Advisory Lookup
//!
//! Fixed guidance text per AQI category.

use crate::category::AqiCategory;

/// Health advice and precautions for a category
pub fn advice(category: AqiCategory) -> &'static str {
    match category {
        AqiCategory::Good => {
            "Air quality is good. It is safe to enjoy outdoor activities and no special \
             precautions are needed."
        }
        AqiCategory::Satisfactory => {
            "Air quality is generally acceptable. People with asthma, children, and the \
             elderly may experience minor breathing discomfort during prolonged outdoor activity."
        }
        AqiCategory::Moderate => {
            "Air quality may cause discomfort after long exposure. Reduce prolonged or heavy \
             outdoor exertion, especially for sensitive groups."
        }
        AqiCategory::Poor => {
            "Air quality is unhealthy. Avoid outdoor activities where possible, wear a mask if \
             you must go outside, and keep windows closed to limit indoor pollution."
        }
        AqiCategory::VeryPoor => {
            "Air quality can have serious health impacts. Stay indoors as much as possible, \
             avoid any outdoor exercise, and consider using air purifiers or well-fitting masks."
        }
        AqiCategory::Severe => {
            "Air quality is at emergency levels. Everyone may experience serious health effects. \
             Remain indoors with doors and windows closed, avoid all outdoor exposure, and follow \
             medical advice or public health alerts."
        }
    }
}

/// Advice by category label; unknown labels get an empty string
pub fn advice_for_label(label: &str) -> &'static str {
    AqiCategory::from_label(label).map(advice).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_advice() {
        for category in AqiCategory::ALL {
            assert!(!advice(category).is_empty(), "{} has no advice", category);
        }
    }

    #[test]
    fn test_advice_is_distinct_per_category() {
        let mut texts: Vec<&str> = AqiCategory::ALL.iter().map(|c| advice(*c)).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), 6);
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(advice_for_label("Very Poor"), advice(AqiCategory::VeryPoor));
        assert!(advice_for_label("Moderate").starts_with("Air quality may cause discomfort"));
        assert_eq!(advice_for_label("Unknown"), "");
    }
}
