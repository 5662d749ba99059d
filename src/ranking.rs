//! City Ranking
//!
//! Average AQI per city over the historical dataset, sorted most polluted
//! first. Built once at startup and shared read-only across requests.
//!
//! Ties keep the order in which each city first appears in the dataset.

use std::cmp::Ordering;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::dataset::{load_aqi_table, AQI_COLUMN, CITY_COLUMN};
use crate::score::round2;

/// Default number of cities attached to a prediction response
pub const DEFAULT_TOP_CITIES: usize = 5;

/// One city and its mean AQI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityAggregate {
    pub city: String,
    pub avg_aqi: f64,
}

/// Cities sorted by average AQI, descending
#[derive(Debug, Clone, Default)]
pub struct CityRanking {
    cities: Vec<CityAggregate>,
}

impl CityRanking {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and aggregate the dataset. Any failure yields an empty ranking.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::warn!("AQI dataset not found at {:?}; city ranking disabled", path);
            return Self::empty();
        }

        let ranking = load_aqi_table(path).and_then(|df| Self::from_frame(&df));
        match ranking {
            Ok(ranking) if ranking.is_empty() => {
                tracing::warn!("AQI dataset {:?} has no usable City/AQI rows", path);
                ranking
            }
            Ok(ranking) => {
                tracing::info!("Ranked {} cities by average AQI", ranking.len());
                ranking
            }
            Err(e) => {
                tracing::warn!("Failed to build city ranking: {:#}", e);
                Self::empty()
            }
        }
    }

    /// Aggregate a frame holding `City` and `AQI` columns. AQI is cast to
    /// Float64; cells that do not parse count as missing.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let cities = df
            .column(CITY_COLUMN)
            .with_context(|| format!("Column '{}' not found", CITY_COLUMN))?
            .cast(&DataType::String)
            .with_context(|| format!("Column '{}' is not castable to string", CITY_COLUMN))?;
        let cities = cities.str()?;

        let aqi = df
            .column(AQI_COLUMN)
            .with_context(|| format!("Column '{}' not found", AQI_COLUMN))?
            .cast(&DataType::Float64)
            .with_context(|| format!("Column '{}' is not numeric", AQI_COLUMN))?;
        let aqi = aqi.f64()?;

        Ok(Self::from_rows(cities.into_iter().zip(aqi.into_iter())))
    }

    /// Group `(city, aqi)` rows and average, skipping rows with a missing
    /// city or a missing/non-finite AQI
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Option<S>, Option<f64>)>,
        S: AsRef<str>,
    {
        // (city, sum, count) in first-appearance order
        let mut groups: Vec<(String, f64, usize)> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();

        for (city, aqi) in rows {
            let (Some(city), Some(aqi)) = (city, aqi) else {
                continue;
            };
            if !aqi.is_finite() {
                continue;
            }

            let city = city.as_ref();
            let slot = match index.get(city) {
                Some(&slot) => slot,
                None => {
                    groups.push((city.to_string(), 0.0, 0));
                    index.insert(city.to_string(), groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[slot].1 += aqi;
            groups[slot].2 += 1;
        }

        let mut cities: Vec<CityAggregate> = groups
            .into_iter()
            .map(|(city, sum, count)| CityAggregate {
                city,
                avg_aqi: sum / count as f64,
            })
            .collect();

        // Stable sort keeps first-appearance order for equal averages
        cities.sort_by(|a, b| b.avg_aqi.partial_cmp(&a.avg_aqi).unwrap_or(Ordering::Equal));

        CityRanking { cities }
    }

    /// Up to `n` most polluted cities, averages rounded to two decimals
    pub fn top_polluted(&self, n: usize) -> Vec<CityAggregate> {
        self.cities
            .iter()
            .take(n)
            .map(|c| CityAggregate {
                city: c.city.clone(),
                avg_aqi: round2(c.avg_aqi),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("aqi_advisor_ranking_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_tie_keeps_first_appearance_order() {
        let ranking = CityRanking::from_rows(vec![
            (Some("A"), Some(10.0)),
            (Some("A"), Some(30.0)),
            (Some("B"), Some(20.0)),
        ]);

        let top = ranking.top_polluted(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].city, "A");
        assert_eq!(top[1].city, "B");
        assert_relative_eq!(top[0].avg_aqi, 20.0);
        assert_relative_eq!(top[1].avg_aqi, 20.0);
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let ranking = CityRanking::from_rows(vec![
            (Some("Chennai"), Some(80.0)),
            (Some("Delhi"), Some(300.0)),
            (Some("Patna"), Some(210.0)),
            (Some("Delhi"), Some(250.0)),
            (Some("Aizawl"), Some(30.0)),
        ]);

        let top = ranking.top_polluted(3);
        let names: Vec<&str> = top.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(names, vec!["Delhi", "Patna", "Chennai"]);
        assert_relative_eq!(top[0].avg_aqi, 275.0);
        assert_eq!(ranking.len(), 4);
        assert_eq!(ranking.top_polluted(10).len(), 4);
        assert!(ranking.top_polluted(0).is_empty());
    }

    #[test]
    fn test_missing_values_ignored() {
        let ranking = CityRanking::from_rows(vec![
            (Some("A"), Some(10.0)),
            (Some("A"), None),
            (None, Some(999.0)),
            (Some("B"), Some(f64::NAN)),
        ]);

        let top = ranking.top_polluted(5);
        assert_eq!(top, vec![CityAggregate { city: "A".into(), avg_aqi: 10.0 }]);
    }

    #[test]
    fn test_averages_rounded_to_two_decimals() {
        let ranking = CityRanking::from_rows(vec![
            (Some("A"), Some(10.0)),
            (Some("A"), Some(10.0)),
            (Some("A"), Some(10.005)),
        ]);
        assert_relative_eq!(ranking.top_polluted(1)[0].avg_aqi, 10.0, epsilon = 1e-9);

        let ranking = CityRanking::from_rows(vec![(Some("B"), Some(1.0)), (Some("B"), Some(2.0)), (Some("B"), Some(2.0))]);
        assert_relative_eq!(ranking.top_polluted(1)[0].avg_aqi, 1.67, epsilon = 1e-9);
    }

    #[test]
    fn test_from_frame_casts_aqi() {
        let df = df![
            "City" => &["Delhi", "Delhi", "Mumbai"],
            "AQI" => &["300", "n/a", "120"],
        ]
        .unwrap();

        let ranking = CityRanking::from_frame(&df).unwrap();
        let top = ranking.top_polluted(5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], CityAggregate { city: "Delhi".into(), avg_aqi: 300.0 });
        assert_eq!(top[1], CityAggregate { city: "Mumbai".into(), avg_aqi: 120.0 });
    }

    #[test]
    fn test_from_frame_missing_column() {
        let df = df!["Town" => &["Delhi"], "AQI" => &[300.0]].unwrap();
        assert!(CityRanking::from_frame(&df).is_err());
    }

    #[test]
    fn test_load_missing_dataset_is_empty() {
        let path = std::env::temp_dir().join("aqi_advisor_no_dataset.csv");
        assert!(CityRanking::load(&path).is_empty());
    }

    #[test]
    fn test_load_csv_dataset() {
        let path = temp_path("cities.csv");
        std::fs::write(
            &path,
            "Unnamed: 0,City,AQI\n0,Chennai,90\n1,Delhi,310\n2,Delhi,290.5\n3,Patna,\n",
        )
        .unwrap();

        let ranking = CityRanking::load(&path);
        let top = ranking.top_polluted(5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].city, "Delhi");
        assert_relative_eq!(top[0].avg_aqi, 300.25);
        assert_eq!(top[1], CityAggregate { city: "Chennai".into(), avg_aqi: 90.0 });

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_csv_with_late_fractional_aqi() {
        let path = temp_path("late_float.csv");
        let mut contents = String::from("City,AQI\n");
        for i in 0..150 {
            contents.push_str(&format!("Delhi,{}\n", 200 + i % 3));
        }
        contents.push_str("Mumbai,123.5\n");
        std::fs::write(&path, contents).unwrap();

        let ranking = CityRanking::load(&path);
        assert_eq!(ranking.len(), 2);
        let top = ranking.top_polluted(2);
        assert_relative_eq!(top[0].avg_aqi, 201.0);
        assert_eq!(top[1], CityAggregate { city: "Mumbai".into(), avg_aqi: 123.5 });

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_parquet_dataset() {
        let path = temp_path("cities.parquet");
        let mut df = df![
            "City" => &["Lucknow", "Patna", "Lucknow"],
            "AQI" => &[200.0, 240.0, 260.0],
        ]
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();

        let top = CityRanking::load(&path).top_polluted(5);
        assert_eq!(
            top,
            vec![
                CityAggregate { city: "Patna".into(), avg_aqi: 240.0 },
                CityAggregate { city: "Lucknow".into(), avg_aqi: 230.0 },
            ]
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_blank_aqi_is_empty() {
        let path = temp_path("blank_aqi.csv");
        std::fs::write(&path, "City,AQI\nDelhi,\nPatna,\n").unwrap();

        assert!(CityRanking::load(&path).is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(CityAggregate { city: "Delhi".into(), avg_aqi: 275.5 }).unwrap();
        assert_eq!(json, serde_json::json!({"city": "Delhi", "avgAqi": 275.5}));
    }
}
