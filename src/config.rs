//! Runtime configuration from environment variables
//!
//! | Variable         | Default                                     |
//! |------------------|---------------------------------------------|
//! | `MODEL_PATH`     | `model.json`                                |
//! | `DATASET_PATH`   | `data/merged_output/merged_aqi_india.csv`   |
//! | `PORT`           | `5000`                                      |
//! | `TOP_CITIES`     | `5`                                         |
//! | `CACHE_CAPACITY` | `10000`                                     |
//! | `CACHE_TTL_SECS` | `300`                                       |

use std::path::PathBuf;
use std::str::FromStr;

use crate::ranking::DEFAULT_TOP_CITIES;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    pub port: u16,
    pub top_cities: usize,
    pub cache_capacity: u64,
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            model_path: PathBuf::from("model.json"),
            dataset_path: PathBuf::from("data/merged_output/merged_aqi_india.csv"),
            port: 5000,
            top_cities: DEFAULT_TOP_CITIES,
            cache_capacity: 10_000,
            cache_ttl_secs: 300,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Settings {
            model_path: lookup("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path),
            dataset_path: lookup("DATASET_PATH").map(PathBuf::from).unwrap_or(defaults.dataset_path),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            top_cities: parsed(&lookup, "TOP_CITIES").unwrap_or(defaults.top_cities),
            cache_capacity: parsed(&lookup, "CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            cache_ttl_secs: parsed(&lookup, "CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl_secs),
        }
    }

    pub fn log(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  MODEL_PATH: {:?}", self.model_path);
        tracing::info!("  DATASET_PATH: {:?}", self.dataset_path);
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  TOP_CITIES: {}", self.top_cities);
        tracing::info!("  CACHE: {} entries, {}s TTL", self.cache_capacity, self.cache_ttl_secs);
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}; using default", key, raw);
            None
        }
    }
}
