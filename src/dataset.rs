//! Historical AQI Dataset
//!
//! Loads the merged city-level AQI table with Polars. Only the city and AQI
//! columns are kept; everything else (pollutant columns, pandas `Unnamed`
//! index columns) is ignored.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

pub const CITY_COLUMN: &str = "City";
pub const AQI_COLUMN: &str = "AQI";

/// Load the dataset (Parquet by extension, CSV otherwise) and select the
/// `City` and `AQI` columns
pub fn load_aqi_table(path: &Path) -> Result<DataFrame> {
    let df = if path.extension().is_some_and(|ext| ext == "parquet") {
        LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to scan parquet: {:?}", path))?
            .collect()
            .with_context(|| "Failed to load AQI parquet")?
    } else {
        // Full-file inference: integer AQI early on must not pin the column
        // to i64 when fractional values appear later
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| "Failed to load AQI CSV")?
    };

    df.select([CITY_COLUMN, AQI_COLUMN])
        .with_context(|| format!("Dataset must have '{}' and '{}' columns", CITY_COLUMN, AQI_COLUMN))
}
