//! Dashboard configuration
//!
//! ```toml
//! data_path = "data/processed_dataset.csv"
//! raw_path = "data/dataset.csv"
//! chart_width = 40
//!
//! [forecast]
//! lags = 8
//! horizon = 4
//!
//! [forecast.forest]
//! seed = 42
//! ```

use crate::error::{DashboardError, Result};
use sales_forecast::{ForecastConfig, ForecastError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Report heading
    pub title: String,
    /// Cleaned dataset read by `report` and `forecast`
    pub data_path: PathBuf,
    /// Raw export read by `clean`
    pub raw_path: PathBuf,
    /// Width of the longest bar, in characters
    pub chart_width: usize,
    /// Prefix for money amounts
    pub currency_symbol: String,
    pub forecast: ForecastConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Balaji Sales Dashboard (April 22' - March 23')".to_string(),
            data_path: PathBuf::from("data/processed_dataset.csv"),
            raw_path: PathBuf::from("data/dataset.csv"),
            chart_width: 40,
            currency_symbol: "₹".to_string(),
            forecast: ForecastConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(ForecastError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let input = fs::read_to_string(path).map_err(ForecastError::from)?;
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chart_width == 0 {
            return Err(DashboardError::Forecast(ForecastError::InvalidParameter(
                "chart_width must be greater than zero".to_string(),
            )));
        }
        self.forecast.validate()?;
        Ok(())
    }
}
