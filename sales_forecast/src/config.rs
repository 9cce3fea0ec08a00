//! Forecast configuration
//!
//! All fields have defaults, so an empty TOML document (or a partial one)
//! yields a usable configuration:
//!
//! ```toml
//! lags = 8
//! horizon = 4
//! anchor = "Fri"
//! aggregation = "anchor_value"
//!
//! [forest]
//! n_estimators = 100
//! seed = 42
//! ```

use crate::error::{ForecastError, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the date column in cleaned sales tables
pub const DATE_COLUMN: &str = "date";
/// Name of the per-row revenue column in cleaned sales tables
pub const TOTAL_PRICE_COLUMN: &str = "total_price";

/// How a densified daily series is reduced to one value per week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyAggregation {
    /// Take the daily value that falls on the anchor day itself
    #[default]
    AnchorValue,
    /// Sum the seven days ending on the anchor day (complete weeks only)
    Sum,
}

/// Random forest settings
///
/// Every lag is a split candidate at every node, so the ensemble is plain
/// bagging; `seed` fixes the bootstrap draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,
    pub seed: u64,
    /// `None` grows every tree until its leaves are pure
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be greater than zero".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForecastError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the weekly lag-feature forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Column holding the sale date
    pub date_column: String,
    /// Column holding the sale amount
    pub value_column: String,
    /// Number of weekly lags used as features
    pub lags: usize,
    /// Number of weeks to forecast
    pub horizon: usize,
    /// Weekday that closes each week
    pub anchor: Weekday,
    /// Weekly reduction
    pub aggregation: WeeklyAggregation,
    /// Regression ensemble settings
    pub forest: ForestParams,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            date_column: DATE_COLUMN.to_string(),
            value_column: TOTAL_PRICE_COLUMN.to_string(),
            lags: 8,
            horizon: 4,
            anchor: Weekday::Fri,
            aggregation: WeeklyAggregation::AnchorValue,
            forest: ForestParams::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let input = fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Minimum number of weekly points needed to build one training row
    pub fn min_weeks(&self) -> usize {
        self.lags + 1
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.forest.seed = seed;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.lags == 0 {
            return Err(ForecastError::InvalidParameter(
                "lags must be greater than zero".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be greater than zero".to_string(),
            ));
        }
        if self.date_column.is_empty() || self.value_column.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "column names must not be empty".to_string(),
            ));
        }
        self.forest.validate()
    }
}
