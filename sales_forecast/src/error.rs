//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use smartcore::error::Failed;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A column the pipeline needs is not in the table
    #[error("Missing column: '{0}'")]
    MissingColumn(String),

    /// Not enough weekly points to build a single lag-feature row
    #[error("Insufficient history: need at least {required} weekly points, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// The table had no usable rows
    #[error("No usable sales rows")]
    EmptyData,

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error while loading or parsing configuration
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error raised while fitting or evaluating the regression model
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader or writer
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// True for the failures that mean "there is no forecast to show" rather
    /// than a broken environment.
    pub fn is_not_computable(&self) -> bool {
        matches!(
            self,
            ForecastError::MissingColumn(_)
                | ForecastError::InsufficientHistory { .. }
                | ForecastError::EmptyData
        )
    }
}

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<Failed> for ForecastError {
    fn from(err: Failed) -> Self {
        ForecastError::ModelError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::DataError(err.to_string())
    }
}
