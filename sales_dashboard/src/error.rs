//! Error types for the sales_dashboard crate

use sales_forecast::ForecastError;
use thiserror::Error;

/// Errors raised while building a dashboard report
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Loading or forecasting failed in the core
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// Nothing to display
    #[error("No data to display: {0}")]
    NoData(String),

    /// A filter value that does not occur in the data
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Writing the report failed
    #[error("Render error: {0}")]
    Render(String),
}

impl From<std::fmt::Error> for DashboardError {
    fn from(err: std::fmt::Error) -> Self {
        DashboardError::Render(err.to_string())
    }
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
