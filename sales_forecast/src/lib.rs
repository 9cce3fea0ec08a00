//! # Sales Forecast
//!
//! A Rust library for turning a table of sales transactions into a short
//! weekly sales forecast.
//!
//! ## Features
//!
//! - Raw export cleaning (deduplication, mixed date formats, derived totals)
//! - Sales table loading backed by polars
//! - Daily aggregation with gap interpolation and weekly resampling
//! - Lag-feature random forest with a recursive multi-week forecast
//! - TOML configuration
//!
//! ## Pipeline
//!
//! 1. sum `total_price` per calendar date
//! 2. fill every missing day between the first and last sale by linear
//!    interpolation
//! 3. sample one value per week on a fixed anchor weekday (Friday by default)
//! 4. build rows of the previous 8 weeks → current week
//! 5. fit a seeded, bagged regression-tree ensemble
//! 6. predict 4 weeks ahead, feeding each prediction back in as lag 1
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::{try_forecast, DataLoader, ForecastConfig};
//!
//! let table = DataLoader::from_csv("data/processed_dataset.csv")?;
//! match try_forecast(&table, &ForecastConfig::default()) {
//!     Some(forecast) => {
//!         for (date, value) in forecast.to_map() {
//!             println!("{date}: {value:.2}");
//!         }
//!     }
//!     None => println!("forecast unavailable"),
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod cleaning;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod series;
pub mod utils;

// Re-export commonly used types
pub use crate::cleaning::{clean_file, clean_sales, CleaningOptions, CleaningReport};
pub use crate::config::{ForecastConfig, ForestParams, WeeklyAggregation};
pub use crate::data::{DataLoader, SaleRecord, SalesTable};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{forecast_sales, try_forecast, ForecastPoint, SalesForecast};
pub use crate::series::{DailySeries, WeeklySeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
