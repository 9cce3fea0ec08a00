//! # Sales Dashboard Workspace
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`math`]: gap interpolation
//! - [`forecast`]: sales table loading, cleaning and the weekly forecast
//! - [`dashboard`]: filters, summaries and the terminal report
//!
//! ## Example
//!
//! ```
//! use sales_dashboard_workspace::forecast::{forecast_sales, SaleRecord, SalesTable, ForecastConfig};
//! use chrono::{Duration, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2022, 4, 1).unwrap();
//! let records: Vec<SaleRecord> = (0..70)
//!     .map(|i| SaleRecord::new(start + Duration::days(i), 100.0))
//!     .collect();
//! let table = SalesTable::from_records(&records).unwrap();
//!
//! let forecast = forecast_sales(&table, &ForecastConfig::default()).unwrap();
//! assert_eq!(forecast.len(), 4);
//! ```

pub use sales_dashboard as dashboard;
pub use sales_forecast as forecast;
pub use sales_math as math;
