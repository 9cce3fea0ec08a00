//! # Sales Dashboard
//!
//! `sales_dashboard` renders a cleaned sales dataset as a terminal report:
//! year and time-of-sale filters, the total sales metric, a per-item-type bar
//! chart and the four-week sales forecast from [`sales_forecast`].
//!
//! ## Usage Example
//!
//! ```no_run
//! use sales_dashboard::{Dashboard, DashboardConfig, Filter, SalesFilter};
//!
//! let dashboard = Dashboard::load(DashboardConfig::default())?;
//! let filter = SalesFilter::new(Filter::Only(2022), Filter::All);
//! println!("{}", dashboard.report(&filter)?);
//! # Ok::<(), sales_dashboard::DashboardError>(())
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod filters;
pub mod report;
pub mod summary;

pub use chart::{compact_label, BarChart};
pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use filters::{Filter, SalesFilter};
pub use report::{Dashboard, Report};
pub use summary::{format_currency, SalesSummary};
