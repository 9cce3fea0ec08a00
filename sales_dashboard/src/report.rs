//! The dashboard: load, filter, summarise, forecast, render

use crate::chart::BarChart;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::filters::{time_of_sale_options, year_options, SalesFilter};
use crate::summary::{format_currency, SalesSummary};
use sales_forecast::{try_forecast, DataLoader, ForecastError, SaleRecord, SalesForecast, SalesTable};
use serde::Serialize;
use std::fmt;
use std::io;
use tracing::{debug, info};

pub const NO_DATA_WARNING: &str =
    "No data to display. Please ensure the dataset is processed and available.";
pub const FORECAST_UNAVAILABLE_WARNING: &str =
    "Forecast unavailable: the sales history is too short or incomplete to compute one.";

/// A loaded sales dataset and the settings used to present it
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    table: SalesTable,
    records: Vec<SaleRecord>,
}

impl Dashboard {
    /// Load the cleaned dataset named by `config.data_path`.
    ///
    /// A missing or empty file is `DashboardError::NoData`.
    pub fn load(config: DashboardConfig) -> Result<Self> {
        let table = match DataLoader::from_csv(&config.data_path) {
            Ok(table) => table,
            Err(ForecastError::IoError(err)) if err.kind() == io::ErrorKind::NotFound => {
                return Err(DashboardError::NoData(format!(
                    "processed dataset not found at {}; run `clean` first",
                    config.data_path.display()
                )))
            }
            Err(err) => return Err(err.into()),
        };
        Self::from_table(config, table)
    }

    pub fn from_table(config: DashboardConfig, table: SalesTable) -> Result<Self> {
        if table.is_empty() {
            return Err(DashboardError::NoData("dataset has no rows".to_string()));
        }
        let records = table.records()?;
        if records.is_empty() {
            return Err(DashboardError::NoData("dataset has no dated rows".to_string()));
        }
        info!(rows = records.len(), "sales dataset loaded");
        Ok(Self {
            config,
            table,
            records,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    /// Forecast over the whole dataset, regardless of any report filter
    pub fn forecast(&self) -> Option<SalesForecast> {
        try_forecast(&self.table, &self.config.forecast)
    }

    /// Build the report for `filter`
    pub fn report(&self, filter: &SalesFilter) -> Result<Report> {
        let year_options = year_options(&self.records);
        let rows = filter.apply(&self.records)?;
        debug!(
            year = %filter.year,
            time_of_sale = %filter.time_of_sale,
            rows = rows.len(),
            "filters applied"
        );

        let time_options = match filter.year.selected() {
            None => time_of_sale_options(&self.records),
            Some(_) => {
                let by_year = SalesFilter::new(filter.year.clone(), Default::default());
                time_of_sale_options(&by_year.apply(&self.records)?)
            }
        };

        let summary = SalesSummary::from_records(&rows);
        let period = filter.period_label();
        let chart = BarChart::new(
            format!("Total Sales by Type of Items ({})", period),
            summary.by_item_type.clone(),
            self.config.chart_width,
        );

        Ok(Report {
            title: self.config.title.clone(),
            currency_symbol: self.config.currency_symbol.clone(),
            period,
            year: filter.year.to_string(),
            time_of_sale: filter.time_of_sale.to_string(),
            year_options,
            time_options,
            summary,
            chart,
            forecast: self.forecast(),
        })
    }
}

/// A rendered-ready dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub currency_symbol: String,
    /// `All Years` or the selected year
    pub period: String,
    pub year: String,
    pub time_of_sale: String,
    pub year_options: Vec<String>,
    pub time_options: Vec<String>,
    pub summary: SalesSummary,
    #[serde(skip)]
    pub chart: BarChart,
    pub forecast: Option<SalesForecast>,
}

impl Report {
    /// Label of the headline metric
    pub fn metric_label(&self) -> String {
        format!("Total Sales ({})", self.period)
    }

    pub fn metric_value(&self) -> String {
        format_currency(self.summary.total_sales, &self.currency_symbol)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f)?;
        writeln!(
            f,
            "Year: {}  [{}]",
            self.year,
            self.year_options.join(" | ")
        )?;
        writeln!(
            f,
            "Time of sale: {}  [{}]",
            self.time_of_sale,
            self.time_options.join(" | ")
        )?;
        writeln!(f)?;
        writeln!(f, "Summary Metrics")?;
        writeln!(f, "  {}: {}", self.metric_label(), self.metric_value())?;
        writeln!(f)?;
        write!(f, "{}", self.chart)?;
        writeln!(f)?;
        write_forecast(f, self.forecast.as_ref(), &self.currency_symbol)
    }
}

/// Forecast section, or the unavailable warning
pub fn write_forecast<W: fmt::Write>(
    out: &mut W,
    forecast: Option<&SalesForecast>,
    currency_symbol: &str,
) -> fmt::Result {
    match forecast {
        Some(forecast) => {
            writeln!(out, "Sales Forecast (next {} weeks)", forecast.len())?;
            for point in forecast.points() {
                writeln!(
                    out,
                    "  {}  {}",
                    point.date.format("%Y-%m-%d"),
                    format_currency(point.value, currency_symbol)
                )?;
            }
            Ok(())
        }
        None => writeln!(out, "Warning: {}", FORECAST_UNAVAILABLE_WARNING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Filter;
    use chrono::{Duration, NaiveDate};

    fn sale(date: NaiveDate, price: f64, item_type: &str, time: &str) -> SaleRecord {
        SaleRecord {
            item_type: Some(item_type.to_string()),
            time_of_sale: Some(time.to_string()),
            ..SaleRecord::new(date, price)
        }
    }

    fn dashboard(days: i64) -> Dashboard {
        let start = NaiveDate::from_ymd_opt(2022, 12, 1).unwrap();
        let records: Vec<SaleRecord> = (0..days)
            .flat_map(|i| {
                let date = start + Duration::days(i);
                [
                    sale(date, 100.0, "Fastfood", "Night"),
                    sale(date, 50.0, "Beverages", "Morning"),
                ]
            })
            .collect();
        let mut config = DashboardConfig::default();
        config.forecast.forest.n_estimators = 10;
        Dashboard::from_table(config, SalesTable::from_records(&records).unwrap()).unwrap()
    }

    #[test]
    fn report_for_selected_year() {
        let board = dashboard(90);
        let filter = SalesFilter::new(Filter::Only(2022), Filter::All);
        let report = board.report(&filter).unwrap();

        // 31 days of December 2022
        assert_eq!(report.summary.rows, 62);
        assert_eq!(report.summary.total_sales, 31.0 * 150.0);
        assert_eq!(report.metric_label(), "Total Sales (2022)");
        assert_eq!(report.metric_value(), "₹4,650.00");
        assert_eq!(report.year_options, vec!["All", "2022", "2023"]);
        assert_eq!(report.chart.title(), "Total Sales by Type of Items (2022)");
    }

    #[test]
    fn forecast_ignores_report_filters() {
        let board = dashboard(90);
        let filter = SalesFilter::new(Filter::Only(2022), Filter::Only("Night".to_string()));
        let report = board.report(&filter).unwrap();

        let forecast = report.forecast.as_ref().unwrap();
        assert_eq!(forecast.len(), 4);
        assert!(forecast.points().iter().all(|p| (p.value - 150.0).abs() < 1e-9));
    }

    #[test]
    fn short_history_renders_warning() {
        let report = dashboard(20).report(&SalesFilter::default()).unwrap();
        assert!(report.forecast.is_none());

        let text = report.to_string();
        assert!(text.contains("Total Sales (All Years): ₹3,000.00"));
        assert!(text.contains(FORECAST_UNAVAILABLE_WARNING));
        assert!(!text.contains("Sales Forecast (next"));
    }

    #[test]
    fn empty_table_is_no_data() {
        let table = SalesTable::from_records(&[]).unwrap();
        assert!(matches!(
            Dashboard::from_table(DashboardConfig::default(), table),
            Err(DashboardError::NoData(_))
        ));
    }
}
