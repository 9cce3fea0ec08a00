//! Row filters for the sales report
//!
//! A filter is either `All` or one value that occurs in the data. Option
//! lists always start with `All`, followed by the values present in the
//! rows, sorted. The time-of-sale options are taken from the rows that
//! survive the year filter.

use crate::error::{DashboardError, Result};
use chrono::Datelike;
use sales_forecast::SaleRecord;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const ALL: &str = "All";

/// `All`, or a single selected value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Filter<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    pub fn selected(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(v) => Some(v),
        }
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn accepts(&self, value: Option<&T>) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "{}", ALL),
            Filter::Only(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Filter<i32> {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            return Ok(Filter::All);
        }
        s.parse()
            .map(Filter::Only)
            .map_err(|_| DashboardError::InvalidFilter(format!("'{}' is not a year", s)))
    }
}

impl FromStr for Filter<String> {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            Ok(Filter::All)
        } else {
            Ok(Filter::Only(s.to_string()))
        }
    }
}

/// The filters applied to a report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalesFilter {
    pub year: Filter<i32>,
    pub time_of_sale: Filter<String>,
}

impl SalesFilter {
    pub fn new(year: Filter<i32>, time_of_sale: Filter<String>) -> Self {
        Self { year, time_of_sale }
    }

    /// Keep the rows matching both filters.
    ///
    /// A selected year or time of sale that does not occur in the data is
    /// rejected rather than silently producing an empty report.
    pub fn apply(&self, records: &[SaleRecord]) -> Result<Vec<SaleRecord>> {
        if let Some(year) = self.year.selected() {
            if !years(records).contains(year) {
                return Err(DashboardError::InvalidFilter(format!(
                    "year {} not present in the data",
                    year
                )));
            }
        }
        let by_year: Vec<SaleRecord> = records
            .iter()
            .filter(|r| self.year.accepts(Some(&r.date.year())))
            .cloned()
            .collect();

        if let Some(time) = self.time_of_sale.selected() {
            if !times_of_sale(&by_year).contains(time) {
                return Err(DashboardError::InvalidFilter(format!(
                    "time of sale '{}' not present in the data",
                    time
                )));
            }
        }
        Ok(by_year
            .into_iter()
            .filter(|r| self.time_of_sale.accepts(r.time_of_sale.as_ref()))
            .collect())
    }

    /// Label for the selected period, as used in headings
    pub fn period_label(&self) -> String {
        match self.year.selected() {
            None => "All Years".to_string(),
            Some(year) => year.to_string(),
        }
    }
}

/// `All` followed by every year in the data, ascending
pub fn year_options(records: &[SaleRecord]) -> Vec<String> {
    with_all(years(records).into_iter().map(|y| y.to_string()))
}

/// `All` followed by every time of sale in `records`, sorted
pub fn time_of_sale_options(records: &[SaleRecord]) -> Vec<String> {
    with_all(times_of_sale(records).into_iter())
}

fn years(records: &[SaleRecord]) -> BTreeSet<i32> {
    records.iter().map(|r| r.date.year()).collect()
}

fn times_of_sale(records: &[SaleRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|r| r.time_of_sale.clone())
        .collect()
}

fn with_all(values: impl Iterator<Item = String>) -> Vec<String> {
    std::iter::once(ALL.to_string()).chain(values).collect()
}
