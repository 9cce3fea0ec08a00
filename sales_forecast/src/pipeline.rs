//! Weekly sales forecast pipeline
//!
//! `table → daily totals → densified daily → weekly → lag forest → forecast`
//!
//! [`forecast_sales`] reports why a forecast could not be made;
//! [`try_forecast`] is the boundary used by presentation code and collapses
//! every failure into `None`.

use crate::config::ForecastConfig;
use crate::data::SalesTable;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, LagForest, TrainedForecastModel};
use crate::series::{DailySeries, WeeklySeries};
use crate::utils::{forecast_accuracy, future_dates, ForecastAccuracy};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A single forecast week
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Forecast for the weeks following the last observed week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesForecast {
    points: Vec<ForecastPoint>,
    last_observed: NaiveDate,
    weeks_used: usize,
    training_fit: Option<ForecastAccuracy>,
}

impl SalesForecast {
    /// Forecast weeks in chronological order
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last weekly anchor with observed data
    pub fn last_observed(&self) -> NaiveDate {
        self.last_observed
    }

    /// Number of weekly points the model saw
    pub fn weeks_used(&self) -> usize {
        self.weeks_used
    }

    /// In-sample accuracy of the fitted model
    pub fn training_fit(&self) -> Option<&ForecastAccuracy> {
        self.training_fit.as_ref()
    }

    /// `YYYY-MM-DD → value`
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.points
            .iter()
            .map(|p| (p.date.format("%Y-%m-%d").to_string(), p.value))
            .collect()
    }

    /// JSON object of `YYYY-MM-DD → value`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_map())?)
    }
}

/// Sum the value column per calendar date
pub fn daily_totals(table: &SalesTable, config: &ForecastConfig) -> Result<DailySeries> {
    // value column first so a table without it fails with MissingColumn
    // regardless of the date column's contents
    if !table.has_column(&config.value_column) {
        return Err(ForecastError::MissingColumn(config.value_column.clone()));
    }
    let observations = table.dated_values(&config.date_column, &config.value_column)?;
    Ok(DailySeries::from_observations(observations))
}

/// Daily totals densified and resampled to the configured weekly anchor
pub fn weekly_totals(table: &SalesTable, config: &ForecastConfig) -> Result<WeeklySeries> {
    let daily = daily_totals(table, config)?;
    if daily.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let dense = daily.densify();
    debug!(
        observed_days = daily.len(),
        dense_days = dense.len(),
        "densified daily series"
    );

    let weekly = dense.resample_weekly(config.anchor, config.aggregation);
    debug!(
        weeks = weekly.len(),
        anchor = %config.anchor,
        "resampled to weekly series"
    );
    Ok(weekly)
}

/// Forecast the next `config.horizon` weeks of sales.
pub fn forecast_sales(table: &SalesTable, config: &ForecastConfig) -> Result<SalesForecast> {
    config.validate()?;

    let weekly = weekly_totals(table, config)?;
    if weekly.len() < config.min_weeks() {
        return Err(ForecastError::InsufficientHistory {
            required: config.min_weeks(),
            available: weekly.len(),
        });
    }
    let last_observed = weekly.last_anchor().ok_or(ForecastError::EmptyData)?;

    let model = LagForest::new(config.lags, config.forest)?;
    let trained = model.train(&weekly)?;
    let forecast = trained.forecast(config.horizon)?;

    let (fitted, actual) = trained.fitted()?;
    let training_fit = forecast_accuracy(fitted.values(), &actual).ok();
    if let Some(fit) = &training_fit {
        debug!(mae = fit.mae, rmse = fit.rmse, "in-sample fit");
    }

    let dates = future_dates(last_observed, config.horizon, "weekly")?;
    let points: Vec<ForecastPoint> = dates
        .into_iter()
        .zip(forecast.values().iter().copied())
        .map(|(date, value)| ForecastPoint { date, value })
        .collect();

    info!(
        model = trained.name(),
        weeks = weekly.len(),
        last_observed = %last_observed,
        horizon = points.len(),
        "sales forecast ready"
    );

    Ok(SalesForecast {
        points,
        last_observed,
        weeks_used: weekly.len(),
        training_fit,
    })
}

/// Forecast, or `None` when no forecast can be computed.
///
/// Never returns a partial forecast; the reason for `None` is logged.
pub fn try_forecast(table: &SalesTable, config: &ForecastConfig) -> Option<SalesForecast> {
    match forecast_sales(table, config) {
        Ok(forecast) => Some(forecast),
        Err(err) if err.is_not_computable() => {
            warn!(reason = %err, "forecast not computable");
            None
        }
        Err(err) => {
            warn!(error = %err, "forecast failed");
            None
        }
    }
}
