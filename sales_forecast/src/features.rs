//! Lag features for weekly series

use crate::error::{ForecastError, Result};
use crate::series::WeeklySeries;
use chrono::NaiveDate;

/// One supervised-learning row: the previous `n` weeks and the current week
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Week-ending date of the target
    pub date: NaiveDate,
    /// `lags[0]` is last week, `lags[n - 1]` is `n` weeks ago
    pub lags: Vec<f64>,
    pub target: f64,
}

/// Build one row per week that has `lags` full weeks of history.
///
/// The first `lags` weeks have incomplete history and produce no row.
pub fn build_lag_features(weekly: &WeeklySeries, lags: usize) -> Result<Vec<FeatureRow>> {
    if lags == 0 {
        return Err(ForecastError::InvalidParameter(
            "lags must be greater than zero".to_string(),
        ));
    }
    if weekly.len() <= lags {
        return Err(ForecastError::InsufficientHistory {
            required: lags + 1,
            available: weekly.len(),
        });
    }

    let points = weekly.points();
    let rows = (lags..points.len())
        .map(|t| FeatureRow {
            date: points[t].0,
            lags: (1..=lags).map(|k| points[t - k].1).collect(),
            target: points[t].1,
        })
        .collect();

    Ok(rows)
}

/// Split rows into feature rows (lag 1 first) and a target vector
pub fn to_training_set(rows: &[FeatureRow]) -> (Vec<Vec<f64>>, Vec<f64>) {
    rows.iter().map(|r| (r.lags.clone(), r.target)).unzip()
}

/// Fixed-size rolling buffer of the most recent weekly values.
///
/// Pushing a value makes it lag 1 and drops the oldest lag; no allocation
/// happens after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LagWindow {
    buf: Box<[f64]>,
    newest: usize,
}

impl LagWindow {
    /// Seed the window with the last `size` values of a chronological history
    pub fn from_history(history: &[f64], size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ForecastError::InvalidParameter(
                "Lag window size must be greater than zero".to_string(),
            ));
        }
        if history.len() < size {
            return Err(ForecastError::InsufficientHistory {
                required: size,
                available: history.len(),
            });
        }

        let tail = &history[history.len() - size..];
        Ok(Self {
            buf: tail.to_vec().into_boxed_slice(),
            newest: size - 1,
        })
    }

    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Value `k` weeks back (1-based); `None` outside `1..=size`
    pub fn lag(&self, k: usize) -> Option<f64> {
        let n = self.buf.len();
        if k == 0 || k > n {
            return None;
        }
        Some(self.buf[(self.newest + n - (k - 1)) % n])
    }

    /// Make `value` the newest lag, discarding the oldest
    pub fn push(&mut self, value: f64) {
        self.newest = (self.newest + 1) % self.buf.len();
        self.buf[self.newest] = value;
    }

    /// Write lags 1..=n into `out` (lag 1 first)
    pub fn write_features(&self, out: &mut [f64]) {
        let n = self.buf.len();
        for (k, slot) in out.iter_mut().enumerate().take(n) {
            *slot = self.buf[(self.newest + n - k) % n];
        }
    }

    pub fn features(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.buf.len()];
        self.write_features(&mut out);
        out
    }
}
