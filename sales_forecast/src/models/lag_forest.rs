//! Random forest on weekly lag features
//!
//! Training turns the weekly series into lag-feature rows and fits a
//! smartcore random forest. Every lag is tried at every split (`m` equals
//! the number of lags), so the ensemble is plain bagging of regression
//! trees; the bootstrap draws are fixed by [`ForestParams::seed`].
//!
//! Forecasting is recursive: each prediction is pushed into a [`LagWindow`]
//! and becomes lag 1 for the next step.

use crate::config::ForestParams;
use crate::error::{ForecastError, Result};
use crate::features::{build_lag_features, to_training_set, LagWindow};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::WeeklySeries;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;
use tracing::debug;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Lag-feature random forest model
#[derive(Debug, Clone)]
pub struct LagForest {
    /// Name of the model
    name: String,
    /// Number of weekly lags
    lags: usize,
    /// Ensemble settings
    params: ForestParams,
}

/// Trained lag-feature random forest
pub struct TrainedLagForest {
    name: String,
    forest: Forest,
    /// Most recent observed weeks, newest as lag 1
    window: LagWindow,
    /// Training features, kept for in-sample evaluation
    x_train: DenseMatrix<f64>,
    y_train: Vec<f64>,
}

impl LagForest {
    /// Create a new lag-feature forest
    pub fn new(lags: usize, params: ForestParams) -> Result<Self> {
        if lags == 0 {
            return Err(ForecastError::InvalidParameter(
                "Number of lags must be positive".to_string(),
            ));
        }
        params.validate()?;

        Ok(Self {
            name: format!(
                "Lag Random Forest (lags={}, trees={}, seed={})",
                lags, params.n_estimators, params.seed
            ),
            lags,
            params,
        })
    }

    pub fn lags(&self) -> usize {
        self.lags
    }

    fn smartcore_params(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.params.n_estimators)
            .with_m(self.lags)
            .with_min_samples_split(self.params.min_samples_split)
            .with_min_samples_leaf(self.params.min_samples_leaf)
            .with_seed(self.params.seed);
        match self.params.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

impl ForecastModel for LagForest {
    type Trained = TrainedLagForest;

    fn train(&self, series: &WeeklySeries) -> Result<Self::Trained> {
        let rows = build_lag_features(series, self.lags)?;
        let (features, y_train) = to_training_set(&rows);
        let x_train = DenseMatrix::from_2d_vec(&features)?;

        debug!(
            rows = rows.len(),
            lags = self.lags,
            trees = self.params.n_estimators,
            "fitting lag forest"
        );
        let forest = Forest::fit(&x_train, &y_train, self.smartcore_params())?;

        let window = LagWindow::from_history(&series.values(), self.lags)?;

        Ok(TrainedLagForest {
            name: self.name.clone(),
            forest,
            window,
            x_train,
            y_train,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLagForest {
    /// Lags that seed the next forecast, lag 1 first
    pub fn last_window(&self) -> Vec<f64> {
        self.window.features()
    }

    fn predict_one(&self, features: &[f64]) -> Result<f64> {
        let row = DenseMatrix::from_2d_vec(&vec![features.to_vec()])?;
        self.forest
            .predict(&row)?
            .first()
            .copied()
            .ok_or_else(|| ForecastError::ModelError("forest returned no prediction".to_string()))
    }
}

impl fmt::Debug for TrainedLagForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedLagForest")
            .field("name", &self.name)
            .field("window", &self.window)
            .field("training_rows", &self.y_train.len())
            .finish()
    }
}

impl TrainedForecastModel for TrainedLagForest {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let mut window = self.window.clone();
        let mut features = vec![0.0; window.size()];
        let mut values = Vec::with_capacity(horizon);

        for step in 0..horizon {
            window.write_features(&mut features);
            let next = self.predict_one(&features)?;
            debug!(step = step + 1, value = next, "recursive forecast step");
            values.push(next);
            window.push(next);
        }

        ForecastResult::new(values, horizon)
    }

    fn fitted(&self) -> Result<(ForecastResult, Vec<f64>)> {
        let predictions = self.forest.predict(&self.x_train)?;
        let n = predictions.len();
        Ok((ForecastResult::new(predictions, n)?, self.y_train.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn weekly(values: impl IntoIterator<Item = f64>) -> WeeklySeries {
        let start = NaiveDate::from_ymd_opt(2022, 4, 1).unwrap();
        WeeklySeries::from_points(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::weeks(i as i64), v))
                .collect(),
        )
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_estimators: 20,
            ..ForestParams::default()
        }
    }

    #[test]
    fn constant_series_forecasts_the_constant() {
        let model = LagForest::new(8, small_params()).unwrap();
        let trained = model.train(&weekly(vec![100.0; 10])).unwrap();
        let forecast = trained.forecast(4).unwrap();

        assert_eq!(forecast.horizons(), 4);
        assert!(forecast.values().iter().all(|v| *v == 100.0));
    }

    #[test]
    fn window_starts_from_latest_weeks() {
        let model = LagForest::new(3, small_params()).unwrap();
        let trained = model
            .train(&weekly((1..=6).map(|v| v as f64)))
            .unwrap();
        assert_eq!(trained.last_window(), vec![6.0, 5.0, 4.0]);
    }

    #[test]
    fn forecasts_stay_within_training_range() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64 * 10.0).collect();
        let model = LagForest::new(4, small_params()).unwrap();
        let trained = model.train(&weekly(values)).unwrap();
        let forecast = trained.forecast(4).unwrap();

        // tree leaves are means of observed targets
        assert!(forecast.values().iter().all(|v| (100.0..=140.0).contains(v)));

        let (fitted, actual) = trained.fitted().unwrap();
        assert_eq!(fitted.len(), actual.len());
        assert_eq!(actual.len(), 26);
    }

    #[test]
    fn same_seed_gives_identical_forecasts() {
        let values: Vec<f64> = (0..40).map(|i| 500.0 + ((i * 37) % 11) as f64 * 25.0).collect();
        let model = LagForest::new(8, small_params()).unwrap();

        let a = model.train(&weekly(values.clone())).unwrap().forecast(4).unwrap();
        let b = model.train(&weekly(values)).unwrap().forecast(4).unwrap();

        let bits = |r: &ForecastResult| r.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn short_series_is_insufficient() {
        let model = LagForest::new(8, small_params()).unwrap();
        assert!(matches!(
            model.train(&weekly(vec![1.0; 8])),
            Err(ForecastError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn invalid_configuration() {
        assert!(LagForest::new(0, small_params()).is_err());
        let params = ForestParams {
            n_estimators: 0,
            ..ForestParams::default()
        };
        assert!(LagForest::new(4, params).is_err());
    }
}
