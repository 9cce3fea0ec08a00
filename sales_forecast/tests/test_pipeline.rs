use chrono::{Datelike, Duration, NaiveDate, Weekday};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use sales_forecast::pipeline::{daily_totals, weekly_totals};
use sales_forecast::{
    forecast_sales, try_forecast, DataLoader, ForecastConfig, ForecastError, SaleRecord,
    SalesTable, WeeklyAggregation,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `days` consecutive days from `start`, two sales per day splitting `daily(i)`
fn table_from(start: NaiveDate, days: i64, daily: impl Fn(i64) -> f64) -> SalesTable {
    let records: Vec<SaleRecord> = (0..days)
        .flat_map(|i| {
            let date = start + Duration::days(i);
            let half = daily(i) / 2.0;
            [SaleRecord::new(date, half), SaleRecord::new(date, half)]
        })
        .collect();
    SalesTable::from_records(&records).unwrap()
}

fn fast_config() -> ForecastConfig {
    let mut config = ForecastConfig::default();
    config.forest.n_estimators = 25;
    config
}

#[test]
fn constant_sales_forecast_the_constant() {
    // 2022-04-01 is a Friday; 70 days cover ten Friday anchors
    let table = table_from(ymd(2022, 4, 1), 70, |_| 100.0);

    let weekly = weekly_totals(&table, &fast_config()).unwrap();
    assert_eq!(weekly.len(), 10);
    assert!(weekly.values().iter().all(|v| *v == 100.0));

    let forecast = forecast_sales(&table, &fast_config()).unwrap();
    assert_eq!(forecast.len(), 4);
    assert_eq!(forecast.last_observed(), ymd(2022, 6, 3));
    for point in forecast.points() {
        assert!((point.value - 100.0).abs() < 1e-9);
    }

    let map = forecast.to_map();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["2022-06-10", "2022-06-17", "2022-06-24", "2022-07-01"]);
}

#[test]
fn forecast_dates_step_one_week_from_last_anchor() {
    let table = table_from(ymd(2022, 1, 3), 120, |i| 50.0 + (i % 7) as f64 * 10.0);
    let forecast = forecast_sales(&table, &fast_config()).unwrap();

    let dates: Vec<NaiveDate> = forecast.points().iter().map(|p| p.date).collect();
    assert_eq!(dates[0] - forecast.last_observed(), Duration::days(7));
    for pair in dates.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::days(7));
    }
    assert!(dates.iter().all(|d| d.weekday() == Weekday::Fri));
}

#[test]
fn identical_input_gives_bit_identical_forecasts() {
    let table = table_from(ymd(2022, 4, 1), 200, |i| {
        1000.0 + 250.0 * ((i as f64) / 9.0).sin() + (i % 11) as f64 * 13.0
    });
    let config = fast_config().with_seed(7);

    let a = forecast_sales(&table, &config).unwrap();
    let b = forecast_sales(&table, &config).unwrap();

    let bits = |f: &sales_forecast::SalesForecast| -> Vec<u64> {
        f.points().iter().map(|p| p.value.to_bits()).collect()
    };
    assert_eq!(bits(&a), bits(&b));
    assert!(a.training_fit().is_some());
}

#[test]
fn missing_total_price_is_not_computable() {
    let df = DataFrame::new(vec![
        Series::new("date", vec!["2022-04-01", "2022-04-02"]),
        Series::new("item_type", vec!["Fastfood", "Beverages"]),
    ])
    .unwrap();
    let table = DataLoader::from_dataframe(df);

    assert!(matches!(
        forecast_sales(&table, &ForecastConfig::default()),
        Err(ForecastError::MissingColumn(c)) if c == "total_price"
    ));
    assert!(try_forecast(&table, &ForecastConfig::default()).is_none());
}

#[test]
fn short_history_is_not_computable() {
    // eight Friday anchors only
    let table = table_from(ymd(2022, 4, 1), 50, |_| 100.0);

    let err = forecast_sales(&table, &fast_config()).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientHistory {
            required: 9,
            available: 8
        }
    ));
    assert!(try_forecast(&table, &fast_config()).is_none());
}

#[test]
fn empty_table_is_not_computable() {
    let table = SalesTable::from_records(&[]).unwrap();
    assert!(matches!(
        forecast_sales(&table, &ForecastConfig::default()),
        Err(ForecastError::EmptyData)
    ));
    assert!(try_forecast(&table, &ForecastConfig::default()).is_none());
}

#[test]
fn missing_day_is_interpolated() {
    let table = SalesTable::from_records(&[
        SaleRecord::new(ymd(2022, 4, 1), 100.0),
        SaleRecord::new(ymd(2022, 4, 3), 200.0),
    ])
    .unwrap();

    let daily = daily_totals(&table, &ForecastConfig::default()).unwrap();
    assert_eq!(daily.get(ymd(2022, 4, 2)), None);

    let dense = daily.densify();
    assert_eq!(dense.get(ymd(2022, 4, 2)), Some(150.0));
    assert_eq!(dense.densify(), dense);
}

#[test]
fn interpolated_values_lie_between_neighbours() {
    // every third day has a sale
    let records: Vec<SaleRecord> = (0..60)
        .step_by(3)
        .map(|i| SaleRecord::new(ymd(2022, 1, 1) + Duration::days(i), (i * 7 % 50) as f64))
        .collect();
    let table = SalesTable::from_records(&records).unwrap();
    let daily = daily_totals(&table, &ForecastConfig::default()).unwrap();
    let dense = daily.densify();

    assert!(dense.is_dense());
    let known: Vec<(NaiveDate, f64)> = daily.iter().collect();
    for pair in known.windows(2) {
        let (lo, hi) = (pair[0].1.min(pair[1].1), pair[0].1.max(pair[1].1));
        let mut day = pair[0].0 + Duration::days(1);
        while day < pair[1].0 {
            let v = dense.get(day).unwrap();
            assert!(v >= lo && v <= hi, "{} outside [{}, {}]", v, lo, hi);
            day += Duration::days(1);
        }
    }
}

#[test]
fn weekly_sum_mode_totals_complete_weeks() {
    let table = table_from(ymd(2022, 4, 2), 84, |_| 10.0);
    let config = ForecastConfig {
        aggregation: WeeklyAggregation::Sum,
        ..fast_config()
    };

    let weekly = weekly_totals(&table, &config).unwrap();
    assert!(weekly.values().iter().all(|v| (*v - 70.0).abs() < 1e-9));

    let forecast = forecast_sales(&table, &config).unwrap();
    assert!(forecast.points().iter().all(|p| (p.value - 70.0).abs() < 1e-9));
}

#[test]
fn custom_anchor_and_horizon() {
    let table = table_from(ymd(2022, 4, 1), 120, |i| 100.0 + i as f64);
    let config = ForecastConfig {
        anchor: Weekday::Mon,
        ..fast_config()
    }
    .with_horizon(6);

    let forecast = forecast_sales(&table, &config).unwrap();
    assert_eq!(forecast.len(), 6);
    assert!(forecast.points().iter().all(|p| p.date.weekday() == Weekday::Mon));
}

#[test]
fn forecast_serializes_to_iso_keyed_json() {
    let table = table_from(ymd(2022, 4, 1), 70, |_| 100.0);
    let forecast = forecast_sales(&table, &fast_config()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&forecast.to_json().unwrap()).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert!(object.contains_key("2022-06-10"));
}
