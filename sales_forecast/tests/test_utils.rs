use approx::assert_relative_eq;
use chrono::NaiveDate;
use rstest::rstest;
use sales_forecast::utils::{forecast_accuracy, future_dates};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[rstest]
#[case("weekly", vec![ymd(2022, 6, 10), ymd(2022, 6, 17), ymd(2022, 6, 24)])]
#[case("w", vec![ymd(2022, 6, 10), ymd(2022, 6, 17), ymd(2022, 6, 24)])]
#[case("daily", vec![ymd(2022, 6, 4), ymd(2022, 6, 5), ymd(2022, 6, 6)])]
fn test_future_dates(#[case] frequency: &str, #[case] expected: Vec<NaiveDate>) {
    let dates = future_dates(ymd(2022, 6, 3), 3, frequency).unwrap();
    assert_eq!(dates, expected);
}

#[test]
fn test_future_dates_rejects_unknown_frequency() {
    assert!(future_dates(ymd(2022, 6, 3), 3, "fortnightly").is_err());
    assert!(future_dates(ymd(2022, 6, 3), 0, "weekly").unwrap().is_empty());
}

#[test]
fn test_forecast_accuracy() {
    let forecast = vec![110.0, 90.0, 100.0, 100.0];
    let actual = vec![100.0, 100.0, 100.0, 0.0];

    let accuracy = forecast_accuracy(&forecast, &actual).unwrap();

    assert_relative_eq!(accuracy.mae, 30.0);
    assert_relative_eq!(accuracy.mse, 2550.0);
    assert_relative_eq!(accuracy.rmse, 2550.0_f64.sqrt());
    // zero actual excluded: (10 + 10 + 0) / 3
    assert_relative_eq!(accuracy.mape, 20.0 / 3.0, epsilon = 1e-9);
    assert!(accuracy.smape > 0.0);
    assert!(accuracy.to_string().contains("RMSE"));
}

#[test]
fn test_forecast_accuracy_length_mismatch() {
    assert!(forecast_accuracy(&[1.0], &[1.0, 2.0]).is_err());
    assert!(forecast_accuracy(&[], &[]).is_err());
}
