//! Daily and weekly sales series
//!
//! A [`DailySeries`] is built by summing sale amounts per calendar date.
//! [`DailySeries::densify`] fills every day between the first and last
//! observation, and [`DailySeries::resample_weekly`] reduces the dense series
//! to one value per week on a fixed anchor weekday.

use crate::config::WeeklyAggregation;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use sales_math::interpolation::fill_interior_gaps;
use std::collections::BTreeMap;

/// Summed sales per calendar date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    values: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    /// Sum observations per date.
    ///
    /// A date whose amounts are all null still appears, with a total of zero.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut values = BTreeMap::new();
        for (date, amount) in observations {
            *values.entry(date).or_insert(0.0) += amount.unwrap_or(0.0);
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.values.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.values.keys().next_back().copied()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    /// Dates in ascending order with their values
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values.iter().map(|(d, v)| (*d, *v))
    }

    /// True when every day between the first and last date has a value
    pub fn is_dense(&self) -> bool {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days() as usize + 1 == self.len(),
            _ => true,
        }
    }

    /// Fill every missing day in `[first, last]` by linear interpolation on
    /// elapsed days between the nearest known neighbours.
    ///
    /// Applying this to an already dense series returns it unchanged.
    pub fn densify(&self) -> Self {
        let (Some(first), Some(last)) = (self.first_date(), self.last_date()) else {
            return self.clone();
        };
        if self.is_dense() {
            return self.clone();
        }

        let span = (last - first).num_days() as usize + 1;
        let mut slots: Vec<Option<f64>> = vec![None; span];
        for (date, value) in self.iter() {
            slots[(date - first).num_days() as usize] = Some(value);
        }

        fill_interior_gaps(&mut slots);

        let values = slots
            .into_iter()
            .enumerate()
            .filter_map(|(offset, value)| {
                value.map(|v| (first + Duration::days(offset as i64), v))
            })
            .collect();

        Self { values }
    }

    /// Reduce to one value per week ending on `anchor`.
    ///
    /// Expects a dense series (see [`DailySeries::densify`]). Anchors are the
    /// `anchor` weekdays that fall inside `[first, last]`.
    pub fn resample_weekly(&self, anchor: Weekday, aggregation: WeeklyAggregation) -> WeeklySeries {
        let (Some(first), Some(last)) = (self.first_date(), self.last_date()) else {
            return WeeklySeries::default();
        };

        let mut points = Vec::new();
        let mut date = first_anchor_on_or_after(first, anchor);

        while date <= last {
            let value = match aggregation {
                WeeklyAggregation::AnchorValue => self.get(date),
                WeeklyAggregation::Sum => self.week_sum(date, first),
            };
            if let Some(v) = value {
                points.push((date, v));
            }
            date += Duration::days(7);
        }

        WeeklySeries { points }
    }

    /// Sum of the seven days ending on `anchor`; `None` for a partial week
    fn week_sum(&self, anchor: NaiveDate, first: NaiveDate) -> Option<f64> {
        let start = anchor - Duration::days(6);
        if start < first {
            return None;
        }
        let mut total = 0.0;
        for offset in 0..7 {
            total += self.get(start + Duration::days(offset))?;
        }
        Some(total)
    }
}

fn first_anchor_on_or_after(date: NaiveDate, anchor: Weekday) -> NaiveDate {
    let current = date.weekday().num_days_from_monday() as i64;
    let target = anchor.num_days_from_monday() as i64;
    date + Duration::days((target - current).rem_euclid(7))
}

/// One value per week, on a fixed 7-day cadence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklySeries {
    points: Vec<(NaiveDate, f64)>,
}

impl WeeklySeries {
    /// Build from points already on a 7-day cadence
    pub fn from_points(points: Vec<(NaiveDate, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|(d, _)| *d).collect()
    }

    /// The most recent week-ending date
    pub fn last_anchor(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_per_date() {
        let daily = DailySeries::from_observations(vec![
            (ymd(2022, 4, 1), Some(10.0)),
            (ymd(2022, 4, 1), Some(15.0)),
            (ymd(2022, 4, 2), None),
            (ymd(2022, 4, 3), Some(7.5)),
        ]);

        assert_eq!(daily.len(), 3);
        assert_eq!(daily.get(ymd(2022, 4, 1)), Some(25.0));
        assert_eq!(daily.get(ymd(2022, 4, 2)), Some(0.0));
    }

    #[test]
    fn densify_interpolates_by_elapsed_days() {
        let daily = DailySeries::from_observations(vec![
            (ymd(2022, 4, 1), Some(100.0)),
            (ymd(2022, 4, 3), Some(200.0)),
            (ymd(2022, 4, 7), Some(0.0)),
        ]);
        let dense = daily.densify();

        assert!(dense.is_dense());
        assert_eq!(dense.len(), 7);
        assert_relative_eq!(dense.get(ymd(2022, 4, 2)).unwrap(), 150.0);
        assert_relative_eq!(dense.get(ymd(2022, 4, 4)).unwrap(), 150.0);
        assert_relative_eq!(dense.get(ymd(2022, 4, 6)).unwrap(), 50.0);
        assert_eq!(dense.first_date(), Some(ymd(2022, 4, 1)));
        assert_eq!(dense.last_date(), Some(ymd(2022, 4, 7)));
    }

    #[test]
    fn densify_is_idempotent() {
        let daily = DailySeries::from_observations(vec![
            (ymd(2022, 1, 1), Some(3.0)),
            (ymd(2022, 1, 9), Some(11.0)),
            (ymd(2022, 1, 20), Some(4.0)),
        ]);
        let once = daily.densify();
        assert_eq!(once.densify(), once);
    }

    #[test]
    fn empty_series_stays_empty() {
        let daily = DailySeries::default();
        assert!(daily.densify().is_empty());
        assert!(daily.resample_weekly(Weekday::Fri, WeeklyAggregation::AnchorValue).is_empty());
    }

    #[test]
    fn anchor_lands_on_requested_weekday() {
        // 2022-04-01 is a Friday
        assert_eq!(first_anchor_on_or_after(ymd(2022, 4, 1), Weekday::Fri), ymd(2022, 4, 1));
        assert_eq!(first_anchor_on_or_after(ymd(2022, 4, 2), Weekday::Fri), ymd(2022, 4, 8));
        assert_eq!(first_anchor_on_or_after(ymd(2022, 4, 2), Weekday::Sun), ymd(2022, 4, 3));
    }

    #[test]
    fn weekly_samples_the_anchor_day() {
        // 2022-03-28 (Mon) .. 2022-04-17 (Sun), value = day index
        let start = ymd(2022, 3, 28);
        let daily = DailySeries::from_observations(
            (0..21).map(|i| (start + Duration::days(i), Some(i as f64))),
        );
        let weekly = daily.resample_weekly(Weekday::Fri, WeeklyAggregation::AnchorValue);

        assert_eq!(
            weekly.points(),
            &[
                (ymd(2022, 4, 1), 4.0),
                (ymd(2022, 4, 8), 11.0),
                (ymd(2022, 4, 15), 18.0),
            ]
        );
        for pair in weekly.dates().windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 7);
        }
    }

    #[test]
    fn weekly_sum_uses_complete_weeks_only() {
        let start = ymd(2022, 3, 28);
        let daily = DailySeries::from_observations(
            (0..21).map(|i| (start + Duration::days(i), Some(1.0))),
        );
        let weekly = daily.resample_weekly(Weekday::Fri, WeeklyAggregation::Sum);

        // the Friday 2022-04-01 week starts before the data does
        assert_eq!(weekly.dates(), vec![ymd(2022, 4, 8), ymd(2022, 4, 15)]);
        assert!(weekly.values().iter().all(|v| *v == 7.0));
        assert_eq!(weekly.last_anchor(), Some(ymd(2022, 4, 15)));
    }
}
