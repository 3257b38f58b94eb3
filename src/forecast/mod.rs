//! ARIMA model fitting and forecasting for daily count series.

mod arima;
mod solve;

use chrono::NaiveDate;

pub(crate) use arima::{ArimaModel, ArimaOrder};

use crate::core::{DailySeries, mape, mean_absolute_error};

/// One forecast day, with the observed count when the window overlaps
/// history.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ForecastRow {
    pub(crate) date: NaiveDate,
    pub(crate) forecast: f64,
    pub(crate) actual: Option<f64>,
}

/// Accuracy over the rows that have an observed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EvalMetrics {
    pub(crate) mae: f64,
    /// None when every overlapping actual is zero.
    pub(crate) mape: Option<f64>,
    pub(crate) points: usize,
}

/// Compare forecasts against the rows that carry an actual. None when the
/// window has no overlap with observed history.
pub(crate) fn evaluate(rows: &[ForecastRow]) -> Option<EvalMetrics> {
    let mut actuals = Vec::new();
    let mut predicted = Vec::new();
    for row in rows {
        if let Some(actual) = row.actual {
            actuals.push(actual);
            predicted.push(row.forecast);
        }
    }
    if actuals.is_empty() {
        return None;
    }
    Some(EvalMetrics {
        mae: mean_absolute_error(&actuals, &predicted),
        mape: mape(&actuals, &predicted),
        points: actuals.len(),
    })
}

/// Build forecast rows for an inclusive date window against a model fitted
/// on `series`. Dates inside the observed span get the model's one-step
/// in-sample prediction next to the actual; later dates get the recursive
/// out-of-sample forecast.
pub(crate) fn window_rows(
    series: &DailySeries,
    model: &ArimaModel,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ForecastRow> {
    let Some(last) = series.last_date() else {
        return Vec::new();
    };
    let steps = if to > last {
        (to - last).num_days() as usize
    } else {
        0
    };
    let future = model.forecast(steps);
    let d = model.order().d;

    let mut rows = Vec::new();
    let mut date = from;
    while date <= to {
        if date <= last {
            if let Some(actual) = series.value_on(date)
                && let Some(idx) = series.index_of(date)
            {
                // Within history the one-step prediction error is exactly
                // the residual at the differenced level.
                let resid = if idx >= d {
                    model.one_step_residual(idx - d)
                } else {
                    0.0
                };
                rows.push(ForecastRow {
                    date,
                    forecast: actual - resid,
                    actual: Some(actual),
                });
            }
        } else {
            let k = (date - last).num_days() as usize;
            rows.push(ForecastRow {
                date,
                forecast: future[k - 1],
                actual: None,
            });
        }
        date += chrono::Duration::days(1);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, forecast: f64, actual: Option<f64>) -> ForecastRow {
        ForecastRow {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            forecast,
            actual,
        }
    }

    #[test]
    fn evaluate_uses_only_overlapping_rows() {
        let rows = vec![
            row(1, 12.0, Some(10.0)),
            row(2, 18.0, Some(20.0)),
            row(3, 25.0, None),
        ];
        let metrics = evaluate(&rows).unwrap();
        assert_eq!(metrics.points, 2);
        assert!((metrics.mae - 2.0).abs() < 1e-9);
        // (2/10 + 2/20) / 2 * 100 = 15
        assert!((metrics.mape.unwrap() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn evaluate_without_overlap_is_none() {
        let rows = vec![row(1, 12.0, None), row(2, 18.0, None)];
        assert!(evaluate(&rows).is_none());
    }

    #[test]
    fn mape_none_when_actuals_all_zero() {
        let rows = vec![row(1, 3.0, Some(0.0)), row(2, 4.0, Some(0.0))];
        let metrics = evaluate(&rows).unwrap();
        assert!(metrics.mape.is_none());
        assert!((metrics.mae - 3.5).abs() < 1e-9);
    }

    #[test]
    fn window_rows_split_overlap_and_future() {
        // Linear trend, drift model predicts it exactly in and out of sample.
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let series = DailySeries::new(start, (1..=30).map(|i| 10.0 * i as f64).collect());
        let model = ArimaModel::fit(&series.values, ArimaOrder { p: 5, d: 1, q: 2 }).unwrap();

        let from = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
        let rows = window_rows(&series, &model, from, to);

        assert_eq!(rows.len(), 5);
        // 2024-06-28..30 observed, 07-01..02 forecast only
        assert_eq!(rows[0].actual, Some(280.0));
        assert!((rows[0].forecast - 280.0).abs() < 1e-6);
        assert_eq!(rows[2].actual, Some(300.0));
        assert!(rows[3].actual.is_none());
        assert!((rows[3].forecast - 310.0).abs() < 1e-6);
        assert!((rows[4].forecast - 320.0).abs() < 1e-6);
    }

    #[test]
    fn window_rows_empty_series() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let series = DailySeries::new(start, (1..=30).map(|i| i as f64).collect());
        let model = ArimaModel::fit(&series.values, ArimaOrder::default()).unwrap();
        let empty = DailySeries::new(start, vec![]);
        assert!(window_rows(&empty, &model, start, start).is_empty());
    }
}
