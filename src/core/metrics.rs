//! Forecast accuracy metrics and elementary statistics.

/// Mean absolute error over paired observations. Returns 0.0 on empty input;
/// callers guard against the empty overlap before reporting.
pub(crate) fn mean_absolute_error(actual: &[f64], forecast: &[f64]) -> f64 {
    let n = actual.len().min(forecast.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).abs())
        .sum();
    sum / n as f64
}

/// Mean absolute percentage error, restricted to nonzero actuals. None when
/// every actual is zero (the percentage is undefined).
pub(crate) fn mape(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for (a, f) in actual.iter().zip(forecast.iter()) {
        if *a != 0.0 {
            sum += ((a - f) / a).abs();
            n += 1;
        }
    }
    if n == 0 {
        None
    } else {
        Some(sum / n as f64 * 100.0)
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator). Zero for fewer than two
/// observations.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
