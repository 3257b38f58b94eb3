//! Ordinary least squares trend over an occupancy path.

/// Fitted line y = intercept + slope * x, with x the day index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrendLine {
    pub(crate) slope: f64,
    pub(crate) intercept: f64,
    pub(crate) r_squared: f64,
}

/// OLS on (index, value) pairs. Returns None for fewer than two points or a
/// degenerate x spread.
pub(crate) fn linear_trend(values: &[f64]) -> Option<TrendLine> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };
    Some(TrendLine {
        slope,
        intercept,
        r_squared,
    })
}
