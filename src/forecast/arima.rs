//! ARIMA(p,d,q) fit and forecast.
//!
//! Estimation is Hannan-Rissanen two-stage: a long autoregression supplies
//! residual proxies, then the final coefficients come from one least-squares
//! pass over p lags of the differenced series and q lags of those residuals.
//! Forecasts are recursive with future shocks at zero, integrated back to the
//! original level.

use std::str::FromStr;

use crate::consts::{DEFAULT_ARIMA_D, DEFAULT_ARIMA_P, DEFAULT_ARIMA_Q};
use crate::core::std_dev;
use crate::error::AppError;
use crate::forecast::solve::least_squares;

/// Model order (p, d, q).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArimaOrder {
    pub(crate) p: usize,
    pub(crate) d: usize,
    pub(crate) q: usize,
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self {
            p: DEFAULT_ARIMA_P,
            d: DEFAULT_ARIMA_D,
            q: DEFAULT_ARIMA_Q,
        }
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.p, self.d, self.q)
    }
}

impl FromStr for ArimaOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidOrder {
            input: s.to_string(),
        };
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let p = parts[0].parse().map_err(|_| invalid())?;
        let d = parts[1].parse().map_err(|_| invalid())?;
        let q = parts[2].parse().map_err(|_| invalid())?;
        if d > 2 {
            return Err(invalid());
        }
        Ok(Self { p, d, q })
    }
}

/// Fitted model, ready to forecast from the end of its training series.
#[derive(Debug, Clone)]
pub(crate) struct ArimaModel {
    order: ArimaOrder,
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    /// d-times differenced training series.
    diffed: Vec<f64>,
    /// One-step residuals aligned with `diffed`.
    residuals: Vec<f64>,
    /// Last value of the series at each differencing level, 0..d.
    level_tails: Vec<f64>,
}

fn difference_once(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

impl ArimaModel {
    /// Fit the model to `series`. Errors when the series is too short for
    /// the order or when the regression is degenerate.
    pub(crate) fn fit(series: &[f64], order: ArimaOrder) -> Result<Self, AppError> {
        let ArimaOrder { p, d, q } = order;

        // The long-AR stage needs a margin past max(p, q).
        let long_order = p.max(q) + 2;
        let reg_start = p.max(long_order + q);
        let needed = d + reg_start + p + q + 1;
        if series.len() < needed {
            return Err(AppError::InsufficientData {
                p,
                d,
                q,
                needed,
                have: series.len(),
            });
        }

        let mut level_tails = Vec::with_capacity(d);
        let mut diffed = series.to_vec();
        for _ in 0..d {
            level_tails.push(diffed[diffed.len() - 1]);
            diffed = difference_once(&diffed);
        }

        // A flat differenced series makes every lag column collinear with the
        // intercept; short-circuit to a drift-only model instead of failing.
        let flat = std_dev(&diffed) < 1e-9;
        let (intercept, ar, ma) = if flat || (p == 0 && q == 0) {
            let mean = diffed.iter().sum::<f64>() / diffed.len() as f64;
            (mean, vec![0.0; p], vec![0.0; q])
        } else {
            let proxies = if q > 0 {
                long_ar_residuals(&diffed, long_order)?
            } else {
                vec![0.0; diffed.len()]
            };
            estimate(&diffed, &proxies, p, q, reg_start)?
        };

        let residuals = one_step_residuals(&diffed, intercept, &ar, &ma);

        Ok(Self {
            order,
            intercept,
            ar,
            ma,
            diffed,
            residuals,
            level_tails,
        })
    }

    pub(crate) fn order(&self) -> ArimaOrder {
        self.order
    }

    /// One-step residual at index `i` of the differenced training series,
    /// zero outside it.
    pub(crate) fn one_step_residual(&self, i: usize) -> f64 {
        self.residuals.get(i).copied().unwrap_or(0.0)
    }

    /// Forecast `steps` values past the end of the training series, on the
    /// original (undifferenced) level.
    pub(crate) fn forecast(&self, steps: usize) -> Vec<f64> {
        if steps == 0 {
            return Vec::new();
        }
        let p = self.order.p;
        let q = self.order.q;

        let mut history = self.diffed.clone();
        let mut shocks = self.residuals.clone();
        let mut out = Vec::with_capacity(steps);

        for _ in 0..steps {
            let t = history.len();
            let mut value = self.intercept;
            for (i, phi) in self.ar.iter().enumerate() {
                if t > i {
                    value += phi * history[t - 1 - i];
                }
            }
            for (j, theta) in self.ma.iter().enumerate() {
                if t > j {
                    value += theta * shocks[t - 1 - j];
                }
            }
            history.push(value);
            shocks.push(0.0);
            out.push(value);
        }

        // Undo each differencing level, deepest first.
        for tail in self.level_tails.iter().rev() {
            let mut running = *tail;
            for v in out.iter_mut() {
                running += *v;
                *v = running;
            }
        }
        out
    }
}

/// Stage one: residuals from a long AR fit, zero where lags are unavailable.
fn long_ar_residuals(diffed: &[f64], m: usize) -> Result<Vec<f64>, AppError> {
    let n = diffed.len();
    let mut rows = Vec::with_capacity(n - m);
    let mut y = Vec::with_capacity(n - m);
    for t in m..n {
        let mut row = Vec::with_capacity(m + 1);
        row.push(1.0);
        for i in 1..=m {
            row.push(diffed[t - i]);
        }
        rows.push(row);
        y.push(diffed[t]);
    }
    let beta = least_squares(&rows, &y)?;

    let mut residuals = vec![0.0; n];
    for t in m..n {
        let mut fitted = beta[0];
        for i in 1..=m {
            fitted += beta[i] * diffed[t - i];
        }
        residuals[t] = diffed[t] - fitted;
    }
    Ok(residuals)
}

/// Stage two: regress on p series lags and q residual-proxy lags.
fn estimate(
    diffed: &[f64],
    proxies: &[f64],
    p: usize,
    q: usize,
    start: usize,
) -> Result<(f64, Vec<f64>, Vec<f64>), AppError> {
    let n = diffed.len();
    let mut rows = Vec::with_capacity(n - start);
    let mut y = Vec::with_capacity(n - start);
    for t in start..n {
        let mut row = Vec::with_capacity(1 + p + q);
        row.push(1.0);
        for i in 1..=p {
            row.push(diffed[t - i]);
        }
        for j in 1..=q {
            row.push(proxies[t - j]);
        }
        rows.push(row);
        y.push(diffed[t]);
    }
    let beta = least_squares(&rows, &y)?;

    let intercept = beta[0];
    let ar = beta[1..=p].to_vec();
    let ma = beta[p + 1..=p + q].to_vec();
    Ok((intercept, ar, ma))
}

/// Recursive one-step residual pass with the final coefficients, shocks
/// treated as zero before enough history exists.
fn one_step_residuals(diffed: &[f64], intercept: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let n = diffed.len();
    let mut residuals = vec![0.0; n];
    for t in 0..n {
        let mut fitted = intercept;
        for (i, phi) in ar.iter().enumerate() {
            if t > i {
                fitted += phi * diffed[t - 1 - i];
            }
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                fitted += theta * residuals[t - 1 - j];
            }
        }
        if t >= ar.len().max(ma.len()) {
            residuals[t] = diffed[t] - fitted;
        }
    }
    residuals
}
