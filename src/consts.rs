//! Shared constants: data source defaults and model parameters.

use std::time::Duration;

/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default remote CSV for gate-in (export) events.
pub(crate) const DEFAULT_GATE_IN_URL: &str =
    "https://github.com/irhassha/YOR_Forecast/raw/refs/heads/main/EXPORT%2024-25.csv";

/// Default remote CSV for gate-out (import) events.
pub(crate) const DEFAULT_GATE_OUT_URL: &str =
    "https://github.com/irhassha/YOR_Forecast/raw/refs/heads/main/IMPORT%2024-25.csv";

/// How long a downloaded CSV stays fresh before re-fetching.
pub(crate) const DOWNLOAD_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default ARIMA order, matching the terminal's established model.
pub(crate) const DEFAULT_ARIMA_P: usize = 5;
pub(crate) const DEFAULT_ARIMA_D: usize = 1;
pub(crate) const DEFAULT_ARIMA_Q: usize = 2;

/// Default forecast horizon in days when no end date is given.
pub(crate) const DEFAULT_HORIZON_DAYS: usize = 31;

/// Default yard capacity in TEU.
pub(crate) const DEFAULT_CAPACITY_TEU: f64 = 15_000.0;

/// Default number of Monte-Carlo trials for the yard simulation.
pub(crate) const DEFAULT_TRIALS: usize = 1_000;
