//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::data::Direction;

/// Which gate datasets a report covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum GateChoice {
    /// Gate-in (export) moves only
    In,
    /// Gate-out (import) moves only
    Out,
    /// Both directions (default)
    #[default]
    Both,
}

/// A single gate direction, for the commands that model one series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum GateSide {
    /// Gate-in (export) moves (default)
    #[default]
    In,
    /// Gate-out (import) moves
    Out,
}

impl GateSide {
    pub(crate) fn direction(self) -> Direction {
        match self {
            GateSide::In => Direction::In,
            GateSide::Out => Direction::Out,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Daily container counts (default)
    Daily {
        /// Gate direction(s) to report
        #[arg(short, long, value_enum, default_value = "both")]
        direction: GateChoice,

        /// Per-service breakdown
        #[arg(short, long)]
        breakdown: bool,
    },
    /// Fit an ARIMA model on one direction's daily series and forecast
    Forecast {
        /// Gate direction to model
        #[arg(short, long, value_enum, default_value = "in")]
        direction: GateSide,

        /// Forecast window start (defaults to the day after the last observed day)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Forecast window end (inclusive)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,

        /// Days to forecast when no --from/--to window is given
        #[arg(long, value_name = "N")]
        horizon: Option<usize>,

        /// ARIMA order as p,d,q
        #[arg(long, value_name = "P,D,Q")]
        arima_order: Option<String>,
    },
    /// Holdout backtest: fit on all but the last N days, score the forecast
    Accuracy {
        /// Gate direction to model
        #[arg(short, long, value_enum, default_value = "in")]
        direction: GateSide,

        /// Days to hold out
        #[arg(long, value_name = "N", default_value_t = 7)]
        holdout: usize,

        /// ARIMA order as p,d,q
        #[arg(long, value_name = "P,D,Q")]
        arima_order: Option<String>,
    },
    /// Service x weekday distribution, row-normalised to percentages
    Services {
        /// Gate direction to profile
        #[arg(short, long, value_enum, default_value = "in")]
        direction: GateSide,
    },
    /// Monte-Carlo yard occupancy simulation
    Yard {
        /// Simulation length in days
        #[arg(long, value_name = "N")]
        horizon: Option<usize>,

        /// Number of Monte-Carlo trials
        #[arg(long, value_name = "N")]
        trials: Option<usize>,

        /// Yard capacity in TEU
        #[arg(long, value_name = "TEU")]
        capacity: Option<f64>,

        /// Starting occupancy in TEU (defaults to half of capacity)
        #[arg(long, value_name = "TEU")]
        initial: Option<f64>,

        /// RNG seed for reproducible runs
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Vessel schedule CSV (vessel;eta;discharge;load)
        #[arg(long, value_name = "PATH")]
        schedule: Option<PathBuf>,

        /// Use built-in dummy flow parameters instead of gate history
        #[arg(long)]
        dummy: bool,

        /// Simulation start date (defaults to the day after the last observed day)
        #[arg(long, value_name = "DATE")]
        start: Option<String>,
    },
}
