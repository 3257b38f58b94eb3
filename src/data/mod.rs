//! Gate event ingestion: remote/local CSV sources and parsing.
//!
//! Two datasets exist, one per gate direction. Each is a semicolon-delimited
//! CSV with one row per container move.

pub(crate) mod fetch;
pub(crate) mod gate;
pub(crate) mod schedule;

use chrono::{NaiveDate, NaiveDateTime};

pub(crate) use gate::{ParsedGate, load_gate_events};
pub(crate) use schedule::{VesselCall, load_schedule};

/// Gate direction. Gate-in rows are export boxes entering the yard,
/// gate-out rows are import boxes leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    In,
    Out,
}

impl Direction {
    /// Timestamp column header in the terminal export.
    pub(crate) fn column(self) -> &'static str {
        match self {
            Direction::In => "GATE IN",
            Direction::Out => "GATE OUT",
        }
    }

    pub(crate) fn display_name(self) -> &'static str {
        match self {
            Direction::In => "gate-in",
            Direction::Out => "gate-out",
        }
    }

    /// File name used for the download cache.
    pub(crate) fn cache_file(self) -> &'static str {
        match self {
            Direction::In => "gate-in.csv",
            Direction::Out => "gate-out.csv",
        }
    }
}

/// Where a direction's CSV comes from.
#[derive(Debug, Clone)]
pub(crate) enum GateSource {
    File(std::path::PathBuf),
    Url(String),
}

/// One parsed container move.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GateEvent {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) date: NaiveDate,
    /// Service code ("SERVICE OUT" column), when present.
    pub(crate) service: Option<String>,
    /// Weekday label, from the "DAY" column or derived from the timestamp.
    pub(crate) weekday: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_columns() {
        assert_eq!(Direction::In.column(), "GATE IN");
        assert_eq!(Direction::Out.column(), "GATE OUT");
    }

    #[test]
    fn direction_cache_files_differ() {
        assert_ne!(Direction::In.cache_file(), Direction::Out.cache_file());
    }
}
