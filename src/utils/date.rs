use chrono::{NaiveDate, NaiveDateTime};

use crate::consts::DATE_FORMAT;
use crate::error::AppError;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Gate timestamps arrive as "31/12/2024 23:59" in the terminal exports,
/// with a few older dumps using seconds or ISO ordering.
const GATE_TIMESTAMP_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Lenient timestamp parse for gate event rows. Returns None on any failure;
/// the caller counts the row as skipped.
pub(crate) fn parse_gate_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in GATE_TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    // Bare date, no time component
    for fmt in ["%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_date_compact_form() {
        let d = parse_date("20250115").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 1, 15));
    }

    #[test]
    fn parse_date_dashed_form() {
        let d = parse_date("2025-01-15").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 1, 15));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("abc").is_err());
        assert!(parse_date("2025/01/15").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn gate_timestamp_primary_format() {
        let dt = parse_gate_timestamp("31/12/2024 23:59").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (31, 12, 2024));
        assert_eq!((dt.hour(), dt.minute()), (23, 59));
    }

    #[test]
    fn gate_timestamp_with_seconds() {
        let dt = parse_gate_timestamp("01/06/2024 08:15:30").unwrap();
        assert_eq!(dt.second(), 30);
    }

    #[test]
    fn gate_timestamp_iso_fallback() {
        assert!(parse_gate_timestamp("2024-06-01 08:15:00").is_some());
        assert!(parse_gate_timestamp("2024-06-01 08:15").is_some());
    }

    #[test]
    fn gate_timestamp_bare_date() {
        let dt = parse_gate_timestamp("01/06/2024").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn gate_timestamp_rejects_bad_rows() {
        assert!(parse_gate_timestamp("").is_none());
        assert!(parse_gate_timestamp("   ").is_none());
        assert!(parse_gate_timestamp("not a date").is_none());
        // Day/month swapped out of range
        assert!(parse_gate_timestamp("2024/31/12 10:00").is_none());
    }

    #[test]
    fn gate_timestamp_trims_whitespace() {
        assert!(parse_gate_timestamp("  31/12/2024 23:59  ").is_some());
    }
}
