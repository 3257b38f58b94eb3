//! Gate event CSV parser.
//!
//! The exports are semicolon-delimited with a header row. Rows whose
//! timestamp cannot be parsed are dropped and counted, mirroring how the
//! terminal's own reports coerce bad dates to null and drop them.

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::data::{Direction, GateEvent, GateSource, fetch};
use crate::error::AppError;
use crate::utils::{parse_debug_enabled, parse_gate_timestamp};

/// Parse outcome with row accounting.
#[derive(Debug, Default)]
pub(crate) struct ParsedGate {
    pub(crate) events: Vec<GateEvent>,
    pub(crate) total_rows: u64,
    pub(crate) skipped: u64,
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Parse a direction's CSV text into gate events.
pub(crate) fn parse_gate_csv(
    text: &str,
    direction: Direction,
    label: &str,
) -> Result<ParsedGate, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Csv {
            path: label.to_string(),
            source: e,
        })?
        .clone();

    let ts_col = find_column(&headers, direction.column()).ok_or_else(|| {
        AppError::MissingColumn {
            column: direction.column().to_string(),
            path: label.to_string(),
        }
    })?;
    let service_col =
        find_column(&headers, "SERVICE OUT").or_else(|| find_column(&headers, "SERVICE"));
    let day_col = find_column(&headers, "DAY");

    let mut parsed = ParsedGate::default();
    for (row_no, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(err) => {
                parsed.skipped += 1;
                parsed.total_rows += 1;
                if parse_debug_enabled() {
                    eprintln!("Bad CSV row {} in {}: {}", row_no + 2, label, err);
                }
                continue;
            }
        };
        parsed.total_rows += 1;

        let Some(raw_ts) = record.get(ts_col) else {
            parsed.skipped += 1;
            continue;
        };
        let Some(timestamp) = parse_gate_timestamp(raw_ts) else {
            parsed.skipped += 1;
            if parse_debug_enabled() {
                eprintln!(
                    "Unparseable timestamp at {}:{}: \"{}\"",
                    label,
                    row_no + 2,
                    raw_ts
                );
            }
            continue;
        };

        let service = service_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        // Prefer the dataset's own DAY column; derive from the timestamp
        // when the column is absent or blank.
        let weekday = day_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| timestamp.format("%a").to_string().to_uppercase());

        parsed.events.push(GateEvent {
            date: timestamp.date(),
            timestamp,
            service,
            weekday,
        });
    }

    if parsed.events.is_empty() {
        return Err(AppError::EmptyData {
            path: label.to_string(),
        });
    }
    Ok(parsed)
}

fn read_local(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| AppError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load gate events for one direction from its configured source.
pub(crate) fn load_gate_events(
    source: &GateSource,
    direction: Direction,
    offline: bool,
    quiet: bool,
) -> Result<ParsedGate, AppError> {
    let start = Instant::now();
    let (text, label) = match source {
        GateSource::File(path) => (read_local(path)?, path.display().to_string()),
        GateSource::Url(url) => (
            fetch::fetch_csv(url, direction, offline, quiet)?,
            url.clone(),
        ),
    };

    let parsed = parse_gate_csv(&text, direction, &label)?;
    if !quiet {
        eprintln!(
            "Parsed {} of {} {} rows, {} skipped ({:.2}ms)",
            parsed.events.len(),
            parsed.total_rows,
            direction.display_name(),
            parsed.skipped,
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
    Ok(parsed)
}
