//! Vessel schedule CSV for the yard simulation.
//!
//! Format: `VESSEL;ETA;DISCHARGE;LOAD`, semicolon-delimited. Discharge is
//! boxes coming off the vessel into the yard, load is boxes leaving on it.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::utils::{parse_debug_enabled, parse_gate_timestamp};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VesselCall {
    pub(crate) vessel: String,
    pub(crate) eta: NaiveDate,
    pub(crate) discharge: f64,
    pub(crate) load: f64,
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_count(field: Option<&str>) -> Option<f64> {
    let raw = field?.trim().replace(',', ".");
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| *v >= 0.0)
}

pub(crate) fn parse_schedule_csv(text: &str, label: &str) -> Result<Vec<VesselCall>, AppError> {
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

    let vessel_col = find_column(&headers, "VESSEL").ok_or_else(|| AppError::MissingColumn {
        column: "VESSEL".to_string(),
        path: label.to_string(),
    })?;
    let eta_col = find_column(&headers, "ETA").ok_or_else(|| AppError::MissingColumn {
        column: "ETA".to_string(),
        path: label.to_string(),
    })?;
    let discharge_col = find_column(&headers, "DISCHARGE");
    let load_col = find_column(&headers, "LOAD");

    let mut calls = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let Ok(record) = record else {
            continue;
        };
        let Some(eta) = record.get(eta_col).and_then(parse_eta) else {
            if parse_debug_enabled() {
                eprintln!("Bad ETA at {}:{}", label, row_no + 2);
            }
            continue;
        };
        let vessel = record
            .get(vessel_col)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown")
            .to_string();
        let discharge = discharge_col
            .and_then(|i| parse_count(record.get(i)))
            .unwrap_or(0.0);
        let load = load_col
            .and_then(|i| parse_count(record.get(i)))
            .unwrap_or(0.0);

        calls.push(VesselCall {
            vessel,
            eta,
            discharge,
            load,
        });
    }

    if calls.is_empty() {
        return Err(AppError::EmptyData {
            path: label.to_string(),
        });
    }
    calls.sort_by_key(|c| c.eta);
    Ok(calls)
}

fn parse_eta(raw: &str) -> Option<NaiveDate> {
    parse_gate_timestamp(raw).map(|dt| dt.date())
}

pub(crate) fn load_schedule(path: &Path) -> Result<Vec<VesselCall>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_schedule_csv(&text, &path.display().to_string())
}
