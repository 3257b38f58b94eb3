//! CSV renditions of each report, written as plain strings for stdout.

use std::fmt::Write;

use crate::cli::SortOrder;
use crate::core::{DailyRow, ServiceProfile, WEEKDAY_LABELS};
use crate::forecast::ForecastRow;
use crate::yard::SimResult;

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn ordered<'a, T>(rows: &'a [T], order: SortOrder) -> Vec<&'a T> {
    let mut out: Vec<&T> = rows.iter().collect();
    if order == SortOrder::Desc {
        out.reverse();
    }
    out
}

pub(crate) fn daily_csv(rows: &[DailyRow], both: bool, breakdown: bool, order: SortOrder) -> String {
    let mut out = String::new();
    match (both, breakdown) {
        (true, false) => out.push_str("date,gate_in,gate_out,total\n"),
        (true, true) => out.push_str("date,service,gate_in,gate_out\n"),
        (false, false) => out.push_str("date,count\n"),
        (false, true) => out.push_str("date,service,count\n"),
    }

    for row in ordered(rows, order) {
        let date = row.date.format("%Y-%m-%d");
        if breakdown {
            for name in row.service_names() {
                let (in_count, out_count) = row.service_counts(&name);
                if both {
                    let _ = writeln!(out, "{},{},{},{}", date, csv_escape(&name), in_count, out_count);
                } else {
                    let _ = writeln!(out, "{},{},{}", date, csv_escape(&name), in_count + out_count);
                }
            }
        } else if both {
            let _ = writeln!(
                out,
                "{},{},{},{}",
                date,
                row.in_total(),
                row.out_total(),
                row.total()
            );
        } else {
            let _ = writeln!(out, "{},{}", date, row.total());
        }
    }
    out
}

pub(crate) fn forecast_csv(rows: &[ForecastRow], order: SortOrder) -> String {
    let mut out = String::from("date,forecast,actual\n");
    for row in ordered(rows, order) {
        let actual = row
            .actual
            .map(|v| format!("{v:.0}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{},{:.4},{}",
            row.date.format("%Y-%m-%d"),
            row.forecast,
            actual
        );
    }
    out
}

pub(crate) fn accuracy_csv(rows: &[ForecastRow], order: SortOrder) -> String {
    let mut out = String::from("date,actual,predicted,error\n");
    for row in ordered(rows, order) {
        let actual = row.actual.unwrap_or(0.0);
        let _ = writeln!(
            out,
            "{},{:.0},{:.4},{:.4}",
            row.date.format("%Y-%m-%d"),
            actual,
            row.forecast,
            row.forecast - actual
        );
    }
    out
}

pub(crate) fn services_csv(profile: &ServiceProfile, order: SortOrder) -> String {
    let mut out = String::from("service");
    for day in WEEKDAY_LABELS {
        let _ = write!(out, ",{}", day.to_lowercase());
    }
    out.push_str(",moves\n");

    for row in ordered(&profile.rows, order) {
        let _ = write!(out, "{}", csv_escape(&row.service));
        for v in row.percentages() {
            let _ = write!(out, ",{v:.2}");
        }
        let _ = writeln!(out, ",{}", row.total);
    }
    out
}

pub(crate) fn yard_csv(result: &SimResult, order: SortOrder) -> String {
    let mut out = String::from("date,mean,std,min,max,yor\n");
    for day in ordered(&result.days, order) {
        let _ = writeln!(
            out,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2}",
            day.date.format("%Y-%m-%d"),
            day.mean,
            day.std,
            day.min,
            day.max,
            day.yor
        );
    }
    out
}
