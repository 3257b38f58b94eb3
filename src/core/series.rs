//! Resampling of gate events into daily count aggregates.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::core::types::{DailySeries, DateFilter};
use crate::data::GateEvent;

/// Counts for one calendar day, with a per-service breakdown.
#[derive(Debug, Default, Clone)]
pub(crate) struct DayCounts {
    pub(crate) total: u64,
    pub(crate) services: HashMap<String, u64>,
}

impl DayCounts {
    pub(crate) fn add(&mut self, service: Option<&str>) {
        self.total += 1;
        if let Some(svc) = service {
            *self.services.entry(svc.to_string()).or_default() += 1;
        }
    }
}

/// Aggregate events by calendar day. BTreeMap keeps the dates ordered for
/// rendering and for the contiguous series build.
pub(crate) fn aggregate_daily(
    events: &[GateEvent],
    filter: &DateFilter,
) -> BTreeMap<NaiveDate, DayCounts> {
    let mut days: BTreeMap<NaiveDate, DayCounts> = BTreeMap::new();
    for event in events {
        if !filter.contains(event.date) {
            continue;
        }
        days.entry(event.date)
            .or_default()
            .add(event.service.as_deref());
    }
    days
}

/// Build a contiguous daily series from the aggregated counts, zero-filling
/// days inside the span that saw no events. Returns None when no day matched
/// the filter.
pub(crate) fn build_series(days: &BTreeMap<NaiveDate, DayCounts>) -> Option<DailySeries> {
    let first = *days.keys().next()?;
    let last = *days.keys().next_back()?;

    let len = (last - first).num_days() as usize + 1;
    let mut values = vec![0.0; len];
    for (date, counts) in days {
        let idx = (*date - first).num_days() as usize;
        values[idx] = counts.total as f64;
    }
    Some(DailySeries::new(first, values))
}

/// One date's counts across both gate directions. Either side is None when
/// that direction was not loaded.
#[derive(Debug, Clone)]
pub(crate) struct DailyRow {
    pub(crate) date: NaiveDate,
    pub(crate) gate_in: Option<DayCounts>,
    pub(crate) gate_out: Option<DayCounts>,
}

impl DailyRow {
    pub(crate) fn in_total(&self) -> u64 {
        self.gate_in.as_ref().map(|c| c.total).unwrap_or(0)
    }

    pub(crate) fn out_total(&self) -> u64 {
        self.gate_out.as_ref().map(|c| c.total).unwrap_or(0)
    }

    pub(crate) fn total(&self) -> u64 {
        self.in_total() + self.out_total()
    }

    /// Service names seen on either side of this date, ordered.
    pub(crate) fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .gate_in
            .iter()
            .chain(self.gate_out.iter())
            .flat_map(|c| c.services.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub(crate) fn service_counts(&self, name: &str) -> (u64, u64) {
        let get = |side: &Option<DayCounts>| {
            side.as_ref()
                .and_then(|c| c.services.get(name).copied())
                .unwrap_or(0)
        };
        (get(&self.gate_in), get(&self.gate_out))
    }
}

/// Merge per-direction aggregates into one date-ordered row list.
pub(crate) fn merge_daily(
    gate_in: Option<&BTreeMap<NaiveDate, DayCounts>>,
    gate_out: Option<&BTreeMap<NaiveDate, DayCounts>>,
) -> Vec<DailyRow> {
    let mut dates: Vec<NaiveDate> = gate_in
        .iter()
        .chain(gate_out.iter())
        .flat_map(|m| m.keys().copied())
        .collect();
    dates.sort();
    dates.dedup();

    dates
        .into_iter()
        .map(|date| DailyRow {
            date,
            gate_in: gate_in.and_then(|m| m.get(&date).cloned()),
            gate_out: gate_out.and_then(|m| m.get(&date).cloned()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(date: NaiveDate, service: Option<&str>) -> GateEvent {
        let timestamp: NaiveDateTime = date.and_hms_opt(10, 0, 0).unwrap();
        GateEvent {
            timestamp,
            date,
            service: service.map(|s| s.to_string()),
            weekday: date.format("%a").to_string().to_uppercase(),
        }
    }

    #[test]
    fn aggregate_counts_per_day() {
        let events = vec![
            event(d(2025, 1, 1), Some("JX1")),
            event(d(2025, 1, 1), Some("JX1")),
            event(d(2025, 1, 1), Some("CMA")),
            event(d(2025, 1, 3), None),
        ];
        let days = aggregate_daily(&events, &DateFilter::default());
        assert_eq!(days.len(), 2);
        assert_eq!(days[&d(2025, 1, 1)].total, 3);
        assert_eq!(days[&d(2025, 1, 1)].services["JX1"], 2);
        assert_eq!(days[&d(2025, 1, 1)].services["CMA"], 1);
        assert_eq!(days[&d(2025, 1, 3)].total, 1);
        assert!(days[&d(2025, 1, 3)].services.is_empty());
    }

    #[test]
    fn aggregate_applies_date_filter() {
        let events = vec![
            event(d(2025, 1, 1), None),
            event(d(2025, 1, 2), None),
            event(d(2025, 1, 3), None),
        ];
        let filter = DateFilter::new(Some(d(2025, 1, 2)), Some(d(2025, 1, 2)));
        let days = aggregate_daily(&events, &filter);
        assert_eq!(days.len(), 1);
        assert!(days.contains_key(&d(2025, 1, 2)));
    }

    #[test]
    fn build_series_zero_fills_gap_days() {
        let events = vec![
            event(d(2025, 1, 1), None),
            event(d(2025, 1, 1), None),
            event(d(2025, 1, 4), None),
        ];
        let days = aggregate_daily(&events, &DateFilter::default());
        let series = build_series(&days).unwrap();
        assert_eq!(series.start, d(2025, 1, 1));
        assert_eq!(series.values, vec![2.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn build_series_single_day() {
        let events = vec![event(d(2025, 1, 1), None)];
        let days = aggregate_daily(&events, &DateFilter::default());
        let series = build_series(&days).unwrap();
        assert_eq!(series.values, vec![1.0]);
    }

    #[test]
    fn build_series_empty_input() {
        let days = BTreeMap::new();
        assert!(build_series(&days).is_none());
    }

    #[test]
    fn merge_daily_unions_dates() {
        let in_events = vec![event(d(2025, 1, 1), Some("JX1"))];
        let out_events = vec![event(d(2025, 1, 2), Some("CMA"))];
        let gate_in = aggregate_daily(&in_events, &DateFilter::default());
        let gate_out = aggregate_daily(&out_events, &DateFilter::default());

        let rows = merge_daily(Some(&gate_in), Some(&gate_out));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, d(2025, 1, 1));
        assert_eq!(rows[0].in_total(), 1);
        assert_eq!(rows[0].out_total(), 0);
        assert_eq!(rows[1].out_total(), 1);
        assert_eq!(rows[1].total(), 1);
    }

    #[test]
    fn merge_daily_one_side_only() {
        let events = vec![event(d(2025, 1, 1), Some("JX1"))];
        let gate_in = aggregate_daily(&events, &DateFilter::default());
        let rows = merge_daily(Some(&gate_in), None);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].gate_out.is_none());
        assert_eq!(rows[0].service_names(), vec!["JX1".to_string()]);
        assert_eq!(rows[0].service_counts("JX1"), (1, 0));
    }
}
