//! Service distribution pivot: share of each service's moves per weekday.

use std::collections::BTreeMap;

use crate::core::types::DateFilter;
use crate::data::GateEvent;

pub(crate) const WEEKDAY_LABELS: [&str; 7] =
    ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// One service's weekday distribution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ServiceRow {
    pub(crate) service: String,
    /// Raw counts per weekday, Monday first.
    pub(crate) counts: [u64; 7],
    pub(crate) total: u64,
}

impl ServiceRow {
    /// Row-normalised percentages summing to 100 (for a nonzero row).
    pub(crate) fn percentages(&self) -> [f64; 7] {
        let mut out = [0.0; 7];
        if self.total == 0 {
            return out;
        }
        for (i, c) in self.counts.iter().enumerate() {
            out[i] = *c as f64 / self.total as f64 * 100.0;
        }
        out
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ServiceProfile {
    pub(crate) rows: Vec<ServiceRow>,
    /// Events inside the window that carried no service code.
    pub(crate) unattributed: u64,
}

fn weekday_index(label: &str) -> Option<usize> {
    let key: String = label.trim().to_uppercase().chars().take(3).collect();
    if key.len() < 3 {
        return None;
    }
    WEEKDAY_LABELS.iter().position(|w| *w == key)
}

/// Pivot events into service × weekday counts over the sample window.
/// Services come out sorted by name.
pub(crate) fn build_service_profile(events: &[GateEvent], filter: &DateFilter) -> ServiceProfile {
    let mut by_service: BTreeMap<String, [u64; 7]> = BTreeMap::new();
    let mut unattributed = 0u64;

    for event in events {
        if !filter.contains(event.date) {
            continue;
        }
        let Some(day_idx) = weekday_index(&event.weekday) else {
            continue;
        };
        match &event.service {
            Some(svc) => {
                by_service.entry(svc.clone()).or_default()[day_idx] += 1;
            }
            None => unattributed += 1,
        }
    }

    let rows = by_service
        .into_iter()
        .map(|(service, counts)| {
            let total = counts.iter().sum();
            ServiceRow {
                service,
                counts,
                total,
            }
        })
        .collect();

    ServiceProfile {
        rows,
        unattributed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(date: NaiveDate, service: Option<&str>, weekday: &str) -> GateEvent {
        GateEvent {
            timestamp: date.and_hms_opt(9, 0, 0).unwrap(),
            date,
            service: service.map(|s| s.to_string()),
            weekday: weekday.to_string(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekday_index_full_and_short_names() {
        assert_eq!(weekday_index("MON"), Some(0));
        assert_eq!(weekday_index("Monday"), Some(0));
        assert_eq!(weekday_index("sun"), Some(6));
        assert_eq!(weekday_index("FRIDAY"), Some(4));
        assert_eq!(weekday_index("???"), None);
    }

    #[test]
    fn pivot_counts_per_service_and_day() {
        let events = vec![
            event(d(2025, 1, 6), Some("JX1"), "MON"),
            event(d(2025, 1, 6), Some("JX1"), "MON"),
            event(d(2025, 1, 8), Some("JX1"), "WED"),
            event(d(2025, 1, 8), Some("CMA"), "WED"),
        ];
        let profile = build_service_profile(&events, &DateFilter::default());
        assert_eq!(profile.rows.len(), 2);
        // Sorted by service name: CMA first
        assert_eq!(profile.rows[0].service, "CMA");
        assert_eq!(profile.rows[0].counts[2], 1);
        assert_eq!(profile.rows[1].service, "JX1");
        assert_eq!(profile.rows[1].counts[0], 2);
        assert_eq!(profile.rows[1].counts[2], 1);
        assert_eq!(profile.rows[1].total, 3);
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let row = ServiceRow {
            service: "JX1".to_string(),
            counts: [2, 0, 1, 0, 0, 0, 1],
            total: 4,
        };
        let pct = row.percentages();
        assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!((pct[0] - 50.0).abs() < 1e-9);
        assert!((pct[2] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn zero_row_percentages_are_zero() {
        let row = ServiceRow {
            service: "X".to_string(),
            counts: [0; 7],
            total: 0,
        };
        assert_eq!(row.percentages(), [0.0; 7]);
    }

    #[test]
    fn events_without_service_counted_separately() {
        let events = vec![
            event(d(2025, 1, 6), None, "MON"),
            event(d(2025, 1, 6), Some("JX1"), "MON"),
        ];
        let profile = build_service_profile(&events, &DateFilter::default());
        assert_eq!(profile.unattributed, 1);
        assert_eq!(profile.rows.len(), 1);
    }

    #[test]
    fn sample_window_filters_events() {
        let events = vec![
            event(d(2025, 1, 6), Some("JX1"), "MON"),
            event(d(2025, 2, 3), Some("JX1"), "MON"),
        ];
        let filter = DateFilter::new(Some(d(2025, 2, 1)), None);
        let profile = build_service_profile(&events, &filter);
        assert_eq!(profile.rows[0].total, 1);
    }
}
