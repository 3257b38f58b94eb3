//! Shared value types for daily count series and date filtering.

use chrono::{Days, NaiveDate};

/// Date filter for queries
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateFilter {
    pub(crate) since: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
}

impl DateFilter {
    pub(crate) fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }
}

/// Contiguous daily count series. Days without events inside the observed
/// span hold zero, so index arithmetic maps directly onto calendar days.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DailySeries {
    pub(crate) start: NaiveDate,
    pub(crate) values: Vec<f64>,
}

impl DailySeries {
    pub(crate) fn new(start: NaiveDate, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Days::new(index as u64)
    }

    /// Last observed day, or None for an empty series.
    pub(crate) fn last_date(&self) -> Option<NaiveDate> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.date_at(self.values.len() - 1))
        }
    }

    /// Index of `date` within the series, if it falls inside the span.
    pub(crate) fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start).num_days();
        if offset < 0 || offset as usize >= self.values.len() {
            None
        } else {
            Some(offset as usize)
        }
    }

    pub(crate) fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.index_of(date).map(|i| self.values[i])
    }

    /// Drop the last `n` observations, returning the truncated head.
    pub(crate) fn truncate_tail(&self, n: usize) -> Self {
        let keep = self.values.len().saturating_sub(n);
        Self {
            start: self.start,
            values: self.values[..keep].to_vec(),
        }
    }
}
