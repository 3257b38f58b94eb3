//! Core module - daily series, date filtering, and shared statistics

mod metrics;
mod series;
mod services;
mod types;

pub(crate) use metrics::{mape, mean, mean_absolute_error, std_dev};
pub(crate) use series::{DailyRow, DayCounts, aggregate_daily, build_series, merge_daily};
pub(crate) use services::{ServiceProfile, WEEKDAY_LABELS, build_service_profile};
pub(crate) use types::{DailySeries, DateFilter};
