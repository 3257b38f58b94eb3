//! Rendering: styled terminal tables, JSON, and CSV.

mod chart;
mod csv;
mod format;
mod json;
mod table;

pub(crate) use csv::{accuracy_csv, daily_csv, forecast_csv, services_csv, yard_csv};
pub(crate) use json::{daily_json, forecast_json, services_json, yard_json};
pub(crate) use table::{
    SummaryOptions, TableOptions, print_accuracy_table, print_daily_table, print_forecast_table,
    print_services_table, print_yard_table,
};
