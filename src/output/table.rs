use comfy_table::{Cell, Color, Table};

use crate::cli::SortOrder;
use crate::core::{DailyRow, ServiceProfile, WEEKDAY_LABELS};
use crate::data::Direction;
use crate::forecast::{EvalMetrics, ForecastRow};
use crate::output::chart::render_bar;
use crate::output::format::{
    create_styled_table, format_count, format_float, format_percent, header_cell, right_cell,
    styled_cell,
};
use crate::yard::SimResult;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SummaryOptions {
    pub(crate) events: u64,
    pub(crate) skipped: u64,
    pub(crate) elapsed_ms: Option<f64>,
}

/// Print the summary line with optional timing
pub(crate) fn print_summary_line(summary: SummaryOptions, use_color: bool) {
    let stats_text = format!(
        "{} gate movements ({} rows skipped)",
        format_count(summary.events),
        format_count(summary.skipped)
    );

    if let Some(ms) = summary.elapsed_ms {
        if use_color {
            println!("\n  {} | \x1b[36m{:.0}ms\x1b[0m\n", stats_text, ms);
        } else {
            println!("\n  {} | {:.0}ms\n", stats_text, ms);
        }
    } else {
        println!("\n  {}\n", stats_text);
    }
}

fn ordered<'a, T>(rows: &'a [T], order: SortOrder) -> Vec<&'a T> {
    let mut out: Vec<&T> = rows.iter().collect();
    if order == SortOrder::Desc {
        out.reverse();
    }
    out
}

fn add_daily_standard_rows(table: &mut Table, rows: &[&DailyRow], both: bool) {
    let max = rows.iter().map(|r| r.total()).max().unwrap_or(0) as f64;
    for row in rows {
        let mut cells = vec![Cell::new(row.date.format("%Y-%m-%d").to_string())];
        if both {
            cells.push(right_cell(&format_count(row.in_total()), None, false));
            cells.push(right_cell(&format_count(row.out_total()), None, false));
        }
        cells.push(right_cell(&format_count(row.total()), None, false));
        cells.push(Cell::new(render_bar(row.total() as f64, max, BAR_WIDTH)));
        table.add_row(cells);
    }
}

fn add_daily_breakdown_rows(table: &mut Table, rows: &[&DailyRow], both: bool) {
    for row in rows {
        let date = row.date.format("%Y-%m-%d").to_string();
        let names = row.service_names();
        for (i, name) in names.iter().enumerate() {
            let (in_count, out_count) = row.service_counts(name);
            let mut cells = vec![
                Cell::new(if i == 0 { date.as_str() } else { "" }),
                Cell::new(name),
            ];
            if both {
                cells.push(right_cell(&format_count(in_count), None, false));
                cells.push(right_cell(&format_count(out_count), None, false));
            } else {
                cells.push(right_cell(&format_count(in_count + out_count), None, false));
            }
            table.add_row(cells);
        }
        // Moves with no service code still belong to the day's total.
        let attributed: u64 = names.iter().map(|n| {
            let (a, b) = row.service_counts(n);
            a + b
        }).sum();
        let rest = row.total().saturating_sub(attributed);
        if rest > 0 {
            let mut cells = vec![
                Cell::new(if names.is_empty() { date.as_str() } else { "" }),
                Cell::new("(none)"),
            ];
            if both {
                let in_rest = row.in_total().saturating_sub(
                    names.iter().map(|n| row.service_counts(n).0).sum::<u64>(),
                );
                let out_rest = row.out_total().saturating_sub(
                    names.iter().map(|n| row.service_counts(n).1).sum::<u64>(),
                );
                cells.push(right_cell(&format_count(in_rest), None, false));
                cells.push(right_cell(&format_count(out_rest), None, false));
            } else {
                cells.push(right_cell(&format_count(rest), None, false));
            }
            table.add_row(cells);
        }
    }
}

pub(crate) fn print_daily_table(
    rows: &[DailyRow],
    both: bool,
    breakdown: bool,
    summary: SummaryOptions,
    opts: TableOptions,
) {
    let c = opts.use_color;
    let mut table = create_styled_table();

    let mut header = vec![header_cell("Date", c)];
    if breakdown {
        header.push(header_cell("Service", c));
    }
    if both {
        header.push(header_cell("Gate In", c));
        header.push(header_cell("Gate Out", c));
    }
    if !breakdown {
        header.push(header_cell("Total", c));
        header.push(header_cell("", c));
    } else if !both {
        header.push(header_cell("Count", c));
    }
    table.set_header(header);

    let sorted = ordered(rows, opts.order);
    if breakdown {
        add_daily_breakdown_rows(&mut table, &sorted, both);
    } else {
        add_daily_standard_rows(&mut table, &sorted, both);
    }

    // Totals across the whole window
    let cyan = if c { Some(Color::Cyan) } else { None };
    let in_total: u64 = rows.iter().map(|r| r.in_total()).sum();
    let out_total: u64 = rows.iter().map(|r| r.out_total()).sum();
    let mut total_row = vec![styled_cell("TOTAL", cyan, true)];
    if breakdown {
        total_row.push(Cell::new(""));
    }
    if both {
        total_row.push(right_cell(&format_count(in_total), cyan, true));
        total_row.push(right_cell(&format_count(out_total), cyan, true));
    }
    if !breakdown {
        total_row.push(right_cell(&format_count(in_total + out_total), cyan, true));
        total_row.push(Cell::new(""));
    } else if !both {
        total_row.push(right_cell(&format_count(in_total + out_total), cyan, true));
    }
    table.add_row(total_row);

    println!("\n  Daily Gate Activity\n");
    println!("{table}");
    print_summary_line(summary, c);
}

fn print_metrics_line(metrics: Option<&EvalMetrics>) {
    match metrics {
        Some(m) => {
            let mape_text = match m.mape {
                Some(v) => format_percent(v),
                None => "n/a (all overlapping actuals are zero)".to_string(),
            };
            println!(
                "\n  MAE {} | MAPE {} over {} overlapping days\n",
                format_float(m.mae, 2),
                mape_text,
                m.points
            );
        }
        None => println!("\n  No overlap with observed days\n"),
    }
}

pub(crate) fn print_forecast_table(
    rows: &[ForecastRow],
    metrics: Option<&EvalMetrics>,
    direction: Direction,
    opts: TableOptions,
) {
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Actual", c),
        header_cell("Forecast", c),
        header_cell("", c),
    ]);

    let max = rows
        .iter()
        .flat_map(|r| [Some(r.forecast), r.actual])
        .flatten()
        .fold(0.0f64, f64::max);

    for row in ordered(rows, opts.order) {
        let actual = match row.actual {
            Some(v) => format_float(v, 0),
            None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d").to_string()),
            right_cell(&actual, None, false),
            right_cell(&format_float(row.forecast, 1), None, false),
            Cell::new(render_bar(row.forecast, max, BAR_WIDTH)),
        ]);
    }

    let title = match direction {
        Direction::In => "Gate-In Forecast (ARIMA)",
        Direction::Out => "Gate-Out Forecast (ARIMA)",
    };
    println!("\n  {title}\n");
    println!("{table}");
    print_metrics_line(metrics);
}

pub(crate) fn print_accuracy_table(
    rows: &[ForecastRow],
    metrics: Option<&EvalMetrics>,
    direction: Direction,
    opts: TableOptions,
) {
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Actual", c),
        header_cell("Predicted", c),
        header_cell("Error", c),
    ]);

    for row in ordered(rows, opts.order) {
        let actual = row.actual.unwrap_or(0.0);
        let error = row.forecast - actual;
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d").to_string()),
            right_cell(&format_float(actual, 0), None, false),
            right_cell(&format_float(row.forecast, 1), None, false),
            right_cell(&format!("{error:+.1}"), None, false),
        ]);
    }

    let title = match direction {
        Direction::In => "Gate-In Holdout Backtest",
        Direction::Out => "Gate-Out Holdout Backtest",
    };
    println!("\n  {title}\n");
    println!("{table}");
    print_metrics_line(metrics);
}

pub(crate) fn print_services_table(profile: &ServiceProfile, opts: TableOptions) {
    let c = opts.use_color;
    let mut table = create_styled_table();

    let mut header = vec![header_cell("Service", c)];
    for day in WEEKDAY_LABELS {
        header.push(header_cell(day, c));
    }
    header.push(header_cell("Moves", c));
    table.set_header(header);

    for row in ordered(&profile.rows, opts.order) {
        let pct = row.percentages();
        let mut cells = vec![Cell::new(&row.service)];
        for v in pct {
            cells.push(right_cell(&format_percent(v), None, false));
        }
        cells.push(right_cell(&format_count(row.total), None, false));
        table.add_row(cells);
    }

    println!("\n  Service Weekday Distribution\n");
    println!("{table}");
    if profile.unattributed > 0 {
        println!(
            "\n  {} moves without a service code\n",
            format_count(profile.unattributed)
        );
    } else {
        println!();
    }
}

pub(crate) fn print_yard_table(result: &SimResult, opts: TableOptions) {
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Mean", c),
        header_cell("Std", c),
        header_cell("Min", c),
        header_cell("Max", c),
        header_cell("YOR", c),
        header_cell("", c),
    ]);

    for day in ordered(&result.days, opts.order) {
        let yor_color = if c && day.yor >= 90.0 {
            Some(Color::Red)
        } else {
            None
        };
        table.add_row(vec![
            Cell::new(day.date.format("%Y-%m-%d").to_string()),
            right_cell(&format_float(day.mean, 0), None, false),
            right_cell(&format_float(day.std, 1), None, false),
            right_cell(&format_float(day.min, 0), None, false),
            right_cell(&format_float(day.max, 0), None, false),
            right_cell(&format_percent(day.yor), yor_color, false),
            Cell::new(render_bar(day.yor, 100.0, BAR_WIDTH)),
        ]);
    }

    println!("\n  Yard Occupancy Simulation\n");
    println!("{table}");

    let mut footer = format!(
        "  {} trials | capacity {} TEU",
        format_count(result.trials as u64),
        format_float(result.capacity, 0)
    );
    if let Some(trend) = &result.trend {
        footer.push_str(&format!(
            " | trend {:+.1}/day (r2 {:.2})",
            trend.slope, trend.r_squared
        ));
    }
    println!("\n{footer}\n");
}
