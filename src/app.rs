//! Command dispatch: load data, run the requested report, render it.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Duration, Local, NaiveDate};

use crate::cli::{Cli, GateChoice, GateSide};
use crate::config::Config;
use crate::consts::{
    DEFAULT_CAPACITY_TEU, DEFAULT_GATE_IN_URL, DEFAULT_GATE_OUT_URL, DEFAULT_HORIZON_DAYS,
    DEFAULT_TRIALS,
};
use crate::core::{
    DailySeries, DateFilter, DayCounts, aggregate_daily, build_series, build_service_profile,
    merge_daily,
};
use crate::data::{Direction, GateSource, ParsedGate, load_gate_events, load_schedule};
use crate::error::AppError;
use crate::forecast::{ArimaModel, ArimaOrder, ForecastRow, evaluate, window_rows};
use crate::output::{
    SummaryOptions, TableOptions, accuracy_csv, daily_csv, daily_json, forecast_csv,
    forecast_json, print_accuracy_table, print_daily_table, print_forecast_table,
    print_services_table, print_yard_table, services_csv, services_json, yard_csv, yard_json,
};
use crate::utils::parse_date;
use crate::yard::{FlowParams, YardConfig, run_simulation};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
    pub(crate) filter: DateFilter,
    /// Machine output requested; progress lines are suppressed.
    pub(crate) quiet: bool,
}

impl CommandContext<'_> {
    fn table_options(&self) -> TableOptions {
        TableOptions {
            order: self.cli.order,
            use_color: self.cli.use_color(),
        }
    }
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap());
}

fn gate_source(ctx: &CommandContext<'_>, direction: Direction) -> GateSource {
    let (file, url, default_url): (&Option<PathBuf>, &Option<String>, &str) = match direction {
        Direction::In => (
            &ctx.cli.gate_in_file,
            &ctx.config.gate_in_url,
            DEFAULT_GATE_IN_URL,
        ),
        Direction::Out => (
            &ctx.cli.gate_out_file,
            &ctx.config.gate_out_url,
            DEFAULT_GATE_OUT_URL,
        ),
    };
    if let Some(path) = file {
        GateSource::File(path.clone())
    } else if let Some(url) = url {
        GateSource::Url(url.clone())
    } else {
        GateSource::Url(default_url.to_string())
    }
}

fn load_direction(ctx: &CommandContext<'_>, direction: Direction) -> Result<ParsedGate, AppError> {
    let source = gate_source(ctx, direction);
    load_gate_events(&source, direction, ctx.cli.offline, ctx.quiet)
}

/// Load one direction and resample it to a contiguous daily series.
fn load_series(
    ctx: &CommandContext<'_>,
    direction: Direction,
) -> Result<(DailySeries, ParsedGate), AppError> {
    let parsed = load_direction(ctx, direction)?;
    let days = aggregate_daily(&parsed.events, &ctx.filter);
    let Some(series) = build_series(&days) else {
        return Err(AppError::EmptyData {
            path: direction.display_name().to_string(),
        });
    };
    Ok((series, parsed))
}

fn handle_daily(
    ctx: &CommandContext<'_>,
    choice: GateChoice,
    breakdown: bool,
) -> Result<(), AppError> {
    let start = Instant::now();
    let (in_parsed, out_parsed) = match choice {
        GateChoice::In => (Some(load_direction(ctx, Direction::In)?), None),
        GateChoice::Out => (None, Some(load_direction(ctx, Direction::Out)?)),
        GateChoice::Both => (
            Some(load_direction(ctx, Direction::In)?),
            Some(load_direction(ctx, Direction::Out)?),
        ),
    };

    let aggregate = |parsed: &Option<ParsedGate>| -> Option<BTreeMap<NaiveDate, DayCounts>> {
        parsed
            .as_ref()
            .map(|p| aggregate_daily(&p.events, &ctx.filter))
    };
    let in_days = aggregate(&in_parsed);
    let out_days = aggregate(&out_parsed);
    let rows = merge_daily(in_days.as_ref(), out_days.as_ref());

    if rows.is_empty() {
        println!("No gate data found for the specified date range.");
        return Ok(());
    }

    let both = choice == GateChoice::Both;
    if ctx.cli.json {
        print_json(&daily_json(&rows, both, breakdown, ctx.cli.order));
    } else if ctx.cli.csv {
        print!("{}", daily_csv(&rows, both, breakdown, ctx.cli.order));
    } else {
        let events: u64 = rows.iter().map(|r| r.total()).sum();
        let skipped = in_parsed.as_ref().map(|p| p.skipped).unwrap_or(0)
            + out_parsed.as_ref().map(|p| p.skipped).unwrap_or(0);
        print_daily_table(
            &rows,
            both,
            breakdown,
            SummaryOptions {
                events,
                skipped,
                elapsed_ms: Some(start.elapsed().as_secs_f64() * 1000.0),
            },
            ctx.table_options(),
        );
    }
    Ok(())
}

fn parse_order(raw: &Option<String>) -> Result<ArimaOrder, AppError> {
    match raw {
        Some(s) => s.parse(),
        None => Ok(ArimaOrder::default()),
    }
}

fn handle_forecast(
    ctx: &CommandContext<'_>,
    side: GateSide,
    from: &Option<String>,
    to: &Option<String>,
    horizon: Option<usize>,
    arima_order: &Option<String>,
) -> Result<(), AppError> {
    let order = parse_order(arima_order)?;
    let direction = side.direction();
    let (series, _) = load_series(ctx, direction)?;
    let model = ArimaModel::fit(&series.values, order)?;
    let Some(last) = series.last_date() else {
        return Err(AppError::EmptyData {
            path: direction.display_name().to_string(),
        });
    };

    let horizon = horizon.unwrap_or(DEFAULT_HORIZON_DAYS).max(1) as i64;
    let (from, to) = match (from, to) {
        (Some(f), Some(t)) => (parse_date(f)?, parse_date(t)?),
        (Some(f), None) => {
            let f = parse_date(f)?;
            (f, f + Duration::days(horizon - 1))
        }
        (None, Some(t)) => (last + Duration::days(1), parse_date(t)?),
        (None, None) => (last + Duration::days(1), last + Duration::days(horizon)),
    };
    let from = from.max(series.start);
    if from > to {
        return Err(AppError::EmptyWindow {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let rows = window_rows(&series, &model, from, to);
    let metrics = evaluate(&rows);

    if ctx.cli.json {
        print_json(&forecast_json(&rows, metrics.as_ref(), ctx.cli.order));
    } else if ctx.cli.csv {
        print!("{}", forecast_csv(&rows, ctx.cli.order));
    } else {
        print_forecast_table(&rows, metrics.as_ref(), direction, ctx.table_options());
    }
    Ok(())
}

fn handle_accuracy(
    ctx: &CommandContext<'_>,
    side: GateSide,
    holdout: usize,
    arima_order: &Option<String>,
) -> Result<(), AppError> {
    let order = parse_order(arima_order)?;
    let direction = side.direction();
    let (series, _) = load_series(ctx, direction)?;

    if holdout == 0 || holdout >= series.len() {
        return Err(AppError::HoldoutTooLarge {
            holdout,
            remaining: series.len().saturating_sub(holdout),
        });
    }

    let train = series.truncate_tail(holdout);
    let model = ArimaModel::fit(&train.values, order)?;
    let forecasts = model.forecast(holdout);
    let rows: Vec<ForecastRow> = forecasts
        .iter()
        .enumerate()
        .map(|(i, &forecast)| {
            let date = series.date_at(train.len() + i);
            ForecastRow {
                date,
                forecast,
                actual: series.value_on(date),
            }
        })
        .collect();
    let metrics = evaluate(&rows);

    if ctx.cli.json {
        print_json(&forecast_json(&rows, metrics.as_ref(), ctx.cli.order));
    } else if ctx.cli.csv {
        print!("{}", accuracy_csv(&rows, ctx.cli.order));
    } else {
        print_accuracy_table(&rows, metrics.as_ref(), direction, ctx.table_options());
    }
    Ok(())
}

fn handle_services(ctx: &CommandContext<'_>, side: GateSide) -> Result<(), AppError> {
    let direction = side.direction();
    let parsed = load_direction(ctx, direction)?;
    let profile = build_service_profile(&parsed.events, &ctx.filter);

    if profile.rows.is_empty() {
        println!("No service codes found in the selected window.");
        return Ok(());
    }

    if ctx.cli.json {
        print_json(&services_json(&profile, ctx.cli.order));
    } else if ctx.cli.csv {
        print!("{}", services_csv(&profile, ctx.cli.order));
    } else {
        print_services_table(&profile, ctx.table_options());
    }
    Ok(())
}

struct YardArgs<'a> {
    horizon: Option<usize>,
    trials: Option<usize>,
    capacity: Option<f64>,
    initial: Option<f64>,
    seed: Option<u64>,
    schedule: &'a Option<PathBuf>,
    dummy: bool,
    start: &'a Option<String>,
}

fn handle_yard(ctx: &CommandContext<'_>, args: YardArgs<'_>) -> Result<(), AppError> {
    let started = Instant::now();
    let capacity = args
        .capacity
        .or(ctx.config.capacity_teu)
        .unwrap_or(DEFAULT_CAPACITY_TEU)
        .max(1.0);
    let trials = args
        .trials
        .or(ctx.config.trials)
        .unwrap_or(DEFAULT_TRIALS)
        .max(1);
    let horizon = args.horizon.unwrap_or(DEFAULT_HORIZON_DAYS).max(1);

    let schedule = match args.schedule {
        Some(path) => load_schedule(path)?,
        None => Vec::new(),
    };

    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let (flows, default_start) = if args.dummy {
        (FlowParams::dummy(), tomorrow)
    } else {
        let (in_series, _) = load_series(ctx, Direction::In)?;
        let (out_series, _) = load_series(ctx, Direction::Out)?;
        let flows = FlowParams::from_history(&in_series.values, &out_series.values);
        let last = in_series.last_date().max(out_series.last_date());
        let start = last.map(|d| d + Duration::days(1)).unwrap_or(tomorrow);
        (flows, start)
    };

    let start = match args.start {
        Some(raw) => parse_date(raw)?,
        None => default_start,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let initial = args.initial.unwrap_or(capacity / 2.0).clamp(0.0, capacity);

    let config = YardConfig {
        start,
        horizon,
        capacity,
        trials,
        seed,
        initial,
        flows,
        schedule,
    };
    let result = run_simulation(&config);

    if !ctx.quiet {
        eprintln!(
            "Simulated {} trials over {} days ({:.2}ms)",
            trials,
            horizon,
            started.elapsed().as_secs_f64() * 1000.0
        );
    }

    if ctx.cli.json {
        print_json(&yard_json(&result, ctx.cli.order));
    } else if ctx.cli.csv {
        print!("{}", yard_csv(&result, ctx.cli.order));
    } else {
        print_yard_table(&result, ctx.table_options());
    }
    Ok(())
}

pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let since = cli.since.as_deref().map(parse_date).transpose()?;
    let until = cli.until.as_deref().map(parse_date).transpose()?;
    if let (Some(s), Some(u)) = (since, until)
        && s > u
    {
        return Err(AppError::InvalidRange {
            since: s.to_string(),
            until: u.to_string(),
        });
    }

    let ctx = CommandContext {
        cli,
        config,
        filter: DateFilter::new(since, until),
        quiet: cli.json || cli.csv,
    };

    use crate::cli::Commands;
    match &cli.command {
        None => handle_daily(&ctx, GateChoice::Both, false),
        Some(Commands::Daily {
            direction,
            breakdown,
        }) => handle_daily(&ctx, *direction, *breakdown),
        Some(Commands::Forecast {
            direction,
            from,
            to,
            horizon,
            arima_order,
        }) => handle_forecast(&ctx, *direction, from, to, *horizon, arima_order),
        Some(Commands::Accuracy {
            direction,
            holdout,
            arima_order,
        }) => handle_accuracy(&ctx, *direction, *holdout, arima_order),
        Some(Commands::Services { direction }) => handle_services(&ctx, *direction),
        Some(Commands::Yard {
            horizon,
            trials,
            capacity,
            initial,
            seed,
            schedule,
            dummy,
            start,
        }) => handle_yard(
            &ctx,
            YardArgs {
                horizon: *horizon,
                trials: *trials,
                capacity: *capacity,
                initial: *initial,
                seed: *seed,
                schedule,
                dummy: *dummy,
                start,
            },
        ),
    }
}
