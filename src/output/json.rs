use serde_json::json;

use crate::cli::SortOrder;
use crate::core::{DailyRow, ServiceProfile, WEEKDAY_LABELS};
use crate::forecast::{EvalMetrics, ForecastRow};
use crate::yard::SimResult;

fn date_string(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn apply_order(values: &mut Vec<serde_json::Value>, order: SortOrder) {
    if order == SortOrder::Desc {
        values.reverse();
    }
}

pub(crate) fn daily_json(rows: &[DailyRow], both: bool, breakdown: bool, order: SortOrder) -> serde_json::Value {
    let mut out: Vec<serde_json::Value> = Vec::new();
    for row in rows {
        let mut obj = serde_json::Map::new();
        obj.insert("date".to_string(), json!(date_string(row.date)));
        if both {
            obj.insert("gate_in".to_string(), json!(row.in_total()));
            obj.insert("gate_out".to_string(), json!(row.out_total()));
        }
        obj.insert("total".to_string(), json!(row.total()));
        if breakdown {
            let services: serde_json::Map<String, serde_json::Value> = row
                .service_names()
                .into_iter()
                .map(|name| {
                    let (in_count, out_count) = row.service_counts(&name);
                    let value = if both {
                        json!({"gate_in": in_count, "gate_out": out_count})
                    } else {
                        json!(in_count + out_count)
                    };
                    (name, value)
                })
                .collect();
            obj.insert("services".to_string(), serde_json::Value::Object(services));
        }
        out.push(serde_json::Value::Object(obj));
    }
    apply_order(&mut out, order);
    json!(out)
}

fn metrics_json(metrics: Option<&EvalMetrics>) -> serde_json::Value {
    match metrics {
        Some(m) => json!({
            "mae": m.mae,
            "mape": m.mape,
            "points": m.points,
        }),
        None => serde_json::Value::Null,
    }
}

pub(crate) fn forecast_json(
    rows: &[ForecastRow],
    metrics: Option<&EvalMetrics>,
    order: SortOrder,
) -> serde_json::Value {
    let mut days: Vec<serde_json::Value> = rows
        .iter()
        .map(|r| {
            json!({
                "date": date_string(r.date),
                "forecast": r.forecast,
                "actual": r.actual,
            })
        })
        .collect();
    apply_order(&mut days, order);
    json!({
        "days": days,
        "metrics": metrics_json(metrics),
    })
}

pub(crate) fn services_json(profile: &ServiceProfile, order: SortOrder) -> serde_json::Value {
    let mut rows: Vec<serde_json::Value> = profile
        .rows
        .iter()
        .map(|row| {
            let pct = row.percentages();
            let days: serde_json::Map<String, serde_json::Value> = WEEKDAY_LABELS
                .iter()
                .zip(pct.iter())
                .map(|(day, v)| (day.to_string(), json!(v)))
                .collect();
            json!({
                "service": row.service,
                "percent": days,
                "moves": row.total,
            })
        })
        .collect();
    apply_order(&mut rows, order);
    json!({
        "services": rows,
        "unattributed": profile.unattributed,
    })
}

pub(crate) fn yard_json(result: &SimResult, order: SortOrder) -> serde_json::Value {
    let mut days: Vec<serde_json::Value> = result
        .days
        .iter()
        .map(|d| {
            json!({
                "date": date_string(d.date),
                "mean": d.mean,
                "std": d.std,
                "min": d.min,
                "max": d.max,
                "yor": d.yor,
            })
        })
        .collect();
    apply_order(&mut days, order);
    let trend = result.trend.as_ref().map(|t| {
        json!({
            "slope": t.slope,
            "intercept": t.intercept,
            "r_squared": t.r_squared,
        })
    });
    json!({
        "days": days,
        "trend": trend,
        "capacity": result.capacity,
        "trials": result.trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DateFilter, aggregate_daily, merge_daily};
    use crate::data::GateEvent;
    use chrono::NaiveDate;

    fn event(day: u32, service: Option<&str>) -> GateEvent {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        GateEvent {
            timestamp: date.and_hms_opt(8, 0, 0).unwrap(),
            date,
            service: service.map(|s| s.to_string()),
            weekday: date.format("%a").to_string().to_uppercase(),
        }
    }

    #[test]
    fn daily_json_shape() {
        let events = vec![event(1, Some("JX1")), event(1, Some("JX1")), event(2, None)];
        let counts = aggregate_daily(&events, &DateFilter::default());
        let rows = merge_daily(Some(&counts), None);

        let value = daily_json(&rows, false, true, SortOrder::Asc);
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["date"], "2024-06-01");
        assert_eq!(arr[0]["total"], 2);
        assert_eq!(arr[0]["services"]["JX1"], 2);
        assert!(arr[0].get("gate_in").is_none());
    }

    #[test]
    fn daily_json_desc_reverses() {
        let events = vec![event(1, None), event(2, None)];
        let counts = aggregate_daily(&events, &DateFilter::default());
        let rows = merge_daily(Some(&counts), None);
        let value = daily_json(&rows, false, false, SortOrder::Desc);
        assert_eq!(value[0]["date"], "2024-06-02");
    }

    #[test]
    fn forecast_json_null_actual_and_metrics() {
        let rows = vec![ForecastRow {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            forecast: 12.5,
            actual: None,
        }];
        let value = forecast_json(&rows, None, SortOrder::Asc);
        assert_eq!(value["days"][0]["forecast"], 12.5);
        assert!(value["days"][0]["actual"].is_null());
        assert!(value["metrics"].is_null());
    }
}
