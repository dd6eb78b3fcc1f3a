//! Ingestion: raw backend payloads into canonical bars and points.
//!
//! Parsing is lenient. A daily price that cannot be read becomes `0.0`; an
//! intraday field that cannot be read becomes `None` and the transformer
//! decides what to drop.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::{DailyBar, IntradayPoint, RawDailyBar, RawIntradayPoint};

/// Normalize daily bars across both key conventions, preserving order.
#[must_use]
pub fn normalize_daily(raw: &[RawDailyBar]) -> Vec<DailyBar> {
    raw.iter().map(normalize_daily_bar).collect()
}

/// Normalize one daily bar. The short key wins when it holds a truthy value.
#[must_use]
pub fn normalize_daily_bar(raw: &RawDailyBar) -> DailyBar {
    DailyBar {
        t: raw.t.as_ref().and_then(as_epoch_millis),
        date: raw
            .date
            .as_ref()
            .and_then(Value::as_str)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        open: lenient_f64(pick(raw.o.as_ref(), raw.open.as_ref())),
        high: lenient_f64(pick(raw.h.as_ref(), raw.high.as_ref())),
        low: lenient_f64(pick(raw.l.as_ref(), raw.low.as_ref())),
        close: lenient_f64(pick(raw.c.as_ref(), raw.close.as_ref())),
        volume: lenient_f64(pick(raw.v.as_ref(), raw.volume.as_ref())),
        vwap: lenient_f64(pick(
            raw.vw.as_ref(),
            raw.volume_weighted_avg_price.as_ref(),
        )),
        transactions: lenient_f64(raw.n.as_ref()),
    }
}

/// Normalize intraday points, preserving order.
#[must_use]
pub fn normalize_intraday(raw: &[RawIntradayPoint]) -> Vec<IntradayPoint> {
    raw.iter()
        .map(|p| IntradayPoint {
            timestamp: p.timestamp.as_ref().and_then(as_epoch_millis),
            close: p.close.as_ref().and_then(parse_number),
        })
        .collect()
}

/// Epoch milliseconds of a `YYYY-MM-DD` day at midnight UTC.
#[must_use]
pub fn day_start_millis(date: &str) -> Option<i64> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn pick<'a>(short: Option<&'a Value>, long: Option<&'a Value>) -> Option<&'a Value> {
    short.filter(|v| truthy(v)).or(long)
}

fn parse_number(v: &Value) -> Option<f64> {
    let f = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

fn lenient_f64(v: Option<&Value>) -> f64 {
    v.and_then(parse_number).unwrap_or(0.0)
}

fn as_epoch_millis(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                return Some(ms);
            }
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.and_utc().timestamp_millis())
        }
        _ => None,
    }
}
