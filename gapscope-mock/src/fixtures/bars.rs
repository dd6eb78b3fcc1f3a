use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use gapscope_core::{RawDailyBar, RawIntradayPoint};
use serde_json::Value;

use super::gaps;

fn base_price(ticker: &str) -> f64 {
    match ticker {
        "ABCD" => 2.0,
        "WXYZ" => 0.8,
        "QRST" => 5.0,
        _ => 1.0,
    }
}

fn day_millis(day: NaiveDate) -> i64 {
    day.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Weekday bars over `[start, end]`, with a jump on fixture gap days.
pub fn daily(ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawDailyBar> {
    let base = base_price(ticker);
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|d| {
            let wiggle = f64::from(d.num_days_from_ce() % 11 - 5) / 100.0;
            let prev_close = base * (1.0 + wiggle);
            let (open, close) = match gaps::gap_on(ticker, &d.format("%Y-%m-%d").to_string()) {
                Some((gap, ret)) => {
                    let open = prev_close * (1.0 + gap / 100.0);
                    (open, open * (1.0 + ret / 100.0))
                }
                None => (prev_close, prev_close * (1.0 + wiggle / 2.0)),
            };
            let high = open.max(close) * 1.04;
            let low = open.min(close) * 0.97;
            let volume = 250_000.0 * (1.0 + (open / prev_close - 1.0).abs() * 20.0);
            let mut bar = RawDailyBar::short(day_millis(d), open, high, low, close, volume);
            bar.vw = Some(Value::from((high + low + close) / 3.0));
            bar.n = Some(Value::from((volume / 150.0).round()));
            bar
        })
        .collect()
}

/// Five-minute closes over the regular session (14:30 to 21:00 UTC).
pub fn intraday(ticker: &str, day: NaiveDate) -> Vec<RawIntradayPoint> {
    let base = base_price(ticker);
    let open_ms = day_millis(day) + (14 * 60 + 30) * 60_000;
    (0..=78_i32)
        .map(|i| {
            let drift = f64::from(i % 13 - 6) / 200.0;
            RawIntradayPoint::at_millis(open_ms + i64::from(i) * 300_000, base * (1.0 + drift))
        })
        .collect()
}
