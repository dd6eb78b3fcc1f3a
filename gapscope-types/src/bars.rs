//! Daily bars and intraday points, in wire and canonical shapes.
//!
//! The backend serves daily bars under two key conventions (`o/h/l/c/v/vw/n`
//! and `open/high/low/close/volume/volume_weighted_avg_price`) and may encode
//! numbers as strings. The `Raw*` types capture the payload as-is; the
//! canonical types are what everything downstream of ingestion works with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A daily bar exactly as the backend sent it.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDailyBar {
    /// Bar time in epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<Value>,
    /// Bar day as `YYYY-MM-DD` (long-key payloads).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vw: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_weighted_avg_price: Option<Value>,
    /// Transaction count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<Value>,
}

impl RawDailyBar {
    /// Short-key bar (`t/o/h/l/c/v`), the shape most fixtures use.
    #[must_use]
    pub fn short(t_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            t: Some(Value::from(t_ms)),
            o: Some(Value::from(open)),
            h: Some(Value::from(high)),
            l: Some(Value::from(low)),
            c: Some(Value::from(close)),
            v: Some(Value::from(volume)),
            ..Self::default()
        }
    }

    /// Long-key bar keyed by calendar day, as the backend's daily table emits it.
    #[must_use]
    pub fn long(date: &str, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date: Some(Value::from(date)),
            open: Some(Value::from(open)),
            high: Some(Value::from(high)),
            low: Some(Value::from(low)),
            close: Some(Value::from(close)),
            volume: Some(Value::from(volume)),
            ..Self::default()
        }
    }
}

/// An intraday point exactly as the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIntradayPoint {
    /// Epoch milliseconds, or a `YYYY-MM-DD HH:MM:SS` UTC string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    /// Close price as a number or numeric string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Value>,
}

impl RawIntradayPoint {
    /// Point with an epoch-millisecond timestamp.
    #[must_use]
    pub fn at_millis(timestamp_ms: i64, close: f64) -> Self {
        Self {
            timestamp: Some(Value::from(timestamp_ms)),
            close: Some(Value::from(close)),
        }
    }
}

/// Canonical daily bar.
///
/// Prices that failed to parse are `0.0`; treat zero as missing, not as a
/// real price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Bar time in epoch milliseconds, when the payload carried one.
    pub t: Option<i64>,
    /// Bar day as `YYYY-MM-DD`, when the payload carried one.
    pub date: Option<String>,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
    /// Volume-weighted average price reported by the backend.
    pub vwap: f64,
    /// Number of transactions.
    pub transactions: f64,
}

/// Canonical intraday point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntradayPoint {
    /// Epoch milliseconds; `None` if the payload had no usable timestamp.
    pub timestamp: Option<i64>,
    /// Close price; `None` if the payload had no usable close.
    pub close: Option<f64>,
}
