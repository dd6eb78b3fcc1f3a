//! Gap events, search filters, and per-ticker statistics.

use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bars::{DailyBar, IntradayPoint, RawDailyBar, RawIntradayPoint};

/// Client-assigned identity of a gap event.
///
/// Unique within one gap list and stable for that list's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GapId(Uuid);

impl GapId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GapId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One row of the `/gap_stats` response, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapRow {
    /// Ticker symbol, if the backend knows it.
    pub ticker: Option<String>,
    /// Gap day as `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Opening gap versus the prior close, in percent.
    pub gap_percent: Option<f64>,
    /// Return over the gap day, in percent.
    #[serde(rename = "return")]
    pub return_percent: Option<f64>,
    /// Whether the session closed below its open.
    pub did_close_red: Option<bool>,
    /// First timestamp of the backend's suggested chart window.
    pub start_chart_date: Option<String>,
    /// Last timestamp of the backend's suggested chart window.
    pub end_chart_date: Option<String>,
    /// Daily bars, when the backend already has them.
    pub daily_data: Option<Vec<RawDailyBar>>,
    /// Intraday points, when the backend already has them.
    pub intraday_data: Option<Vec<RawIntradayPoint>>,
}

/// Daily and intraday series fetched for one gap.
///
/// Keeping both inside one value makes partial enrichment unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapSeries {
    /// Canonical daily bars in backend order.
    pub daily_data: Vec<DailyBar>,
    /// Canonical intraday points in backend order.
    pub intraday_data: Vec<IntradayPoint>,
}

/// A ranked gap event as held by the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapEvent {
    /// Client-assigned identity.
    pub id: GapId,
    /// Ticker symbol.
    pub ticker: Option<String>,
    /// Gap day as `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Opening gap versus the prior close, in percent.
    pub gap_percent: Option<f64>,
    /// Return over the gap day, in percent.
    #[serde(rename = "return")]
    pub return_percent: Option<f64>,
    /// Whether the session closed below its open.
    pub did_close_red: bool,
    /// First timestamp of the backend's suggested chart window.
    pub start_chart_date: Option<String>,
    /// Last timestamp of the backend's suggested chart window.
    pub end_chart_date: Option<String>,
    /// Fetched series; `None` until the gap has been enriched.
    #[serde(flatten)]
    pub series: Option<GapSeries>,
}

impl GapEvent {
    /// Build an un-enriched event from a backend row and a fresh id.
    ///
    /// Any series the row carries is ignored; the caller decides whether to
    /// ingest it.
    #[must_use]
    pub fn from_row(id: GapId, row: &GapRow) -> Self {
        Self {
            id,
            ticker: row.ticker.clone(),
            date: row.date.clone(),
            gap_percent: row.gap_percent,
            return_percent: row.return_percent,
            did_close_red: row.did_close_red.unwrap_or(false),
            start_chart_date: row.start_chart_date.clone(),
            end_chart_date: row.end_chart_date.clone(),
            series: None,
        }
    }

    /// Whether both series are present.
    #[must_use]
    pub const fn is_enriched(&self) -> bool {
        self.series.is_some()
    }

    /// Ticker, treating an empty string as missing.
    #[must_use]
    pub fn ticker_str(&self) -> Option<&str> {
        self.ticker.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Date, treating an empty string as missing.
    #[must_use]
    pub fn date_str(&self) -> Option<&str> {
        self.date.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Daily bars, if enriched.
    #[must_use]
    pub fn daily_data(&self) -> Option<&[DailyBar]> {
        self.series.as_ref().map(|s| s.daily_data.as_slice())
    }

    /// Intraday points, if enriched.
    #[must_use]
    pub fn intraday_data(&self) -> Option<&[IntradayPoint]> {
        self.series.as_ref().map(|s| s.intraday_data.as_slice())
    }
}

/// Filters for a gap search. Unset or blank filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Restrict to one ticker.
    pub ticker: Option<String>,
    /// Restrict to one gap day (`YYYY-MM-DD`).
    pub date: Option<String>,
}

impl SearchParams {
    /// Search without filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by ticker.
    #[must_use]
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Filter by gap day.
    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Query pairs for the filters that are actually set.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::with_capacity(2);
        if let Some(t) = self.ticker.as_deref().filter(|t| !t.is_empty()) {
            out.push(("ticker", t));
        }
        if let Some(d) = self.date.as_deref().filter(|d| !d.is_empty()) {
            out.push(("date", d));
        }
        out
    }
}

/// Aggregate gap statistics for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickerStats {
    /// Number of gap events recorded for the ticker.
    pub total_gaps: u64,
    /// Share of those gaps that closed red.
    pub chance_to_close_red: f64,
}
