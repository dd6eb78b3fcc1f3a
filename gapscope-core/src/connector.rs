use async_trait::async_trait;
use chrono::{Days, NaiveDate};

use crate::{
    Capability, DailyWindow, GapError, GapRow, RawDailyBar, RawIntradayPoint, SearchParams,
    TickerStats,
};

/// Window of daily bars to fetch for one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DailyBarsRequest {
    /// Ticker symbol.
    pub ticker: String,
    /// First day included.
    pub start_date: NaiveDate,
    /// Last day included.
    pub end_date: NaiveDate,
}

impl DailyBarsRequest {
    /// Request centered on a gap day.
    ///
    /// # Errors
    /// Returns `Validation` when `date` is not a `YYYY-MM-DD` calendar day or
    /// the window leaves the representable date range.
    pub fn around_gap(
        ticker: impl Into<String>,
        date: &str,
        window: DailyWindow,
    ) -> Result<Self, GapError> {
        let day = parse_gap_date(date)?;
        let start_date = day
            .checked_sub_days(Days::new(u64::from(window.before_days)))
            .ok_or_else(|| GapError::validation(format!("window start before {date} overflows")))?;
        let end_date = day
            .checked_add_days(Days::new(u64::from(window.after_days)))
            .ok_or_else(|| GapError::validation(format!("window end after {date} overflows")))?;
        Ok(Self {
            ticker: ticker.into(),
            start_date,
            end_date,
        })
    }
}

/// One trading day of intraday points for a ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntradayRequest {
    /// Ticker symbol.
    pub ticker: String,
    /// Trading day.
    pub date: NaiveDate,
}

impl IntradayRequest {
    /// Request for the gap day itself.
    ///
    /// # Errors
    /// Returns `Validation` when `date` is not a `YYYY-MM-DD` calendar day.
    pub fn for_gap(ticker: impl Into<String>, date: &str) -> Result<Self, GapError> {
        Ok(Self {
            ticker: ticker.into(),
            date: parse_gap_date(date)?,
        })
    }
}

/// Parse a gap day in the backend's `YYYY-MM-DD` format.
///
/// # Errors
/// Returns `Validation` for anything that is not a calendar day.
pub fn parse_gap_date(date: &str) -> Result<NaiveDate, GapError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| GapError::validation(format!("invalid gap date {date:?}: {e}")))
}

/// Focused role trait for connectors that serve ranked gap events.
#[async_trait]
pub trait GapStatsProvider: Send + Sync {
    /// Fetch gap rows matching the set filters, in backend order.
    async fn gap_stats(&self, params: &SearchParams) -> Result<Vec<GapRow>, GapError>;
}

/// Focused role trait for connectors that serve daily bars.
#[async_trait]
pub trait DailyBarsProvider: Send + Sync {
    /// Fetch daily bars for a ticker over a day window.
    async fn daily_bars(&self, req: &DailyBarsRequest) -> Result<Vec<RawDailyBar>, GapError>;
}

/// Focused role trait for connectors that serve intraday points.
#[async_trait]
pub trait IntradayProvider: Send + Sync {
    /// Fetch intraday points for a ticker on one day.
    async fn intraday_points(
        &self,
        req: &IntradayRequest,
    ) -> Result<Vec<RawIntradayPoint>, GapError>;
}

/// Focused role trait for connectors that serve per-ticker aggregates.
#[async_trait]
pub trait TickerStatsProvider: Send + Sync {
    /// Fetch aggregate gap statistics for one ticker.
    async fn ticker_stats(&self, ticker: &str) -> Result<TickerStats, GapError>;
}

/// Backend connector consumed by the coordinator.
///
/// Capabilities are advertised through the `as_*_provider` accessors; the
/// defaults advertise nothing.
pub trait GapConnector: Send + Sync {
    /// A stable identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise gap search.
    fn as_gap_stats_provider(&self) -> Option<&dyn GapStatsProvider> {
        None
    }

    /// Advertise daily bars.
    fn as_daily_bars_provider(&self) -> Option<&dyn DailyBarsProvider> {
        None
    }

    /// Advertise intraday points.
    fn as_intraday_provider(&self) -> Option<&dyn IntradayProvider> {
        None
    }

    /// Advertise per-ticker statistics.
    fn as_ticker_stats_provider(&self) -> Option<&dyn TickerStatsProvider> {
        None
    }

    /// Whether a capability is advertised.
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::GapStats => self.as_gap_stats_provider().is_some(),
            Capability::DailyBars => self.as_daily_bars_provider().is_some(),
            Capability::IntradayPoints => self.as_intraday_provider().is_some(),
            Capability::TickerStats => self.as_ticker_stats_provider().is_some(),
            _ => false,
        }
    }
}
