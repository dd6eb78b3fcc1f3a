use core::fmt;
use serde::{Deserialize, Serialize};

/// Backend capability labels for errors, timeouts, and telemetry.
///
/// One label per backend endpoint consumed by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Ranked gap events filtered by ticker and/or date (`/gap_stats`).
    GapStats,
    /// Daily OHLCV bars over a date window (`/daily_data`).
    DailyBars,
    /// Intraday close points for one trading day (`/intraday_data`).
    IntradayPoints,
    /// Aggregate per-ticker statistics (`/ticker_stats`).
    TickerStats,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GapStats => "gap-stats",
            Self::DailyBars => "daily-bars",
            Self::IntradayPoints => "intraday-points",
            Self::TickerStats => "ticker-stats",
        }
    }

    /// Path of the backend endpoint serving this capability.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::GapStats => "/gap_stats",
            Self::DailyBars => "/daily_data",
            Self::IntradayPoints => "/intraday_data",
            Self::TickerStats => "/ticker_stats",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
