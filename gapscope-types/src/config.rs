//! Configuration types shared by the coordinator, the chart pipeline, and connectors.

use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::GapError;

/// How the ticker-stats pass schedules its per-ticker lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StatsFetchStrategy {
    /// One lookup completes before the next begins.
    #[default]
    Sequential,
    /// Up to `limit` lookups in flight at once.
    Concurrent {
        /// Maximum number of simultaneous lookups (values below 1 act as 1).
        limit: usize,
    },
}

/// Calendar-day window around a gap day used for the daily-bars request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyWindow {
    /// Days before the gap day to include.
    pub before_days: u32,
    /// Days after the gap day to include.
    pub after_days: u32,
}

bitflags! {
    /// Indicator overlays drawn on the daily chart.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Indicators: u8 {
        /// Volume histogram on its own scale.
        const VOLUME = 1 << 0;
        /// Running VWAP line.
        const VWAP = 1 << 1;
        /// EMA line on the left scale.
        const EMA = 1 << 2;
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self::empty()
    }
}

/// Which field supplies a daily bar's chart time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// Use `t` (epoch milliseconds).
    #[default]
    Milliseconds,
    /// Use the `date` string, read as midnight UTC.
    Date,
}

/// Options for the daily candlestick chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Overlays to draw in addition to candles.
    pub indicators: Indicators,
    /// EMA period; `k = 2 / (period + 1)`.
    pub ema_period: usize,
    /// Zoom the visible range around the gap bar.
    pub focus_on_gap: bool,
    /// Bars shown on each side of the gap bar when focusing.
    pub focus_radius: usize,
    /// Source of each bar's chart time.
    pub time_format: TimeFormat,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            indicators: Indicators::empty(),
            ema_period: 20,
            focus_on_gap: true,
            focus_radius: 10,
            time_format: TimeFormat::Milliseconds,
        }
    }
}

impl ChartOptions {
    /// Enable an overlay.
    #[must_use]
    pub fn with(mut self, indicators: Indicators) -> Self {
        self.indicators |= indicators;
        self
    }

    /// Reject option values the pipeline cannot honor.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `ema_period` is zero.
    pub fn validate(&self) -> Result<(), GapError> {
        if self.ema_period == 0 {
            return Err(GapError::InvalidArg("ema_period must be at least 1".into()));
        }
        Ok(())
    }
}

/// Options for the intraday line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntradayOptions {
    /// Zone used for wall-clock times and axis labels.
    pub timezone: chrono_tz::Tz,
}

impl Default for IntradayOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Los_Angeles,
        }
    }
}

/// Global configuration for the `GapScope` coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapScopeConfig {
    /// Optional timeout applied to every backend call.
    pub request_timeout: Option<Duration>,
    /// Scheduling of the ticker-stats pass.
    pub stats_strategy: StatsFetchStrategy,
    /// Run the ticker-stats pass at the end of every successful search.
    pub refresh_stats_after_search: bool,
    /// Daily-bars window requested on expansion.
    pub daily_window: DailyWindow,
    /// Daily chart defaults handed to views.
    pub chart: ChartOptions,
    /// Intraday chart defaults handed to views.
    pub intraday: IntradayOptions,
}

impl Default for GapScopeConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            stats_strategy: StatsFetchStrategy::Sequential,
            refresh_stats_after_search: true,
            daily_window: DailyWindow::default(),
            chart: ChartOptions::default(),
            intraday: IntradayOptions::default(),
        }
    }
}
