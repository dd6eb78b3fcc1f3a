//! Mock connectors for tests and examples.
//!
//! [`MockConnector`] serves deterministic fixture data and counts calls per
//! capability. [`DynamicMockConnector`] defers every answer to a controller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gapscope_core::connector::{
    DailyBarsProvider, GapConnector, GapStatsProvider, IntradayProvider, TickerStatsProvider,
};
use gapscope_core::{
    Capability, DailyBarsRequest, GapError, GapRow, IntradayRequest, RawDailyBar,
    RawIntradayPoint, SearchParams, TickerStats,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Ticker that makes every call touching it fail.
pub const FAIL_TICKER: &str = "FAIL";
/// Ticker whose calls are answered after [`SLOW_DELAY`].
pub const SLOW_TICKER: &str = "TIMEOUT";
/// Latency applied to [`SLOW_TICKER`].
pub const SLOW_DELAY: Duration = Duration::from_millis(200);

/// Mock connector for CI-safe examples. Provides deterministic data from static fixtures.
///
/// Fixture tickers: `ABCD` (two gaps), `WXYZ`, `QRST`, `FAIL` and `NODT`, whose
/// row has no date.
#[derive(Debug, Default)]
pub struct MockConnector {
    calls: [AtomicUsize; 4],
}

impl MockConnector {
    /// Fresh connector with zeroed call counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls served for a capability so far.
    #[must_use]
    pub fn calls(&self, capability: Capability) -> usize {
        Self::slot(capability).map_or(0, |i| self.calls[i].load(Ordering::SeqCst))
    }

    const fn slot(capability: Capability) -> Option<usize> {
        match capability {
            Capability::GapStats => Some(0),
            Capability::DailyBars => Some(1),
            Capability::IntradayPoints => Some(2),
            Capability::TickerStats => Some(3),
            _ => None,
        }
    }

    fn record(&self, capability: Capability) {
        if let Some(i) = Self::slot(capability) {
            self.calls[i].fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn maybe_fail_or_delay(ticker: &str, capability: Capability) -> Result<(), GapError> {
        match ticker {
            FAIL_TICKER => Err(GapError::transport(
                capability.endpoint(),
                format!("forced failure: {capability}"),
            )),
            SLOW_TICKER => {
                tokio::time::sleep(SLOW_DELAY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl GapConnector for MockConnector {
    fn name(&self) -> &'static str {
        "gapscope-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_gap_stats_provider(&self) -> Option<&dyn GapStatsProvider> {
        Some(self as &dyn GapStatsProvider)
    }

    fn as_daily_bars_provider(&self) -> Option<&dyn DailyBarsProvider> {
        Some(self as &dyn DailyBarsProvider)
    }

    fn as_intraday_provider(&self) -> Option<&dyn IntradayProvider> {
        Some(self as &dyn IntradayProvider)
    }

    fn as_ticker_stats_provider(&self) -> Option<&dyn TickerStatsProvider> {
        Some(self as &dyn TickerStatsProvider)
    }
}

#[async_trait]
impl GapStatsProvider for MockConnector {
    async fn gap_stats(&self, params: &SearchParams) -> Result<Vec<GapRow>, GapError> {
        self.record(Capability::GapStats);
        if let Some(t) = params.ticker.as_deref() {
            Self::maybe_fail_or_delay(t.trim(), Capability::GapStats).await?;
        }
        Ok(fixtures::gaps::search(params))
    }
}

#[async_trait]
impl DailyBarsProvider for MockConnector {
    async fn daily_bars(&self, req: &DailyBarsRequest) -> Result<Vec<RawDailyBar>, GapError> {
        self.record(Capability::DailyBars);
        Self::maybe_fail_or_delay(&req.ticker, Capability::DailyBars).await?;
        Ok(fixtures::bars::daily(&req.ticker, req.start_date, req.end_date))
    }
}

#[async_trait]
impl IntradayProvider for MockConnector {
    async fn intraday_points(
        &self,
        req: &IntradayRequest,
    ) -> Result<Vec<RawIntradayPoint>, GapError> {
        self.record(Capability::IntradayPoints);
        Self::maybe_fail_or_delay(&req.ticker, Capability::IntradayPoints).await?;
        Ok(fixtures::bars::intraday(&req.ticker, req.date))
    }
}

#[async_trait]
impl TickerStatsProvider for MockConnector {
    async fn ticker_stats(&self, ticker: &str) -> Result<TickerStats, GapError> {
        self.record(Capability::TickerStats);
        Self::maybe_fail_or_delay(ticker, Capability::TickerStats).await?;
        fixtures::stats::by_ticker(ticker)
            .ok_or_else(|| GapError::not_found(format!("ticker stats for {ticker}")))
    }
}
