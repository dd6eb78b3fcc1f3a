use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use gapscope_core::connector::{
    DailyBarsProvider, GapConnector, GapStatsProvider, IntradayProvider, TickerStatsProvider,
};
use gapscope_core::{
    Capability, DailyBarsRequest, GapError, GapRow, IntradayRequest, RawDailyBar,
    RawIntradayPoint, SearchParams, TickerStats,
};

/// Instruction for how a method should behave for a given input.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(GapError),
    /// Wait, then behave as the inner instruction.
    After(Duration, Box<MockBehavior<T>>),
    /// Hang indefinitely (simulate a stalled backend).
    Hang,
}

impl<T> MockBehavior<T> {
    /// Return `value` after `delay`.
    pub fn delayed(delay: Duration, value: T) -> Self {
        Self::After(delay, Box::new(Self::Return(value)))
    }

    /// Fail with `err` after `delay`.
    pub fn delayed_fail(delay: Duration, err: GapError) -> Self {
        Self::After(delay, Box::new(Self::Fail(err)))
    }
}

async fn resolve<T: Send>(
    behavior: Option<MockBehavior<T>>,
    capability: Capability,
) -> Result<T, GapError> {
    let mut next = behavior;
    loop {
        match next {
            Some(MockBehavior::Return(v)) => return Ok(v),
            Some(MockBehavior::Fail(e)) => return Err(e),
            Some(MockBehavior::After(delay, inner)) => {
                tokio::time::sleep(delay).await;
                next = Some(*inner);
            }
            Some(MockBehavior::Hang) => return std::future::pending().await,
            None => return Err(GapError::unsupported(capability)),
        }
    }
}

#[derive(Default)]
struct InternalState {
    gap_stats_queue: VecDeque<MockBehavior<Vec<GapRow>>>,
    gap_stats_default: Option<MockBehavior<Vec<GapRow>>>,
    daily_rules: HashMap<String, MockBehavior<Vec<RawDailyBar>>>,
    intraday_rules: HashMap<String, MockBehavior<Vec<RawIntradayPoint>>>,
    stats_rules: HashMap<String, MockBehavior<TickerStats>>,
    gap_stats_requests: Vec<SearchParams>,
    daily_requests: Vec<DailyBarsRequest>,
    intraday_requests: Vec<IntradayRequest>,
    stats_requests: Vec<String>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Queue a one-shot behavior for the next `gap_stats` call.
    ///
    /// Queued behaviors are consumed in order; once the queue is empty the
    /// default set by [`Self::set_gap_stats_behavior`] applies.
    pub async fn push_gap_stats_behavior(&self, behavior: MockBehavior<Vec<GapRow>>) {
        let mut guard = self.state.lock().await;
        guard.gap_stats_queue.push_back(behavior);
    }

    /// Set the fallback behavior for `gap_stats` calls.
    pub async fn set_gap_stats_behavior(&self, behavior: MockBehavior<Vec<GapRow>>) {
        let mut guard = self.state.lock().await;
        guard.gap_stats_default = Some(behavior);
    }

    /// Set the behavior for `daily_bars` calls for a ticker.
    pub async fn set_daily_behavior(
        &self,
        ticker: impl Into<String>,
        behavior: MockBehavior<Vec<RawDailyBar>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.daily_rules.insert(ticker.into(), behavior);
    }

    /// Set the behavior for `intraday_points` calls for a ticker.
    pub async fn set_intraday_behavior(
        &self,
        ticker: impl Into<String>,
        behavior: MockBehavior<Vec<RawIntradayPoint>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.intraday_rules.insert(ticker.into(), behavior);
    }

    /// Set the behavior for `ticker_stats` calls for a ticker.
    pub async fn set_ticker_stats_behavior(
        &self,
        ticker: impl Into<String>,
        behavior: MockBehavior<TickerStats>,
    ) {
        let mut guard = self.state.lock().await;
        guard.stats_rules.insert(ticker.into(), behavior);
    }

    /// Copy of every `gap_stats` request received so far.
    pub async fn gap_stats_requests(&self) -> Vec<SearchParams> {
        self.state.lock().await.gap_stats_requests.clone()
    }

    /// Copy of every `daily_bars` request received so far.
    pub async fn daily_requests(&self) -> Vec<DailyBarsRequest> {
        self.state.lock().await.daily_requests.clone()
    }

    /// Copy of every `intraday_points` request received so far.
    pub async fn intraday_requests(&self) -> Vec<IntradayRequest> {
        self.state.lock().await.intraday_requests.clone()
    }

    /// Tickers passed to `ticker_stats`, in call order.
    pub async fn ticker_stats_requests(&self) -> Vec<String> {
        self.state.lock().await.stats_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn GapConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn GapConnector>, controller)
    }
}

impl GapConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
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
impl GapStatsProvider for DynamicMockConnector {
    async fn gap_stats(&self, params: &SearchParams) -> Result<Vec<GapRow>, GapError> {
        // Snapshot the behavior without holding the lock across the wait
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.gap_stats_requests.push(params.clone());
            guard
                .gap_stats_queue
                .pop_front()
                .or_else(|| guard.gap_stats_default.clone())
        };
        resolve(behavior, Capability::GapStats).await
    }
}

#[async_trait]
impl DailyBarsProvider for DynamicMockConnector {
    async fn daily_bars(&self, req: &DailyBarsRequest) -> Result<Vec<RawDailyBar>, GapError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.daily_requests.push(req.clone());
            guard.daily_rules.get(&req.ticker).cloned()
        };
        resolve(behavior, Capability::DailyBars).await
    }
}

#[async_trait]
impl IntradayProvider for DynamicMockConnector {
    async fn intraday_points(
        &self,
        req: &IntradayRequest,
    ) -> Result<Vec<RawIntradayPoint>, GapError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.intraday_requests.push(req.clone());
            guard.intraday_rules.get(&req.ticker).cloned()
        };
        resolve(behavior, Capability::IntradayPoints).await
    }
}

#[async_trait]
impl TickerStatsProvider for DynamicMockConnector {
    async fn ticker_stats(&self, ticker: &str) -> Result<TickerStats, GapError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.stats_requests.push(ticker.to_string());
            guard.stats_rules.get(ticker).cloned()
        };
        resolve(behavior, Capability::TickerStats).await
    }
}
