use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gapscope_core::{
    Capability, ChartOptions, DailyWindow, GapConnector, GapError, GapEvent, GapId,
    IntradayOptions, StatsFetchStrategy, TickerStats,
};
use gapscope_types::GapScopeConfig;
use tokio::sync::Mutex;

use crate::state::{ExpansionState, GapScopeSnapshot, State, SurfacedError};

/// Coordinator owning the gap list, the per-gap expansion cache and the
/// ticker-stats mapping.
///
/// All methods take `&self`; state sits behind a mutex that is never held
/// across a backend call, so concurrent operations interleave only at request
/// boundaries.
pub struct GapScope {
    pub(crate) connector: Arc<dyn GapConnector>,
    pub(crate) cfg: GapScopeConfig,
    pub(crate) state: Mutex<State>,
}

/// Builder for constructing a `GapScope` coordinator with custom configuration.
pub struct GapScopeBuilder {
    connector: Option<Arc<dyn GapConnector>>,
    cfg: GapScopeConfig,
}

impl Default for GapScopeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GapScopeBuilder {
    /// Create a new builder with default configuration and no connector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: GapScopeConfig::default(),
        }
    }

    /// Set the backend connector. A later call replaces an earlier one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn GapConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: GapScopeConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Bound every backend call. On expiry the call fails with `Timeout`.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Scheduling of the per-ticker stats lookups.
    #[must_use]
    pub const fn stats_strategy(mut self, strategy: StatsFetchStrategy) -> Self {
        self.cfg.stats_strategy = strategy;
        self
    }

    /// Whether a successful search refreshes ticker stats before returning.
    #[must_use]
    pub const fn refresh_stats_after_search(mut self, yes: bool) -> Self {
        self.cfg.refresh_stats_after_search = yes;
        self
    }

    /// Days of daily bars requested around a gap day.
    #[must_use]
    pub const fn daily_window(mut self, window: DailyWindow) -> Self {
        self.cfg.daily_window = window;
        self
    }

    /// Default daily chart options handed to views.
    #[must_use]
    pub const fn chart_options(mut self, options: ChartOptions) -> Self {
        self.cfg.chart = options;
        self
    }

    /// Default intraday chart options handed to views.
    #[must_use]
    pub const fn intraday_options(mut self, options: IntradayOptions) -> Self {
        self.cfg.intraday = options;
        self
    }

    /// Build the coordinator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector was registered via [`Self::with_connector`]
    /// or the chart options are invalid.
    pub fn build(self) -> Result<GapScope, GapError> {
        let Some(connector) = self.connector else {
            return Err(GapError::InvalidArg(
                "no connector registered; add one via with_connector(...)".to_string(),
            ));
        };
        self.cfg.chart.validate()?;
        Ok(GapScope {
            connector,
            cfg: self.cfg,
            state: Mutex::new(State::default()),
        })
    }
}

impl GapScope {
    /// Start building a new `GapScope`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use gapscope::{GapScope, SearchParams};
    /// use gapscope_http::HttpConnector;
    ///
    /// let scope = GapScope::builder()
    ///     .with_connector(Arc::new(HttpConnector::from_env()?))
    ///     .request_timeout(std::time::Duration::from_secs(10))
    ///     .build()?;
    /// scope.search(SearchParams::new().ticker("ABCD")).await?;
    /// ```
    #[must_use]
    pub fn builder() -> GapScopeBuilder {
        GapScopeBuilder::new()
    }

    /// Wrap a backend future with the configured timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gapscope::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = %capability,
                timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: Capability,
        timeout: Option<Duration>,
        fut: Fut,
    ) -> Result<T, GapError>
    where
        Fut: core::future::Future<Output = Result<T, GapError>>,
    {
        match timeout {
            Some(t) => tokio::time::timeout(t, fut)
                .await
                .unwrap_or_else(|_| Err(GapError::timeout(capability))),
            None => fut.await,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GapScopeConfig {
        &self.cfg
    }

    /// Connector name, as used in logs.
    #[must_use]
    pub fn connector_name(&self) -> &'static str {
        self.connector.name()
    }

    /// Read-only copy of the whole state.
    pub async fn snapshot(&self) -> GapScopeSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Gap list in display order.
    pub async fn gaps(&self) -> Vec<GapEvent> {
        self.state.lock().await.gaps.clone()
    }

    /// Expansion state of a listed gap; `None` for unknown ids.
    pub async fn expansion_state(&self, id: GapId) -> Option<ExpansionState> {
        let st = self.state.lock().await;
        st.position(id).map(|_| st.expansion_state(id))
    }

    /// The enriched event of an expanded gap.
    pub async fn expanded_gap(&self, id: GapId) -> Option<GapEvent> {
        self.state.lock().await.expanded.get(&id).cloned()
    }

    /// Stats per ticker from the last completed pass.
    pub async fn ticker_stats(&self) -> HashMap<String, TickerStats> {
        self.state.lock().await.ticker_stats.clone()
    }

    /// Error currently surfaced, if any.
    pub async fn error(&self) -> Option<SurfacedError> {
        self.state.lock().await.error.clone()
    }

    /// True while any search or expansion fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.in_flight > 0
    }
}
