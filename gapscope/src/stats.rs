use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use gapscope_core::connector::TickerStatsProvider;
use gapscope_core::{Capability, GapError, StatsFetchStrategy, TickerStats};

use crate::GapScope;
use crate::state::StatsRefresh;

/// Outcome of one aggregation pass.
#[derive(Debug, Default)]
pub(crate) struct StatsPass {
    pub(crate) resolved: HashMap<String, TickerStats>,
    pub(crate) failed: Vec<String>,
}

impl StatsPass {
    fn record(&mut self, ticker: String, res: Result<TickerStats, GapError>) {
        match res {
            Ok(s) => {
                self.resolved.insert(ticker, s);
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(ticker = %ticker, error = %_e, "failed to fetch ticker stats");
                self.failed.push(ticker);
            }
        }
    }
}

/// Look up stats for each ticker; failures are logged and left out.
pub(crate) async fn collect_ticker_stats(
    connector_name: &'static str,
    provider: &dyn TickerStatsProvider,
    tickers: Vec<String>,
    strategy: StatsFetchStrategy,
    timeout: Option<Duration>,
) -> StatsPass {
    let lookup = move |ticker: String| async move {
        let res = GapScope::provider_call_with_timeout(
            connector_name,
            Capability::TickerStats,
            timeout,
            provider.ticker_stats(&ticker),
        )
        .await;
        (ticker, res)
    };

    let mut pass = StatsPass::default();
    match strategy {
        StatsFetchStrategy::Concurrent { limit } => {
            let results: Vec<_> = stream::iter(tickers)
                .map(lookup)
                .buffered(limit.max(1))
                .collect()
                .await;
            for (ticker, res) in results {
                pass.record(ticker, res);
            }
        }
        _ => {
            for ticker in tickers {
                let (ticker, res) = lookup(ticker).await;
                pass.record(ticker, res);
            }
        }
    }
    pass
}

impl GapScope {
    /// Recompute the ticker-stats mapping from the tickers currently listed.
    ///
    /// Does nothing when the list was not replaced since the last completed pass
    /// and its set of unique tickers is the same. An empty list empties the mapping without requests.
    /// Otherwise each unique ticker is looked up (one at a time by default) and
    /// the mapping is replaced, not merged, with the tickers that resolved. A
    /// pass that finishes after the list was replaced by a newer search is dropped.
    ///
    /// # Errors
    /// Returns `Unsupported` when tickers are listed but the connector serves no
    /// ticker stats. Individual lookup failures are not errors.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gapscope::refresh_ticker_stats", skip(self))
    )]
    pub async fn refresh_ticker_stats(&self) -> Result<StatsRefresh, GapError> {
        let (tickers, set, generation) = {
            let mut st = self.state.lock().await;
            let tickers = st.unique_tickers();
            let set: BTreeSet<String> = tickers.iter().cloned().collect();
            if st.stats_tickers.as_ref() == Some(&set) {
                return Ok(StatsRefresh::Unchanged);
            }
            if tickers.is_empty() {
                st.ticker_stats.clear();
                st.stats_tickers = Some(set);
                return Ok(StatsRefresh::Cleared);
            }
            (tickers, set, st.list_generation)
        };

        let provider = self
            .connector
            .as_ticker_stats_provider()
            .ok_or_else(|| GapError::unsupported(Capability::TickerStats))?;
        let pass = collect_ticker_stats(
            self.connector.name(),
            provider,
            tickers,
            self.cfg.stats_strategy,
            self.cfg.request_timeout,
        )
        .await;

        let mut st = self.state.lock().await;
        if st.list_generation != generation {
            #[cfg(feature = "tracing")]
            tracing::debug!(generation, "discarding stats pass for a replaced list");
            return Ok(StatsRefresh::Discarded);
        }
        let resolved = pass.resolved.len();
        let failed = pass.failed.len();
        st.ticker_stats = pass.resolved;
        st.stats_tickers = Some(set);
        Ok(StatsRefresh::Replaced { resolved, failed })
    }
}
