use gapscope_core::{Capability, GapError, SearchParams};

use crate::GapScope;
use crate::state::{ErrorScope, SEARCH_FAILED, SearchOutcome, SurfacedError, ingest_rows};

impl GapScope {
    /// Search gap events.
    ///
    /// Only the filters that are set and non-empty are sent. On success the list
    /// is replaced by the results, ordered by gap size (largest first), each with a
    /// fresh id; the expansion cache and any surfaced error are cleared. On failure
    /// the list is emptied and a search-scoped error is surfaced.
    ///
    /// Every call takes a new generation; a response arriving after a newer search
    /// was issued is dropped and the call reports [`SearchOutcome::Superseded`].
    ///
    /// When `refresh_stats_after_search` is set, a search that replaced the list
    /// (with results or with nothing) runs the ticker-stats pass before returning.
    ///
    /// # Errors
    /// Returns the request failure of a search that was still current.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gapscope::search",
            skip(self, params),
            fields(ticker = ?params.ticker, date = ?params.date),
        )
    )]
    pub async fn search(&self, params: SearchParams) -> Result<SearchOutcome, GapError> {
        let generation = {
            let mut st = self.state.lock().await;
            st.search_generation += 1;
            st.in_flight += 1;
            st.error = None;
            st.search_generation
        };

        let res = match self.connector.as_gap_stats_provider() {
            Some(p) => {
                Self::provider_call_with_timeout(
                    self.connector.name(),
                    Capability::GapStats,
                    self.cfg.request_timeout,
                    p.gap_stats(&params),
                )
                .await
            }
            None => Err(GapError::unsupported(Capability::GapStats)),
        };

        let outcome = {
            let mut st = self.state.lock().await;
            st.in_flight = st.in_flight.saturating_sub(1);
            if st.search_generation != generation {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    generation,
                    current = st.search_generation,
                    "discarding superseded search response"
                );
                return Ok(SearchOutcome::Superseded);
            }
            match res {
                Ok(rows) => {
                    let gaps = ingest_rows(&rows);
                    let count = gaps.len();
                    st.replace_list(gaps, generation);
                    st.error = None;
                    Ok(SearchOutcome::Replaced { count })
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, "gap search failed");
                    st.replace_list(Vec::new(), generation);
                    st.error = Some(SurfacedError::new(ErrorScope::Search, SEARCH_FAILED));
                    Err(e)
                }
            }
        };

        if self.cfg.refresh_stats_after_search
            && let Err(_e) = self.refresh_ticker_stats().await
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "ticker stats refresh failed");
        }

        outcome
    }
}
