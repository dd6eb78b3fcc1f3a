use gapscope_core::{
    Capability, DailyBarsRequest, GapError, GapId, GapSeries, IntradayRequest, normalize_daily,
    normalize_intraday,
};

use crate::GapScope;
use crate::state::{
    EXPANSION_FAILED, ErrorScope, ExpansionState, GAP_DATE_INVALID, GAP_LACKS_FIELDS,
    SurfacedError,
};

enum Plan {
    Done(ExpansionState),
    Fetch {
        ticket: u64,
        daily: DailyBarsRequest,
        intraday: IntradayRequest,
    },
}

impl GapScope {
    /// Toggle a gap between collapsed and expanded.
    ///
    /// - expanded: collapses; the loaded series stay on the event, so expanding
    ///   again needs no request.
    /// - expanding: abandons the in-flight fetch; the gap collapses and the
    ///   response is dropped when it arrives.
    /// - collapsed with series loaded: expands without a request.
    /// - collapsed otherwise: requests daily bars and intraday points
    ///   concurrently and expands once both arrive.
    ///
    /// Returns the gap's state when the call completes.
    ///
    /// # Errors
    /// - `InvalidArg` if `id` is not in the current list.
    /// - `Validation` if the gap lacks ticker or date, or the date is not a
    ///   calendar day; nothing is requested.
    /// - The first request failure of the fetch; the gap stays collapsed.
    ///
    /// Validation and request failures also surface an expansion-scoped error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gapscope::toggle_expand", skip(self), fields(id = %id))
    )]
    pub async fn toggle_expand(&self, id: GapId) -> Result<ExpansionState, GapError> {
        let plan = {
            let mut st = self.state.lock().await;
            let Some(idx) = st.position(id) else {
                return Err(GapError::InvalidArg(format!("unknown gap id {id}")));
            };

            if st.expanded.remove(&id).is_some() {
                Plan::Done(ExpansionState::Collapsed)
            } else if st.expanding.remove(&id).is_some() {
                #[cfg(feature = "tracing")]
                tracing::debug!("abandoning in-flight expansion");
                Plan::Done(ExpansionState::Collapsed)
            } else if st.gaps[idx].is_enriched() {
                let gap = st.gaps[idx].clone();
                st.expanded.insert(id, gap);
                Plan::Done(ExpansionState::Expanded)
            } else {
                let gap = &st.gaps[idx];
                let (Some(ticker), Some(date)) = (gap.ticker_str(), gap.date_str()) else {
                    st.error = Some(SurfacedError::new(ErrorScope::Expansion, GAP_LACKS_FIELDS));
                    return Err(GapError::validation(GAP_LACKS_FIELDS));
                };
                let reqs = DailyBarsRequest::around_gap(ticker, date, self.cfg.daily_window)
                    .and_then(|d| IntradayRequest::for_gap(ticker, date).map(|i| (d, i)));
                match reqs {
                    Ok((daily, intraday)) => {
                        st.next_ticket += 1;
                        let ticket = st.next_ticket;
                        st.expanding.insert(id, ticket);
                        st.in_flight += 1;
                        st.error = None;
                        Plan::Fetch {
                            ticket,
                            daily,
                            intraday,
                        }
                    }
                    Err(e) => {
                        st.error = Some(SurfacedError::new(ErrorScope::Expansion, GAP_DATE_INVALID));
                        return Err(e);
                    }
                }
            }
        };

        let (ticket, daily_req, intraday_req) = match plan {
            Plan::Done(state) => return Ok(state),
            Plan::Fetch {
                ticket,
                daily,
                intraday,
            } => (ticket, daily, intraday),
        };

        let daily_fut = async {
            let p = self
                .connector
                .as_daily_bars_provider()
                .ok_or_else(|| GapError::unsupported(Capability::DailyBars))?;
            Self::provider_call_with_timeout(
                self.connector.name(),
                Capability::DailyBars,
                self.cfg.request_timeout,
                p.daily_bars(&daily_req),
            )
            .await
        };
        let intraday_fut = async {
            let p = self
                .connector
                .as_intraday_provider()
                .ok_or_else(|| GapError::unsupported(Capability::IntradayPoints))?;
            Self::provider_call_with_timeout(
                self.connector.name(),
                Capability::IntradayPoints,
                self.cfg.request_timeout,
                p.intraday_points(&intraday_req),
            )
            .await
        };
        let (daily, intraday) = tokio::join!(daily_fut, intraday_fut);

        let mut st = self.state.lock().await;
        st.in_flight = st.in_flight.saturating_sub(1);
        if st.expanding.get(&id) != Some(&ticket) {
            #[cfg(feature = "tracing")]
            tracing::debug!(ticket, "discarding abandoned expansion response");
            return Ok(st.expansion_state(id));
        }
        st.expanding.remove(&id);

        let series = match (daily, intraday) {
            (Ok(d), Ok(i)) => GapSeries {
                daily_data: normalize_daily(&d),
                intraday_data: normalize_intraday(&i),
            },
            (Err(e), _) | (_, Err(e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "gap expansion failed");
                st.error = Some(SurfacedError::new(ErrorScope::Expansion, EXPANSION_FAILED));
                return Err(e);
            }
        };

        let Some(idx) = st.position(id) else {
            return Ok(ExpansionState::Collapsed);
        };
        st.gaps[idx].series = Some(series);
        let gap = st.gaps[idx].clone();
        st.expanded.insert(id, gap);
        Ok(ExpansionState::Expanded)
    }
}
