//! gapscope-http
//!
//! Connector that implements `GapConnector` against the gapscope backend's HTTP
//! API: `/gap_stats`, `/daily_data`, `/intraday_data` and `/ticker_stats`.
//!
//! Every non-success status is a request failure; no status gets special
//! treatment. Bodies are decoded leniently into the raw wire types and left for
//! `gapscope-core` to normalize.
#![warn(missing_docs)]

/// Builder and environment-based construction.
pub mod builder;

use async_trait::async_trait;
use gapscope_core::connector::{
    DailyBarsProvider, GapConnector, GapStatsProvider, IntradayProvider, TickerStatsProvider,
};
use gapscope_core::{
    Capability, DailyBarsRequest, GapError, GapRow, IntradayRequest, RawDailyBar,
    RawIntradayPoint, SearchParams, TickerStats,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub use builder::{BASE_URL_ENV, DEFAULT_BASE_URL, HttpConnectorBuilder};

const DATE_FMT: &str = "%Y-%m-%d";

/// Public connector type. Construct with [`HttpConnector::builder`] or
/// [`HttpConnector::from_env`].
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: reqwest::Client,
    base_url: String,
}

/// `/ticker_stats` answers with either a bare object or a list holding one.
#[derive(Deserialize)]
#[serde(untagged)]
enum TickerStatsBody {
    One(TickerStats),
    Many(Vec<TickerStats>),
}

impl HttpConnector {
    /// API root without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint path.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        capability: Capability,
        query: &[(&str, &str)],
    ) -> Result<T, GapError> {
        let endpoint = capability.endpoint();
        let resp = self
            .client
            .get(self.endpoint_url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|e| map_send_error(&e, capability))?;

        let status = resp.status();
        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!(endpoint, status = status.as_u16(), "backend returned non-success status");
            return Err(GapError::http(endpoint, status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| map_send_error(&e, capability))?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn map_send_error(e: &reqwest::Error, capability: Capability) -> GapError {
    if e.is_timeout() {
        GapError::timeout(capability)
    } else {
        GapError::transport(capability.endpoint(), e.to_string())
    }
}

impl GapConnector for HttpConnector {
    fn name(&self) -> &'static str {
        "gapscope-http"
    }

    fn vendor(&self) -> &'static str {
        "gapscope backend"
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
impl GapStatsProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gapscope_http::gap_stats",
            skip(self, params),
            fields(ticker = ?params.ticker, date = ?params.date),
        )
    )]
    async fn gap_stats(&self, params: &SearchParams) -> Result<Vec<GapRow>, GapError> {
        self.get_json(Capability::GapStats, &params.query_pairs())
            .await
    }
}

#[async_trait]
impl DailyBarsProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gapscope_http::daily_bars",
            skip(self, req),
            fields(ticker = %req.ticker, start = %req.start_date, end = %req.end_date),
        )
    )]
    async fn daily_bars(&self, req: &DailyBarsRequest) -> Result<Vec<RawDailyBar>, GapError> {
        let start = req.start_date.format(DATE_FMT).to_string();
        let end = req.end_date.format(DATE_FMT).to_string();
        self.get_json(
            Capability::DailyBars,
            &[
                ("ticker", req.ticker.as_str()),
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
            ],
        )
        .await
    }
}

#[async_trait]
impl IntradayProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gapscope_http::intraday_points",
            skip(self, req),
            fields(ticker = %req.ticker, date = %req.date),
        )
    )]
    async fn intraday_points(
        &self,
        req: &IntradayRequest,
    ) -> Result<Vec<RawIntradayPoint>, GapError> {
        let date = req.date.format(DATE_FMT).to_string();
        self.get_json(
            Capability::IntradayPoints,
            &[("ticker", req.ticker.as_str()), ("date", date.as_str())],
        )
        .await
    }
}

#[async_trait]
impl TickerStatsProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gapscope_http::ticker_stats", skip(self))
    )]
    async fn ticker_stats(&self, ticker: &str) -> Result<TickerStats, GapError> {
        let body: TickerStatsBody = self
            .get_json(Capability::TickerStats, &[("ticker", ticker)])
            .await?;
        match body {
            TickerStatsBody::One(s) => Ok(s),
            TickerStatsBody::Many(list) => list
                .into_iter()
                .next()
                .ok_or_else(|| GapError::not_found(format!("ticker stats for {ticker}"))),
        }
    }
}
