//! gapscope coordinates gap search, lazy per-gap expansion and ticker statistics
//! over a pluggable backend connector.
//!
//! Overview
//! - `search` replaces the gap list with the backend's results, largest gap first.
//! - `toggle_expand` loads a gap's daily and intraday series on first expansion and
//!   serves later expansions from the loaded event.
//! - `refresh_ticker_stats` rebuilds the per-ticker statistics whenever the listed
//!   ticker set changes; failing tickers are left out.
//! - Chart views turn an expanded event into drawing-surface calls.
//!
//! Concurrency
//! - Searches are numbered. Only the most recently issued search may publish; an
//!   older response is dropped and reported as `SearchOutcome::Superseded`.
//! - Collapsing a gap while its fetch is in flight abandons that fetch.
//! - Nothing is cancelled: stale responses are simply ignored on arrival.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use gapscope::{GapScope, SearchParams};
//! use gapscope_mock::MockConnector;
//!
//! let scope = GapScope::builder()
//!     .with_connector(Arc::new(MockConnector::new()))
//!     .build()?;
//! scope.search(SearchParams::new().date("2024-03-05")).await?;
//! let first = scope.gaps().await[0].id;
//! scope.toggle_expand(first).await?;
//! let stats = scope.ticker_stats().await;
//! ```
#![warn(missing_docs)]

mod core;
mod expand;
mod search;
mod state;
mod stats;
/// Chart views bound to a drawing-surface factory.
pub mod view;

pub use crate::core::{GapScope, GapScopeBuilder};
pub use state::{
    EXPANSION_FAILED, ErrorScope, ExpansionState, GAP_DATE_INVALID, GAP_LACKS_FIELDS,
    GapScopeSnapshot, SEARCH_FAILED, SearchOutcome, StatsRefresh, SurfacedError,
};
pub use view::{DailyChartView, IntradayChartView};

pub use gapscope_core::{
    Capability, ChartOptions, DailyWindow, GapConnector, GapError, GapEvent, GapId,
    GapScopeConfig, Indicators, IntradayOptions, SearchParams, StatsFetchStrategy, TickerStats,
    TimeFormat,
};
