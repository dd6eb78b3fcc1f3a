use std::collections::{BTreeSet, HashMap, HashSet};

use gapscope_core::{
    GapEvent, GapId, GapRow, GapSeries, TickerStats, normalize_daily, normalize_intraday,
};
use serde::Serialize;

/// Message surfaced when a search request fails.
pub const SEARCH_FAILED: &str = "Failed to fetch gap data.";
/// Message surfaced when an expansion is attempted on a gap without ticker or date.
pub const GAP_LACKS_FIELDS: &str = "Selected gap lacks ticker or date, unable to fetch data.";
/// Message surfaced when a gap's date is not a `YYYY-MM-DD` calendar day.
pub const GAP_DATE_INVALID: &str = "Selected gap has an invalid date, unable to fetch data.";
/// Message surfaced when an expansion request fails.
pub const EXPANSION_FAILED: &str = "Failed to fetch additional data for the selected gap.";

/// Observable expansion state of one gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExpansionState {
    /// Not shown.
    Collapsed,
    /// Series requests in flight.
    Expanding,
    /// Shown with both series loaded.
    Expanded,
}

/// Result of a [`crate::GapScope::search`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchOutcome {
    /// The list was replaced with this many events.
    Replaced {
        /// Number of events now listed.
        count: usize,
    },
    /// A newer search was issued while this one was in flight; its response was discarded.
    Superseded,
}

/// Result of a ticker-stats pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatsRefresh {
    /// The ticker set matches the last completed pass; nothing was requested.
    Unchanged,
    /// The list holds no tickers; the mapping was emptied without requests.
    Cleared,
    /// The mapping was replaced.
    Replaced {
        /// Tickers resolved in this pass.
        resolved: usize,
        /// Tickers whose lookup failed and were left out.
        failed: usize,
    },
    /// The gap list changed while the pass was running; its results were dropped.
    Discarded,
}

/// Operation an error message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorScope {
    /// Raised by a search.
    Search,
    /// Raised by a gap expansion.
    Expansion,
}

/// The single human-readable error currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfacedError {
    /// Operation that raised it.
    pub scope: ErrorScope,
    /// Display text.
    pub message: String,
}

impl SurfacedError {
    pub(crate) fn new(scope: ErrorScope, message: &str) -> Self {
        Self {
            scope,
            message: message.to_string(),
        }
    }
}

/// Read-only copy of the coordinator state for view layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapScopeSnapshot {
    /// Gap list in display order.
    pub gaps: Vec<GapEvent>,
    /// Ids currently expanded, in list order.
    pub expanded: Vec<GapId>,
    /// Expansion state of every listed gap.
    pub states: HashMap<GapId, ExpansionState>,
    /// True while any search or expansion fetch is in flight.
    pub loading: bool,
    /// Error currently surfaced, if any.
    pub error: Option<SurfacedError>,
    /// Stats per ticker from the last completed pass.
    pub ticker_stats: HashMap<String, TickerStats>,
}

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) gaps: Vec<GapEvent>,
    /// Enriched events keyed by id; presence means expanded.
    pub(crate) expanded: HashMap<GapId, GapEvent>,
    /// Ticket of the in-flight expansion per id.
    pub(crate) expanding: HashMap<GapId, u64>,
    pub(crate) next_ticket: u64,
    /// Bumped on every issued search.
    pub(crate) search_generation: u64,
    /// Generation of the search that produced the current list.
    pub(crate) list_generation: u64,
    pub(crate) in_flight: usize,
    pub(crate) error: Option<SurfacedError>,
    pub(crate) ticker_stats: HashMap<String, TickerStats>,
    /// Ticker set of the last completed stats pass over the current list.
    pub(crate) stats_tickers: Option<BTreeSet<String>>,
}

impl State {
    pub(crate) fn position(&self, id: GapId) -> Option<usize> {
        self.gaps.iter().position(|g| g.id == id)
    }

    pub(crate) fn expansion_state(&self, id: GapId) -> ExpansionState {
        if self.expanded.contains_key(&id) {
            ExpansionState::Expanded
        } else if self.expanding.contains_key(&id) {
            ExpansionState::Expanding
        } else {
            ExpansionState::Collapsed
        }
    }

    /// Replace the list wholesale, dropping all expansion state. The next stats
    /// pass rebuilds the mapping even when the ticker set is unchanged.
    pub(crate) fn replace_list(&mut self, gaps: Vec<GapEvent>, generation: u64) {
        self.gaps = gaps;
        self.expanded.clear();
        self.expanding.clear();
        self.list_generation = generation;
        self.stats_tickers = None;
    }

    /// Unique tickers in first-seen order. Rows without a ticker are skipped.
    pub(crate) fn unique_tickers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.gaps
            .iter()
            .filter_map(GapEvent::ticker_str)
            .filter(|t| seen.insert(*t))
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn snapshot(&self) -> GapScopeSnapshot {
        GapScopeSnapshot {
            gaps: self.gaps.clone(),
            expanded: self
                .gaps
                .iter()
                .map(|g| g.id)
                .filter(|id| self.expanded.contains_key(id))
                .collect(),
            states: self
                .gaps
                .iter()
                .map(|g| (g.id, self.expansion_state(g.id)))
                .collect(),
            loading: self.in_flight > 0,
            error: self.error.clone(),
            ticker_stats: self.ticker_stats.clone(),
        }
    }
}

/// Turn backend rows into listed events: sorted by gap size, largest first, with
/// fresh distinct ids.
///
/// A null gap size sorts as zero; ties keep response order. Rows that already
/// carry both series are ingested enriched; rows carrying only one carry neither.
pub(crate) fn ingest_rows(rows: &[GapRow]) -> Vec<GapEvent> {
    let mut ids = HashSet::with_capacity(rows.len());
    let mut events: Vec<GapEvent> = rows
        .iter()
        .map(|row| {
            let mut id = GapId::new();
            while !ids.insert(id) {
                id = GapId::new();
            }
            let mut event = GapEvent::from_row(id, row);
            if let (Some(daily), Some(intraday)) = (&row.daily_data, &row.intraday_data) {
                event.series = Some(GapSeries {
                    daily_data: normalize_daily(daily),
                    intraday_data: normalize_intraday(intraday),
                });
            }
            event
        })
        .collect();
    events.sort_by(|a, b| {
        b.gap_percent
            .unwrap_or(0.0)
            .total_cmp(&a.gap_percent.unwrap_or(0.0))
    });
    events
}
