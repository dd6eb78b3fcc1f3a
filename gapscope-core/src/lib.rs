//! gapscope-core
//!
//! Connector traits and the chart-data pipeline shared across the gapscope
//! workspace.
//!
//! - `connector`: the `GapConnector` trait and its capability provider traits.
//! - `normalize`: raw backend payloads into canonical bars and points.
//! - `chart`: daily candles, VWAP/EMA overlays, gap marker and visible range.
//! - `intraday`: intraday closes in a fixed display timezone.
//! - `surface`: the drawing-surface contract and its owning slot.
//!
//! Everything here except the connector traits is synchronous and free of I/O.
#![warn(missing_docs)]

/// Daily chart derivation.
pub mod chart;
/// Connector capability traits and the primary `GapConnector` interface.
pub mod connector;
pub mod intraday;
pub mod normalize;
pub mod surface;

pub use chart::{DailyChartModel, VisibleRange, build_daily_chart};
pub use connector::{DailyBarsRequest, GapConnector, IntradayRequest, parse_gap_date};
pub use intraday::{IntradaySeries, build_intraday_series};
pub use normalize::{normalize_daily, normalize_intraday};
pub use surface::{ChartKind, ChartSize, ChartSlot, ChartSurface, SurfaceFactory};

pub use gapscope_types::*;
