//! gapscope-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod bars;
mod capability;
mod config;
mod error;
mod gap;

pub use bars::{DailyBar, IntradayPoint, RawDailyBar, RawIntradayPoint};
pub use capability::Capability;
pub use config::{
    ChartOptions, DailyWindow, GapScopeConfig, Indicators, IntradayOptions, StatsFetchStrategy,
    TimeFormat,
};
pub use error::GapError;
pub use gap::{GapEvent, GapId, GapRow, GapSeries, SearchParams, TickerStats};
