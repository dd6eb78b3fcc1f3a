//! Daily chart derivation: candles, overlays, the gap marker and the visible range.
//!
//! Chart times are epoch seconds. In [`TimeFormat::Milliseconds`] mode a bar's
//! time comes from `t` (falling back to `date`); in [`TimeFormat::Date`] mode
//! from `date` read as midnight UTC (falling back to `t`). Bars with neither are
//! left out of the chart, and every series stays aligned with the bars kept.

/// Gap lookup and focus-window arithmetic.
pub mod focus;
/// Running VWAP and EMA.
pub mod indicators;

use serde::{Deserialize, Serialize};

use crate::normalize::day_start_millis;
use crate::{ChartOptions, DailyBar, GapError, Indicators, TimeFormat};

pub use focus::{focus_window, locate_gap};
pub use indicators::{ema, running_vwap, typical_price};

/// Text attached to the gap marker.
pub const GAP_MARKER_TEXT: &str = "Gap";

/// One OHLC candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Epoch seconds.
    pub time: i64,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

/// Direction of a bar, used to colour its volume column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `close > open`.
    Up,
    /// Everything else.
    Down,
}

/// One column of the volume histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBar {
    /// Epoch seconds.
    pub time: i64,
    /// Traded volume.
    pub value: f64,
    /// Direction of the underlying bar.
    pub direction: Direction,
}

/// One point of a line overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    /// Epoch seconds.
    pub time: i64,
    /// Series value.
    pub value: f64,
}

/// Where a marker sits relative to its bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerPosition {
    /// Above the bar's high.
    AboveBar,
    /// Below the bar's low.
    BelowBar,
}

/// Marker glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerShape {
    /// Arrow pointing down at the bar.
    ArrowDown,
    /// Arrow pointing up at the bar.
    ArrowUp,
}

/// Annotation placed on the gap bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapMarker {
    /// Epoch seconds of the gap bar.
    pub time: i64,
    /// Index of the gap bar within the chart's candles.
    pub index: usize,
    /// Label text.
    pub text: String,
    /// Placement.
    pub position: MarkerPosition,
    /// Glyph.
    pub shape: MarkerShape,
}

/// Range of bars the chart initially shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibleRange {
    /// Fit all bars.
    Full,
    /// Zoom to an inclusive window of bar indices.
    Focused {
        /// First visible index.
        from_index: usize,
        /// Last visible index.
        to_index: usize,
        /// Epoch seconds of the first visible bar.
        from_time: i64,
        /// Epoch seconds of the last visible bar.
        to_time: i64,
    },
}

/// Everything a drawing surface needs to render the daily chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChartModel {
    /// Candles in input order.
    pub candles: Vec<Candle>,
    /// Volume histogram, when enabled.
    pub volume: Option<Vec<VolumeBar>>,
    /// Running VWAP, when enabled. Bars before any volume has traded carry no point.
    pub vwap: Option<Vec<LinePoint>>,
    /// EMA of closes, when enabled.
    pub ema: Option<Vec<LinePoint>>,
    /// Gap annotation, when the gap day is among the bars.
    pub marker: Option<GapMarker>,
    /// Index of the gap bar, when found.
    pub gap_index: Option<usize>,
    /// Initial visible range.
    pub visible_range: VisibleRange,
}

/// Chart time in epoch seconds for a bar, per the configured time source.
#[must_use]
pub fn bar_time(bar: &DailyBar, format: TimeFormat) -> Option<i64> {
    let from_t = || bar.t;
    let from_date = || bar.date.as_deref().and_then(day_start_millis);
    let millis = match format {
        TimeFormat::Milliseconds => from_t().or_else(from_date),
        TimeFormat::Date => from_date().or_else(from_t),
    }?;
    Some(millis.div_euclid(1000))
}

/// Derive the daily chart model.
///
/// Returns `Ok(None)` when no bar has a usable time, meaning there is nothing to
/// draw. When `gap_date` is absent or matches no bar, the model has no marker
/// and shows the full range.
///
/// # Errors
/// Returns `InvalidArg` when `options` fail validation.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "gapscope::chart::build_daily",
        skip(bars, options),
        fields(bars = bars.len()),
    )
)]
pub fn build_daily_chart(
    bars: &[DailyBar],
    gap_date: Option<&str>,
    options: &ChartOptions,
) -> Result<Option<DailyChartModel>, GapError> {
    options.validate()?;

    let timed: Vec<(i64, &DailyBar)> = bars
        .iter()
        .filter_map(|b| bar_time(b, options.time_format).map(|t| (t, b)))
        .collect();
    if timed.is_empty() {
        return Ok(None);
    }

    let candles: Vec<Candle> = timed
        .iter()
        .map(|&(time, b)| Candle {
            time,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
        })
        .collect();

    let volume = options.indicators.contains(Indicators::VOLUME).then(|| {
        timed
            .iter()
            .map(|&(time, b)| VolumeBar {
                time,
                value: b.volume,
                direction: if b.close > b.open {
                    Direction::Up
                } else {
                    Direction::Down
                },
            })
            .collect()
    });

    let vwap = options.indicators.contains(Indicators::VWAP).then(|| {
        let kept: Vec<DailyBar> = timed.iter().map(|&(_, b)| b.clone()).collect();
        timed
            .iter()
            .zip(running_vwap(&kept))
            .filter_map(|(&(time, _), v)| v.map(|value| LinePoint { time, value }))
            .collect()
    });

    let ema_line = options.indicators.contains(Indicators::EMA).then(|| {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        candles
            .iter()
            .zip(ema(&closes, options.ema_period))
            .map(|(c, value)| LinePoint {
                time: c.time,
                value,
            })
            .collect()
    });

    let times: Vec<i64> = candles.iter().map(|c| c.time).collect();
    let gap_index = gap_date.and_then(|d| locate_gap(&times, d));

    let (marker, visible_range) = match gap_index {
        Some(index) => {
            let marker = GapMarker {
                time: times[index],
                index,
                text: GAP_MARKER_TEXT.to_string(),
                position: MarkerPosition::AboveBar,
                shape: MarkerShape::ArrowDown,
            };
            let range = if options.focus_on_gap {
                let (from_index, to_index) =
                    focus_window(index, times.len(), options.focus_radius);
                VisibleRange::Focused {
                    from_index,
                    to_index,
                    from_time: times[from_index],
                    to_time: times[to_index],
                }
            } else {
                VisibleRange::Full
            };
            (Some(marker), range)
        }
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                gap_date = gap_date.unwrap_or_default(),
                "gap date not found among daily bars; showing full range"
            );
            (None, VisibleRange::Full)
        }
    };

    Ok(Some(DailyChartModel {
        candles,
        volume,
        vwap,
        ema: ema_line,
        marker,
        gap_index,
        visible_range,
    }))
}
