//! Intraday line series in a fixed display timezone.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::chart::LinePoint;
use crate::{IntradayOptions, IntradayPoint};

/// One plotted intraday sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntradaySample {
    /// Absolute epoch seconds.
    pub time: i64,
    /// Wall-clock time in the series' zone.
    pub local: DateTime<Tz>,
    /// Close price.
    pub value: f64,
}

/// Ordered intraday series ready for a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntradaySeries {
    /// Zone applied to wall-clock times and tick labels.
    pub timezone: Tz,
    /// Samples in input order.
    pub samples: Vec<IntradaySample>,
}

impl IntradaySeries {
    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `{time, value}` pairs for the line series.
    #[must_use]
    pub fn line_points(&self) -> Vec<LinePoint> {
        self.samples
            .iter()
            .map(|s| LinePoint {
                time: s.time,
                value: s.value,
            })
            .collect()
    }

    /// Axis label for an epoch second in this series' zone.
    #[must_use]
    pub fn tick_label(&self, time: i64) -> Option<String> {
        tick_label(time, self.timezone)
    }
}

/// Convert intraday points into a line series.
///
/// Points without a timestamp or without a readable close are dropped. Order is
/// preserved as received.
#[must_use]
pub fn build_intraday_series(points: &[IntradayPoint], options: &IntradayOptions) -> IntradaySeries {
    let tz = options.timezone;
    let samples = points
        .iter()
        .filter_map(|p| {
            let Some(ms) = p.timestamp else {
                #[cfg(feature = "tracing")]
                tracing::debug!("dropping intraday point without timestamp");
                return None;
            };
            let Some(value) = p.close else {
                #[cfg(feature = "tracing")]
                tracing::debug!(ts = ms, "dropping intraday point without close");
                return None;
            };
            let local = tz.timestamp_millis_opt(ms).single()?;
            Some(IntradaySample {
                time: ms.div_euclid(1000),
                local,
                value,
            })
        })
        .collect();

    IntradaySeries {
        timezone: tz,
        samples,
    }
}

/// `HH:mm` wall-clock label for an epoch second in `tz`.
#[must_use]
pub fn tick_label(time: i64, tz: Tz) -> Option<String> {
    tz.timestamp_opt(time, 0)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
}
