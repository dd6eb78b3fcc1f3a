//! Chart views: each owns one drawing surface and rebuilds it, disposing the
//! previous one first, whenever its data, options or measured size change.

use std::sync::Arc;

use gapscope_core::chart::DailyChartModel;
use gapscope_core::intraday::IntradaySeries;
use gapscope_core::{
    ChartKind, ChartOptions, ChartSize, ChartSlot, DailyBar, GapError, GapEvent, IntradayOptions,
    IntradayPoint, SurfaceFactory, build_daily_chart, build_intraday_series,
};

/// Fixed chart height in pixels.
pub const CHART_HEIGHT: u32 = 400;
/// Horizontal space the daily chart leaves inside its container.
pub const DAILY_WIDTH_INSET: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
struct DailyInputs {
    bars: Vec<DailyBar>,
    gap_date: Option<String>,
    options: ChartOptions,
    size: ChartSize,
}

/// Candlestick view of one gap's daily bars.
#[derive(Debug)]
pub struct DailyChartView {
    slot: ChartSlot,
    inputs: DailyInputs,
    rendered: Option<DailyInputs>,
    model: Option<DailyChartModel>,
}

impl DailyChartView {
    /// Empty view; nothing is drawn until data and a size are set.
    #[must_use]
    pub fn new(factory: Arc<dyn SurfaceFactory>, options: ChartOptions) -> Self {
        Self {
            slot: ChartSlot::new(factory),
            inputs: DailyInputs {
                bars: Vec::new(),
                gap_date: None,
                options,
                size: ChartSize::default(),
            },
            rendered: None,
            model: None,
        }
    }

    /// Show an event's daily bars; an event without series clears the view.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the current options are invalid.
    pub fn show_gap(&mut self, gap: &GapEvent) -> Result<bool, GapError> {
        let bars = gap.daily_data().map(<[DailyBar]>::to_vec).unwrap_or_default();
        self.set_data(bars, gap.date_str().map(str::to_string))
    }

    /// Replace the bars and gap day. Returns whether the surface was rebuilt.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the current options are invalid.
    pub fn set_data(&mut self, bars: Vec<DailyBar>, gap_date: Option<String>) -> Result<bool, GapError> {
        self.inputs.bars = bars;
        self.inputs.gap_date = gap_date;
        self.sync()
    }

    /// Replace the chart options. Returns whether the surface was rebuilt.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `options` are invalid; the view keeps its
    /// current options and surface.
    pub fn set_options(&mut self, options: ChartOptions) -> Result<bool, GapError> {
        options.validate()?;
        self.inputs.options = options;
        self.sync()
    }

    /// Re-measure against the container width. Returns whether the surface was rebuilt.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the current options are invalid.
    pub fn resize(&mut self, container_width: u32) -> Result<bool, GapError> {
        self.inputs.size = ChartSize {
            width: container_width.saturating_sub(DAILY_WIDTH_INSET),
            height: CHART_HEIGHT,
        };
        self.sync()
    }

    /// Measured drawing size.
    #[must_use]
    pub const fn size(&self) -> ChartSize {
        self.inputs.size
    }

    /// Model last drawn, if any.
    #[must_use]
    pub const fn model(&self) -> Option<&DailyChartModel> {
        self.model.as_ref()
    }

    /// Whether a surface is currently alive.
    #[must_use]
    pub const fn has_surface(&self) -> bool {
        self.slot.is_occupied()
    }

    fn sync(&mut self) -> Result<bool, GapError> {
        if self.rendered.as_ref() == Some(&self.inputs) {
            return Ok(false);
        }
        let inputs = &self.inputs;
        let model = build_daily_chart(&inputs.bars, inputs.gap_date.as_deref(), &inputs.options)?;
        match model.as_ref().filter(|_| inputs.size.is_drawable()) {
            Some(m) => self.slot.replace_with(ChartKind::Daily, inputs.size).draw_daily(m),
            None => self.slot.release(),
        }
        self.model = model;
        self.rendered = Some(self.inputs.clone());
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IntradayInputs {
    points: Vec<IntradayPoint>,
    options: IntradayOptions,
    size: ChartSize,
}

/// Line view of one gap's intraday closes.
#[derive(Debug)]
pub struct IntradayChartView {
    slot: ChartSlot,
    inputs: IntradayInputs,
    rendered: Option<IntradayInputs>,
    series: Option<IntradaySeries>,
}

impl IntradayChartView {
    /// Empty view; nothing is drawn until data and a size are set.
    #[must_use]
    pub fn new(factory: Arc<dyn SurfaceFactory>, options: IntradayOptions) -> Self {
        Self {
            slot: ChartSlot::new(factory),
            inputs: IntradayInputs {
                points: Vec::new(),
                options,
                size: ChartSize::default(),
            },
            rendered: None,
            series: None,
        }
    }

    /// Show an event's intraday points; an event without series clears the view.
    pub fn show_gap(&mut self, gap: &GapEvent) -> bool {
        let points = gap
            .intraday_data()
            .map(<[IntradayPoint]>::to_vec)
            .unwrap_or_default();
        self.set_data(points)
    }

    /// Replace the points. Returns whether the surface was rebuilt.
    pub fn set_data(&mut self, points: Vec<IntradayPoint>) -> bool {
        self.inputs.points = points;
        self.sync()
    }

    /// Replace the display options. Returns whether the surface was rebuilt.
    pub fn set_options(&mut self, options: IntradayOptions) -> bool {
        self.inputs.options = options;
        self.sync()
    }

    /// Re-measure against the container width. Returns whether the surface was rebuilt.
    pub fn resize(&mut self, container_width: u32) -> bool {
        self.inputs.size = ChartSize {
            width: container_width,
            height: CHART_HEIGHT,
        };
        self.sync()
    }

    /// Measured drawing size.
    #[must_use]
    pub const fn size(&self) -> ChartSize {
        self.inputs.size
    }

    /// Series last drawn, if any.
    #[must_use]
    pub const fn series(&self) -> Option<&IntradaySeries> {
        self.series.as_ref()
    }

    /// Whether a surface is currently alive.
    #[must_use]
    pub const fn has_surface(&self) -> bool {
        self.slot.is_occupied()
    }

    fn sync(&mut self) -> bool {
        if self.rendered.as_ref() == Some(&self.inputs) {
            return false;
        }
        let series = build_intraday_series(&self.inputs.points, &self.inputs.options);
        if series.is_empty() || !self.inputs.size.is_drawable() {
            self.slot.release();
        } else {
            self.slot
                .replace_with(ChartKind::Intraday, self.inputs.size)
                .draw_intraday(&series);
        }
        self.series = (!series.is_empty()).then_some(series);
        self.rendered = Some(self.inputs.clone());
        true
    }
}
