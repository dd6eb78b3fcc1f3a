//! Drawing-surface contract.
//!
//! The rendering engine is external. A view owns at most one surface at a time
//! through a [`ChartSlot`], which always disposes the previous surface before
//! asking the factory for the next one and disposes whatever it holds on drop.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chart::DailyChartModel;
use crate::intraday::IntradaySeries;

/// Measured drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChartSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ChartSize {
    /// A zero-width area draws nothing.
    #[must_use]
    pub const fn is_drawable(&self) -> bool {
        self.width > 0
    }
}

/// Which chart a surface renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    /// Candlestick chart of daily bars.
    Daily,
    /// Line chart of intraday closes.
    Intraday,
}

/// A live drawing surface created by the rendering engine.
pub trait ChartSurface: Send {
    /// Render the daily chart.
    fn draw_daily(&mut self, model: &DailyChartModel);

    /// Render the intraday chart.
    fn draw_intraday(&mut self, series: &IntradaySeries);

    /// Release the surface and any listeners attached to it.
    fn dispose(&mut self);
}

/// Creates drawing surfaces.
pub trait SurfaceFactory: Send + Sync {
    /// Create a surface of the given kind and size.
    fn create(&self, kind: ChartKind, size: ChartSize) -> Box<dyn ChartSurface>;
}

/// Exclusive owner of at most one surface.
pub struct ChartSlot {
    factory: Arc<dyn SurfaceFactory>,
    surface: Option<Box<dyn ChartSurface>>,
}

impl std::fmt::Debug for ChartSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSlot")
            .field("occupied", &self.surface.is_some())
            .finish()
    }
}

impl ChartSlot {
    /// Empty slot backed by `factory`.
    #[must_use]
    pub fn new(factory: Arc<dyn SurfaceFactory>) -> Self {
        Self {
            factory,
            surface: None,
        }
    }

    /// Whether a surface is currently held.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.surface.is_some()
    }

    /// Dispose the current surface, then create and hold a fresh one.
    pub fn replace_with(&mut self, kind: ChartKind, size: ChartSize) -> &mut dyn ChartSurface {
        self.release();
        self.surface.insert(self.factory.create(kind, size)).as_mut()
    }

    /// Dispose the current surface, if any.
    pub fn release(&mut self) {
        if let Some(mut s) = self.surface.take() {
            s.dispose();
        }
    }
}

impl Drop for ChartSlot {
    fn drop(&mut self) {
        self.release();
    }
}
