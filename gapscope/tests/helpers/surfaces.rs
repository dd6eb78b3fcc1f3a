use std::sync::{Arc, Mutex};

use gapscope_core::chart::DailyChartModel;
use gapscope_core::intraday::IntradaySeries;
use gapscope_core::{ChartKind, ChartSize, ChartSurface, SurfaceFactory};

/// Everything the recording factory and its surfaces observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Create(usize, ChartKind, ChartSize),
    DrawDaily(usize, usize),
    DrawIntraday(usize, usize),
    Dispose(usize),
}

/// Surface factory that logs every call.
#[derive(Default)]
pub struct RecordingFactory {
    next: Mutex<usize>,
    log: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RecordingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }
}

struct RecordingSurface {
    id: usize,
    log: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl ChartSurface for RecordingSurface {
    fn draw_daily(&mut self, model: &DailyChartModel) {
        self.log
            .lock()
            .unwrap()
            .push(SurfaceEvent::DrawDaily(self.id, model.candles.len()));
    }

    fn draw_intraday(&mut self, series: &IntradaySeries) {
        self.log
            .lock()
            .unwrap()
            .push(SurfaceEvent::DrawIntraday(self.id, series.samples.len()));
    }

    fn dispose(&mut self) {
        self.log.lock().unwrap().push(SurfaceEvent::Dispose(self.id));
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create(&self, kind: ChartKind, size: ChartSize) -> Box<dyn ChartSurface> {
        let mut next = self.next.lock().unwrap();
        *next += 1;
        self.log
            .lock()
            .unwrap()
            .push(SurfaceEvent::Create(*next, kind, size));
        Box::new(RecordingSurface {
            id: *next,
            log: Arc::clone(&self.log),
        })
    }
}
