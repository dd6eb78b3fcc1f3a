use std::sync::Arc;

use gapscope_core::chart::DailyChartModel;
use gapscope_core::intraday::IntradaySeries;
use gapscope_core::{ChartKind, ChartSize, ChartSurface, GapConnector, SurfaceFactory};

/// Environment variable that switches demos to the fixture connector.
pub const USE_MOCK_ENV: &str = "GAPSCOPE_DEMOS_USE_MOCK";

/// Return a connector for demos.
///
/// Uses the fixture connector when [`USE_MOCK_ENV`] is set, otherwise the HTTP
/// backend at `GAPSCOPE_API_URL` (or the local default).
///
/// # Errors
/// Returns an error if the configured backend URL is not a valid http(s) URL.
pub fn get_connector() -> Result<Arc<dyn GapConnector>, gapscope_core::GapError> {
    if std::env::var(USE_MOCK_ENV).is_ok() {
        println!("--- (Using Mock Connector) ---");
        Ok(Arc::new(gapscope_mock::MockConnector::new()))
    } else {
        Ok(Arc::new(gapscope_http::HttpConnector::from_env()?))
    }
}

/// Install a compact env-filtered subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}

/// Surface factory that prints what a chart surface would draw.
#[derive(Debug, Default)]
pub struct PrintSurfaceFactory;

struct PrintSurface {
    kind: ChartKind,
    size: ChartSize,
}

impl ChartSurface for PrintSurface {
    fn draw_daily(&mut self, model: &DailyChartModel) {
        println!(
            "[{:?} {}x{}] {} candles, gap marker: {}, range: {:?}",
            self.kind,
            self.size.width,
            self.size.height,
            model.candles.len(),
            model.marker.as_ref().map_or("none", |m| m.text.as_str()),
            model.visible_range,
        );
    }

    fn draw_intraday(&mut self, series: &IntradaySeries) {
        let first = series.samples.first();
        let last = series.samples.last();
        println!(
            "[{:?} {}x{}] {} points in {}, {} -> {}",
            self.kind,
            self.size.width,
            self.size.height,
            series.samples.len(),
            series.timezone,
            first.map(|s| s.local.format("%H:%M").to_string()).unwrap_or_default(),
            last.map(|s| s.local.format("%H:%M").to_string()).unwrap_or_default(),
        );
    }

    fn dispose(&mut self) {
        println!("[{:?}] disposed", self.kind);
    }
}

impl SurfaceFactory for PrintSurfaceFactory {
    fn create(&self, kind: ChartKind, size: ChartSize) -> Box<dyn ChartSurface> {
        Box::new(PrintSurface { kind, size })
    }
}
