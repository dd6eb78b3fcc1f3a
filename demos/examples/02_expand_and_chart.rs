use std::sync::Arc;

use gapscope::{
    DailyChartView, DailyWindow, GapScope, Indicators, IntradayChartView, SearchParams,
};
use gapscope_demos::common::{PrintSurfaceFactory, get_connector, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let scope = GapScope::builder()
        .with_connector(get_connector()?)
        .daily_window(DailyWindow {
            before_days: 21,
            after_days: 21,
        })
        .build()?;

    scope.search(SearchParams::new().ticker("ABCD")).await?;
    let Some(gap) = scope.gaps().await.into_iter().next() else {
        println!("no gaps found");
        return Ok(());
    };
    println!(
        "Expanding {} on {}...",
        gap.ticker.as_deref().unwrap_or("-"),
        gap.date.as_deref().unwrap_or("-")
    );
    let state = scope.toggle_expand(gap.id).await?;
    println!("state: {state:?}");
    let Some(expanded) = scope.expanded_gap(gap.id).await else {
        return Ok(());
    };

    let factory = Arc::new(PrintSurfaceFactory);
    let options = scope
        .config()
        .chart
        .with(Indicators::VOLUME | Indicators::VWAP | Indicators::EMA);
    let mut daily = DailyChartView::new(factory.clone(), options);
    daily.resize(1024)?;
    daily.show_gap(&expanded)?;

    let mut intraday = IntradayChartView::new(factory, scope.config().intraday);
    intraday.resize(1024);
    intraday.show_gap(&expanded);

    // A narrower container rebuilds both charts.
    daily.resize(640)?;
    intraday.resize(640);

    Ok(())
}
