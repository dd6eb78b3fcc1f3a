use gapscope::{GapScope, SearchParams, StatsFetchStrategy};
use gapscope_demos::common::{get_connector, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let scope = GapScope::builder()
        .with_connector(get_connector()?)
        .refresh_stats_after_search(false)
        .stats_strategy(StatsFetchStrategy::Concurrent { limit: 4 })
        .build()?;

    scope.search(SearchParams::new()).await?;
    let refresh = scope.refresh_ticker_stats().await?;
    println!("{refresh:?}");

    let mut stats: Vec<_> = scope.ticker_stats().await.into_iter().collect();
    stats.sort_by(|a, b| a.0.cmp(&b.0));

    println!("\n## Ticker stats:");
    println!("{:<8} | {:>10} | {:>14}", "Ticker", "Total gaps", "Close red %");
    println!("{:-<9}|{:-<12}|{:-<15}", "", "", "");
    for (ticker, s) in stats {
        println!(
            "{:<8} | {:>10} | {:>13.1}%",
            ticker,
            s.total_gaps,
            s.chance_to_close_red * 100.0
        );
    }

    Ok(())
}
