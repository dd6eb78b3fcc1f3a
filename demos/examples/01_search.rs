use gapscope::{GapScope, SearchParams};
use gapscope_demos::common::{get_connector, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let scope = GapScope::builder()
        .with_connector(get_connector()?)
        .refresh_stats_after_search(false)
        .build()?;

    let params = SearchParams::new().date("2024-03-05");
    println!("Searching gaps on 2024-03-05...");
    let outcome = scope.search(params).await?;
    println!("{outcome:?}");

    println!("\n## Gaps (largest first):");
    println!("{:<8} | {:<10} | {:>8} | {:>8} | Red", "Ticker", "Date", "Gap %", "Ret %");
    println!("{:-<9}|{:-<12}|{:-<10}|{:-<10}|{:-<5}", "", "", "", "", "");
    for gap in scope.gaps().await {
        println!(
            "{:<8} | {:<10} | {:>8} | {:>8} | {}",
            gap.ticker.as_deref().unwrap_or("-"),
            gap.date.as_deref().unwrap_or("-"),
            gap.gap_percent.map(|g| format!("{g:.1}")).unwrap_or_default(),
            gap.return_percent.map(|r| format!("{r:.1}")).unwrap_or_default(),
            if gap.did_close_red { "yes" } else { "no" },
        );
    }

    Ok(())
}
