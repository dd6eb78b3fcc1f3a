use gapscope::{GapScope, SearchParams};
use gapscope_demos::common::get_connector;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,gapscope=trace,gapscope_http=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let scope = GapScope::builder().with_connector(get_connector()?).build()?;

    scope.search(SearchParams::new()).await?;
    if let Some(first) = scope.gaps().await.first() {
        let _ = scope.toggle_expand(first.id).await;
    }

    Ok(())
}
