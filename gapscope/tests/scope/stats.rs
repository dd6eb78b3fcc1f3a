use std::sync::Arc;
use std::time::Duration;

use gapscope::{GapError, GapScope, SearchParams, StatsFetchStrategy, StatsRefresh};
use gapscope_core::GapRow;
use gapscope_mock::{DynamicMockConnector, DynamicMockController, MockBehavior};
use tokio::time::Instant;

use crate::helpers::*;

async fn mock_with_rows(
    rows: Vec<GapRow>,
) -> (Arc<dyn gapscope::GapConnector>, DynamicMockController) {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_gap_stats_behavior(MockBehavior::Return(rows))
        .await;
    (mock, controller)
}

#[tokio::test]
async fn each_unique_ticker_is_looked_up_once() {
    let (mock, controller) =
        mock_with_rows(vec![row(AAA, 3.0), row(BBB, 2.0), row(AAA, 1.0)]).await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(12, 0.75)))
        .await;
    controller
        .set_ticker_stats_behavior(BBB, MockBehavior::Return(stats(4, 0.25)))
        .await;
    let scope = scope_without_auto_stats(mock);
    scope.search(SearchParams::new()).await.unwrap();

    let out = scope.refresh_ticker_stats().await.unwrap();
    assert_eq!(
        out,
        StatsRefresh::Replaced {
            resolved: 2,
            failed: 0
        }
    );
    assert_eq!(controller.ticker_stats_requests().await, vec![AAA, BBB]);
    let map = scope.ticker_stats().await;
    assert_eq!(map.len(), 2);
    assert_eq!(map[AAA], stats(12, 0.75));
    assert_eq!(map[BBB], stats(4, 0.25));
}

#[tokio::test]
async fn failing_tickers_are_left_out() {
    let (mock, controller) = mock_with_rows(vec![row(AAA, 3.0), row(BBB, 2.0)]).await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(12, 0.75)))
        .await;
    controller
        .set_ticker_stats_behavior(BBB, MockBehavior::Fail(GapError::http("/ticker_stats", 404)))
        .await;
    let scope = scope_without_auto_stats(mock);
    scope.search(SearchParams::new()).await.unwrap();

    let out = scope.refresh_ticker_stats().await.unwrap();
    assert_eq!(
        out,
        StatsRefresh::Replaced {
            resolved: 1,
            failed: 1
        }
    );
    let map = scope.ticker_stats().await;
    assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![AAA.to_string()]);
    assert_eq!(scope.error().await, None);
}

#[tokio::test]
async fn repeated_refresh_on_the_same_list_sends_nothing() {
    let (mock, controller) = mock_with_rows(vec![row(AAA, 3.0), row(BBB, 2.0)]).await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(1, 1.0)))
        .await;
    controller
        .set_ticker_stats_behavior(BBB, MockBehavior::Return(stats(2, 0.5)))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope.search(SearchParams::new()).await.unwrap();
    scope.refresh_ticker_stats().await.unwrap();
    assert_eq!(
        scope.refresh_ticker_stats().await.unwrap(),
        StatsRefresh::Unchanged
    );
    assert_eq!(controller.ticker_stats_requests().await.len(), 2);
    assert_eq!(scope.ticker_stats().await.len(), 2);
}

#[tokio::test]
async fn every_new_list_rebuilds_the_mapping() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 3.0), row(BBB, 2.0)]))
        .await;
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(BBB, 9.0), row(AAA, 1.0)]))
        .await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(1, 1.0)))
        .await;
    controller
        .set_ticker_stats_behavior(BBB, MockBehavior::Return(stats(2, 0.5)))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope.search(SearchParams::new()).await.unwrap();
    scope.refresh_ticker_stats().await.unwrap();

    // Same tickers in a different order: still a new list.
    scope.search(SearchParams::new()).await.unwrap();
    assert_eq!(
        scope.refresh_ticker_stats().await.unwrap(),
        StatsRefresh::Replaced {
            resolved: 2,
            failed: 0
        }
    );
    assert_eq!(controller.ticker_stats_requests().await.len(), 4);
}

#[tokio::test]
async fn a_failed_ticker_is_retried_by_the_next_search() {
    let (mock, controller) = mock_with_rows(vec![row(AAA, 3.0), row(BBB, 2.0)]).await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(12, 0.75)))
        .await;
    controller
        .set_ticker_stats_behavior(BBB, MockBehavior::Fail(GapError::http("/ticker_stats", 503)))
        .await;
    let scope = scope(mock);

    scope.search(SearchParams::new()).await.unwrap();
    assert!(!scope.ticker_stats().await.contains_key(BBB));
    assert_eq!(
        scope.refresh_ticker_stats().await.unwrap(),
        StatsRefresh::Unchanged
    );

    controller
        .set_ticker_stats_behavior(BBB, MockBehavior::Return(stats(4, 0.25)))
        .await;
    scope.search(SearchParams::new()).await.unwrap();

    let map = scope.ticker_stats().await;
    assert_eq!(map.len(), 2);
    assert_eq!(map[BBB], stats(4, 0.25));
    assert_eq!(
        controller.ticker_stats_requests().await,
        vec![AAA, BBB, AAA, BBB]
    );
}

#[tokio::test]
async fn a_new_ticker_set_replaces_rather_than_merges() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 3.0)]))
        .await;
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(BBB, 3.0)]))
        .await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(1, 1.0)))
        .await;
    controller
        .set_ticker_stats_behavior(BBB, MockBehavior::Return(stats(2, 0.5)))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope.search(SearchParams::new()).await.unwrap();
    scope.refresh_ticker_stats().await.unwrap();
    scope.search(SearchParams::new()).await.unwrap();
    scope.refresh_ticker_stats().await.unwrap();

    let map = scope.ticker_stats().await;
    assert_eq!(map.len(), 1);
    assert!(map.contains_key(BBB));
}

#[tokio::test]
async fn an_empty_list_clears_the_mapping_without_requests() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 3.0)]))
        .await;
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![]))
        .await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(1, 1.0)))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope.search(SearchParams::new()).await.unwrap();
    scope.refresh_ticker_stats().await.unwrap();
    assert_eq!(scope.ticker_stats().await.len(), 1);

    scope.search(SearchParams::new()).await.unwrap();
    assert_eq!(
        scope.refresh_ticker_stats().await.unwrap(),
        StatsRefresh::Cleared
    );
    assert!(scope.ticker_stats().await.is_empty());
    assert_eq!(controller.ticker_stats_requests().await.len(), 1);
}

#[tokio::test]
async fn rows_without_a_ticker_are_not_looked_up() {
    let nameless = GapRow {
        ticker: None,
        ..row(AAA, 1.0)
    };
    let (mock, controller) = mock_with_rows(vec![nameless]).await;
    let scope = scope_without_auto_stats(mock);
    scope.search(SearchParams::new()).await.unwrap();

    assert_eq!(
        scope.refresh_ticker_stats().await.unwrap(),
        StatsRefresh::Cleared
    );
    assert!(controller.ticker_stats_requests().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn a_pass_overtaken_by_a_new_list_is_discarded() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 3.0)]))
        .await;
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(BBB, 3.0)]))
        .await;
    controller
        .set_ticker_stats_behavior(
            AAA,
            MockBehavior::delayed(Duration::from_millis(100), stats(1, 1.0)),
        )
        .await;
    let scope = Arc::new(scope_without_auto_stats(mock));
    scope.search(SearchParams::new()).await.unwrap();

    let pass = {
        let scope = Arc::clone(&scope);
        tokio::spawn(async move { scope.refresh_ticker_stats().await })
    };
    while controller.ticker_stats_requests().await.is_empty() {
        tokio::task::yield_now().await;
    }
    scope.search(SearchParams::new()).await.unwrap();

    assert_eq!(pass.await.unwrap().unwrap(), StatsRefresh::Discarded);
    assert!(scope.ticker_stats().await.is_empty());
}

async fn timed_pass(strategy: StatsFetchStrategy) -> Duration {
    let (mock, controller) =
        mock_with_rows(vec![row(AAA, 3.0), row(BBB, 2.0), row(CCC, 1.0)]).await;
    for ticker in [AAA, BBB, CCC] {
        controller
            .set_ticker_stats_behavior(
                ticker,
                MockBehavior::delayed(Duration::from_millis(100), stats(1, 0.0)),
            )
            .await;
    }
    let scope = GapScope::builder()
        .with_connector(mock)
        .refresh_stats_after_search(false)
        .stats_strategy(strategy)
        .build()
        .unwrap();
    scope.search(SearchParams::new()).await.unwrap();

    let started = Instant::now();
    let out = scope.refresh_ticker_stats().await.unwrap();
    assert_eq!(
        out,
        StatsRefresh::Replaced {
            resolved: 3,
            failed: 0
        }
    );
    started.elapsed()
}

#[tokio::test(start_paused = true)]
async fn sequential_lookups_run_one_at_a_time() {
    let elapsed = timed_pass(StatsFetchStrategy::Sequential).await;
    assert!(elapsed >= Duration::from_millis(300), "took {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn concurrent_lookups_overlap() {
    let elapsed = timed_pass(StatsFetchStrategy::Concurrent { limit: 3 }).await;
    assert!(elapsed < Duration::from_millis(200), "took {elapsed:?}");
}

#[tokio::test]
async fn search_runs_the_pass_when_configured() {
    let (mock, controller) = mock_with_rows(vec![row(AAA, 3.0)]).await;
    controller
        .set_ticker_stats_behavior(AAA, MockBehavior::Return(stats(12, 0.75)))
        .await;
    let scope = scope(mock);

    scope.search(SearchParams::new()).await.unwrap();
    assert_eq!(scope.ticker_stats().await[AAA], stats(12, 0.75));
}
