use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use gapscope::{ErrorScope, GapError, SEARCH_FAILED, SearchOutcome, SearchParams};
use gapscope_core::GapRow;
use gapscope_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::*;

#[tokio::test]
async fn results_are_sorted_by_gap_size_with_distinct_ids() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let mut unsized_row = row(CCC, 0.0);
    unsized_row.gap_percent = None;
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![
            row(AAA, 12.0),
            unsized_row,
            row(BBB, 55.5),
            row(AAA, -4.0),
        ]))
        .await;
    let scope = scope_without_auto_stats(mock);

    let out = scope.search(SearchParams::new()).await.unwrap();
    assert_eq!(out, SearchOutcome::Replaced { count: 4 });

    let gaps = scope.gaps().await;
    let order: Vec<_> = gaps.iter().map(|g| g.gap_percent).collect();
    assert_eq!(order, vec![Some(55.5), Some(12.0), None, Some(-4.0)]);
    let ids: HashSet<_> = gaps.iter().map(|g| g.id).collect();
    assert_eq!(ids.len(), 4);
    assert!(!scope.is_loading().await);
    assert_eq!(scope.error().await, None);
}

#[tokio::test]
async fn only_set_filters_reach_the_connector() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![]))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope
        .search(SearchParams::new().ticker("ABCD"))
        .await
        .unwrap();

    let reqs = controller.gap_stats_requests().await;
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].query_pairs(), vec![("ticker", "ABCD")]);
}

#[tokio::test]
async fn a_new_search_replaces_the_list_and_forgets_expansions() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 10.0)]))
        .await;
    controller
        .set_daily_behavior(AAA, MockBehavior::Return(daily_bars()))
        .await;
    controller
        .set_intraday_behavior(AAA, MockBehavior::Return(intraday_points()))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope.search(SearchParams::new()).await.unwrap();
    let first = scope.gaps().await[0].id;
    scope.toggle_expand(first).await.unwrap();

    scope.search(SearchParams::new()).await.unwrap();
    let gaps = scope.gaps().await;
    assert_eq!(gaps.len(), 1);
    assert_ne!(gaps[0].id, first);
    assert!(!gaps[0].is_enriched());
    assert_eq!(scope.expansion_state(first).await, None);
    assert!(scope.snapshot().await.expanded.is_empty());
}

#[tokio::test]
async fn failure_empties_the_list_and_surfaces_an_error() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 10.0)]))
        .await;
    controller
        .set_gap_stats_behavior(MockBehavior::Fail(GapError::http("/gap_stats", 500)))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope.search(SearchParams::new()).await.unwrap();
    assert_eq!(scope.gaps().await.len(), 1);

    let err = scope.search(SearchParams::new()).await.unwrap_err();
    assert!(matches!(err, GapError::Http { status: 500, .. }));
    assert!(scope.gaps().await.is_empty());
    let surfaced = scope.error().await.expect("error surfaced");
    assert_eq!(surfaced.scope, ErrorScope::Search);
    assert_eq!(surfaced.message, SEARCH_FAILED);
    assert!(!scope.is_loading().await);
}

#[tokio::test]
async fn a_successful_search_clears_a_previous_error() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_gap_stats_behavior(MockBehavior::Fail(GapError::transport("/gap_stats", "reset")))
        .await;
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 1.0)]))
        .await;
    let scope = scope_without_auto_stats(mock);

    assert!(scope.search(SearchParams::new()).await.is_err());
    assert!(scope.error().await.is_some());
    scope.search(SearchParams::new()).await.unwrap();
    assert_eq!(scope.error().await, None);
}

#[tokio::test(start_paused = true)]
async fn a_stale_response_does_not_overwrite_a_newer_one() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_gap_stats_behavior(MockBehavior::delayed(
            Duration::from_millis(100),
            vec![row(AAA, 1.0), row(AAA, 2.0)],
        ))
        .await;
    controller
        .push_gap_stats_behavior(MockBehavior::Return(vec![row(BBB, 3.0)]))
        .await;
    let scope = Arc::new(scope_without_auto_stats(mock));

    let slow = {
        let scope = Arc::clone(&scope);
        tokio::spawn(async move { scope.search(SearchParams::new().ticker(AAA)).await })
    };
    while controller.gap_stats_requests().await.is_empty() {
        tokio::task::yield_now().await;
    }
    assert!(scope.is_loading().await);

    let fresh = scope.search(SearchParams::new().ticker(BBB)).await.unwrap();
    assert_eq!(fresh, SearchOutcome::Replaced { count: 1 });

    let stale = slow.await.unwrap().unwrap();
    assert_eq!(stale, SearchOutcome::Superseded);

    let tickers: Vec<_> = scope
        .gaps()
        .await
        .into_iter()
        .filter_map(|g| g.ticker)
        .collect();
    assert_eq!(tickers, vec![BBB]);
    assert!(!scope.is_loading().await);
}

#[tokio::test]
async fn rows_carrying_both_series_arrive_expanded_ready() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let full = GapRow {
        daily_data: Some(daily_bars()),
        intraday_data: Some(intraday_points()),
        ..row(AAA, 5.0)
    };
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![full]))
        .await;
    let scope = scope_without_auto_stats(mock);

    scope.search(SearchParams::new()).await.unwrap();
    let id = scope.gaps().await[0].id;
    scope.toggle_expand(id).await.unwrap();
    assert!(controller.daily_requests().await.is_empty());
    assert!(controller.intraday_requests().await.is_empty());
}

#[tokio::test]
async fn snapshot_serializes_for_view_layers() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 10.0)]))
        .await;
    let scope = scope_without_auto_stats(mock);
    scope.search(SearchParams::new()).await.unwrap();

    let json = serde_json::to_value(scope.snapshot().await).unwrap();
    assert_eq!(json["gaps"][0]["ticker"], AAA);
    assert_eq!(json["loading"], false);
    assert!(json["error"].is_null());
    let id = json["gaps"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(json["states"][&id], "Collapsed");
}
