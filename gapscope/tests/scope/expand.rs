use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use gapscope::{
    DailyWindow, EXPANSION_FAILED, ErrorScope, ExpansionState, GAP_DATE_INVALID,
    GAP_LACKS_FIELDS, GapError, GapId, GapScope, SearchParams,
};
use gapscope_core::GapRow;
use gapscope_mock::{DynamicMockConnector, DynamicMockController, MockBehavior};

use crate::helpers::*;

async fn listed(rows: Vec<GapRow>) -> (GapScope, DynamicMockController) {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_gap_stats_behavior(MockBehavior::Return(rows))
        .await;
    controller
        .set_daily_behavior(AAA, MockBehavior::Return(daily_bars()))
        .await;
    controller
        .set_intraday_behavior(AAA, MockBehavior::Return(intraday_points()))
        .await;
    let scope = scope_without_auto_stats(mock);
    scope.search(SearchParams::new()).await.unwrap();
    (scope, controller)
}

async fn first_id(scope: &GapScope) -> GapId {
    scope.gaps().await[0].id
}

#[tokio::test]
async fn first_expansion_fetches_both_series_once() {
    let (scope, controller) = listed(vec![row(AAA, 10.0)]).await;
    let id = first_id(&scope).await;

    assert_eq!(scope.toggle_expand(id).await.unwrap(), ExpansionState::Expanded);
    assert_eq!(controller.daily_requests().await.len(), 1);
    assert_eq!(controller.intraday_requests().await.len(), 1);

    let gap = scope.expanded_gap(id).await.expect("expanded");
    assert_eq!(gap.daily_data().map(<[_]>::len), Some(1));
    assert_eq!(gap.intraday_data().map(<[_]>::len), Some(2));
    assert!(scope.gaps().await[0].is_enriched());

    assert_eq!(scope.toggle_expand(id).await.unwrap(), ExpansionState::Collapsed);
    assert_eq!(scope.expanded_gap(id).await, None);
    assert_eq!(scope.toggle_expand(id).await.unwrap(), ExpansionState::Expanded);
    assert_eq!(controller.daily_requests().await.len(), 1);
    assert_eq!(controller.intraday_requests().await.len(), 1);
}

#[tokio::test]
async fn requests_cover_the_gap_day_and_configured_window() {
    let (scope, controller) = listed(vec![row(AAA, 10.0)]).await;
    scope.toggle_expand(first_id(&scope).await).await.unwrap();

    let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let daily = &controller.daily_requests().await[0];
    assert_eq!((daily.ticker.as_str(), daily.start_date, daily.end_date), (AAA, day, day));
    let intraday = &controller.intraday_requests().await[0];
    assert_eq!((intraday.ticker.as_str(), intraday.date), (AAA, day));

    let (mock, controller) = DynamicMockConnector::new_with_controller("P1");
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 1.0)]))
        .await;
    controller
        .set_daily_behavior(AAA, MockBehavior::Return(daily_bars()))
        .await;
    controller
        .set_intraday_behavior(AAA, MockBehavior::Return(intraday_points()))
        .await;
    let windowed = GapScope::builder()
        .with_connector(mock)
        .refresh_stats_after_search(false)
        .daily_window(DailyWindow {
            before_days: 7,
            after_days: 7,
        })
        .build()
        .unwrap();
    windowed.search(SearchParams::new()).await.unwrap();
    windowed
        .toggle_expand(first_id(&windowed).await)
        .await
        .unwrap();
    let daily = &controller.daily_requests().await[0];
    assert_eq!(daily.start_date, NaiveDate::from_ymd_opt(2024, 2, 27).unwrap());
    assert_eq!(daily.end_date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
}

#[tokio::test]
async fn gaps_without_ticker_or_date_fail_without_requests() {
    let no_date = GapRow {
        date: None,
        ..row(AAA, 2.0)
    };
    let no_ticker = GapRow {
        ticker: None,
        ..row(AAA, 1.0)
    };
    let (scope, controller) = listed(vec![no_date, no_ticker]).await;

    for gap in scope.gaps().await {
        let err = scope.toggle_expand(gap.id).await.unwrap_err();
        assert!(matches!(err, GapError::Validation(_)));
        assert_eq!(
            scope.expansion_state(gap.id).await,
            Some(ExpansionState::Collapsed)
        );
        let surfaced = scope.error().await.expect("error surfaced");
        assert_eq!(surfaced.scope, ErrorScope::Expansion);
        assert_eq!(surfaced.message, GAP_LACKS_FIELDS);
    }
    assert!(controller.daily_requests().await.is_empty());
    assert!(controller.intraday_requests().await.is_empty());
}

#[tokio::test]
async fn malformed_dates_fail_without_requests() {
    let bad = GapRow {
        date: Some("03/05/2024".into()),
        ..row(AAA, 2.0)
    };
    let (scope, controller) = listed(vec![bad]).await;

    let err = scope
        .toggle_expand(first_id(&scope).await)
        .await
        .unwrap_err();
    assert!(matches!(err, GapError::Validation(_)));
    assert_eq!(scope.error().await.unwrap().message, GAP_DATE_INVALID);
    assert!(controller.daily_requests().await.is_empty());
}

#[tokio::test]
async fn request_failure_keeps_the_gap_collapsed_and_can_be_retried() {
    let (scope, controller) = listed(vec![row(AAA, 10.0)]).await;
    controller
        .set_intraday_behavior(AAA, MockBehavior::Fail(GapError::http("/intraday_data", 502)))
        .await;
    let id = first_id(&scope).await;

    let err = scope.toggle_expand(id).await.unwrap_err();
    assert!(matches!(err, GapError::Http { status: 502, .. }));
    assert_eq!(scope.expansion_state(id).await, Some(ExpansionState::Collapsed));
    assert!(!scope.gaps().await[0].is_enriched());
    let surfaced = scope.error().await.expect("error surfaced");
    assert_eq!(surfaced.scope, ErrorScope::Expansion);
    assert_eq!(surfaced.message, EXPANSION_FAILED);
    assert!(!scope.is_loading().await);

    controller
        .set_intraday_behavior(AAA, MockBehavior::Return(intraday_points()))
        .await;
    assert_eq!(scope.toggle_expand(id).await.unwrap(), ExpansionState::Expanded);
    assert_eq!(scope.error().await, None);
    assert_eq!(controller.daily_requests().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn collapsing_mid_flight_abandons_the_response() {
    let (scope, controller) = listed(vec![row(AAA, 10.0)]).await;
    controller
        .set_daily_behavior(
            AAA,
            MockBehavior::delayed(Duration::from_millis(100), daily_bars()),
        )
        .await;
    let scope = Arc::new(scope);
    let id = first_id(&scope).await;

    let pending = {
        let scope = Arc::clone(&scope);
        tokio::spawn(async move { scope.toggle_expand(id).await })
    };
    while controller.daily_requests().await.is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(scope.expansion_state(id).await, Some(ExpansionState::Expanding));
    assert!(scope.is_loading().await);

    assert_eq!(scope.toggle_expand(id).await.unwrap(), ExpansionState::Collapsed);
    assert_eq!(pending.await.unwrap().unwrap(), ExpansionState::Collapsed);

    assert_eq!(scope.expansion_state(id).await, Some(ExpansionState::Collapsed));
    assert!(!scope.gaps().await[0].is_enriched());
    assert!(!scope.is_loading().await);
}

#[tokio::test(start_paused = true)]
async fn stalled_backend_hits_the_request_timeout() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_gap_stats_behavior(MockBehavior::Return(vec![row(AAA, 1.0)]))
        .await;
    controller.set_daily_behavior(AAA, MockBehavior::Hang).await;
    controller
        .set_intraday_behavior(AAA, MockBehavior::Return(intraday_points()))
        .await;
    let scope = GapScope::builder()
        .with_connector(mock)
        .refresh_stats_after_search(false)
        .request_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    scope.search(SearchParams::new()).await.unwrap();

    let err = scope
        .toggle_expand(first_id(&scope).await)
        .await
        .unwrap_err();
    assert!(matches!(err, GapError::Timeout { .. }));
    assert_eq!(scope.error().await.unwrap().message, EXPANSION_FAILED);
}

#[tokio::test]
async fn unknown_ids_are_rejected() {
    let (scope, _controller) = listed(vec![row(AAA, 10.0)]).await;
    let err = scope.toggle_expand(GapId::new()).await.unwrap_err();
    assert!(matches!(err, GapError::InvalidArg(_)));
    assert_eq!(scope.error().await, None);
}

#[tokio::test]
async fn several_gaps_can_be_expanded_at_once() {
    let (scope, controller) = listed(vec![row(AAA, 10.0), row(AAA, 20.0)]).await;
    let ids: Vec<_> = scope.gaps().await.iter().map(|g| g.id).collect();
    for id in &ids {
        scope.toggle_expand(*id).await.unwrap();
    }
    assert_eq!(scope.snapshot().await.expanded, ids);
    assert_eq!(controller.daily_requests().await.len(), 2);
}
