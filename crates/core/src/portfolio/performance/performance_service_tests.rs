use chrono::Duration;
use rust_decimal_macros::dec;
use std::sync::Arc;

use super::{PerformanceService, PerformanceServiceTrait, TimeWindow};
use crate::errors::Error;
use crate::portfolio::PortfolioError;
use crate::test_support::{days_before, fixed_now, snapshot_at, InMemorySnapshotRepository};

const USER: &str = "user-1";

fn service_with(snapshots: Vec<crate::portfolio::snapshot::PortfolioSnapshot>) -> PerformanceService {
    PerformanceService::new(Arc::new(InMemorySnapshotRepository::with_snapshots(snapshots)))
}

/// Snapshots 40 days, 10 days and 1 hour before `fixed_now()`.
fn three_point_history() -> PerformanceService {
    let now = fixed_now();
    service_with(vec![
        snapshot_at("snap-40d", USER, days_before(now, 40), dec!(1000)),
        snapshot_at("snap-10d", USER, days_before(now, 10), dec!(1200)),
        snapshot_at("snap-now", USER, now - Duration::hours(1), dec!(1500)),
    ])
}

#[tokio::test]
async fn test_week_and_month_pick_closest_before_cutoff() {
    let performance = three_point_history()
        .calculate_performance_at(USER, fixed_now())
        .await
        .unwrap();

    assert_eq!(performance.current_value_usd, dec!(1500));
    assert_eq!(performance.calculated_at, fixed_now());

    let week = performance.window(TimeWindow::Week).unwrap();
    assert!(week.has_data);
    assert_eq!(week.baseline_value_usd, Some(dec!(1200)));
    assert_eq!(week.absolute_pnl, Some(dec!(300)));
    assert_eq!(week.percentage_change, Some(dec!(25)));
    assert_eq!(week.baseline_date, Some(days_before(fixed_now(), 10)));

    let month = performance.window(TimeWindow::Month).unwrap();
    assert_eq!(month.baseline_value_usd, Some(dec!(1000)));
    assert_eq!(month.absolute_pnl, Some(dec!(500)));
    assert_eq!(month.percentage_change, Some(dec!(50)));
}

#[tokio::test]
async fn test_window_without_baseline_has_no_data() {
    let performance = three_point_history()
        .calculate_performance_at(USER, fixed_now())
        .await
        .unwrap();

    // Only the current snapshot is newer than 24h ago, and it sits after the cutoff.
    let day = performance.window(TimeWindow::Day).unwrap();
    assert!(!day.has_data);
    assert_eq!(day.absolute_pnl, None);
    assert_eq!(day.percentage_change, None);
    assert_eq!(day.baseline_value_usd, None);
    assert_eq!(day.baseline_date, None);
    assert_eq!(day.current_value_usd, dec!(1500));
}

#[tokio::test]
async fn test_windows_are_returned_in_fixed_order() {
    let performance = three_point_history()
        .calculate_performance_at(USER, fixed_now())
        .await
        .unwrap();

    let order: Vec<TimeWindow> = performance.windows.iter().map(|w| w.window).collect();
    assert_eq!(order, TimeWindow::ALL.to_vec());
}

#[tokio::test]
async fn test_snapshot_exactly_at_cutoff_is_a_baseline() {
    let now = fixed_now();
    let service = service_with(vec![
        snapshot_at("snap-a", USER, now - Duration::hours(24), dec!(80)),
        snapshot_at("snap-b", USER, now, dec!(100)),
    ]);

    let performance = service.calculate_performance_at(USER, now).await.unwrap();
    let day = performance.window(TimeWindow::Day).unwrap();
    assert!(day.has_data);
    assert_eq!(day.absolute_pnl, Some(dec!(20)));
    assert_eq!(day.percentage_change, Some(dec!(25)));
}

#[tokio::test]
async fn test_tied_timestamps_resolve_deterministically() {
    let now = fixed_now();
    let tied_at = days_before(now, 8);
    let service = service_with(vec![
        snapshot_at("snap-b", USER, tied_at, dec!(200)),
        snapshot_at("snap-a", USER, tied_at, dec!(100)),
        snapshot_at("snap-c", USER, now, dec!(300)),
    ]);

    let first = service.calculate_performance_at(USER, now).await.unwrap();
    for _ in 0..5 {
        let again = service.calculate_performance_at(USER, now).await.unwrap();
        assert_eq!(again, first);
    }

    // Highest id wins among equal timestamps.
    let week = first.window(TimeWindow::Week).unwrap();
    assert_eq!(week.baseline_value_usd, Some(dec!(200)));
}

#[tokio::test]
async fn test_zero_baseline_has_pnl_but_no_percentage() {
    let now = fixed_now();
    let service = service_with(vec![
        snapshot_at("snap-empty", USER, days_before(now, 31), dec!(0)),
        snapshot_at("snap-now", USER, now, dec!(42.10)),
    ]);

    let performance = service.calculate_performance_at(USER, now).await.unwrap();
    let month = performance.window(TimeWindow::Month).unwrap();
    assert!(month.has_data);
    assert_eq!(month.absolute_pnl, Some(dec!(42.10)));
    assert_eq!(month.percentage_change, None);
}

#[tokio::test]
async fn test_losses_are_negative() {
    let now = fixed_now();
    let service = service_with(vec![
        snapshot_at("snap-old", USER, days_before(now, 2), dec!(300)),
        snapshot_at("snap-now", USER, now, dec!(200)),
    ]);

    let performance = service.calculate_performance_at(USER, now).await.unwrap();
    let day = performance.window(TimeWindow::Day).unwrap();
    assert_eq!(day.absolute_pnl, Some(dec!(-100)));
    assert_eq!(day.percentage_change, Some(dec!(-33.33)));
}

#[tokio::test]
async fn test_other_users_snapshots_are_ignored() {
    let now = fixed_now();
    let service = service_with(vec![
        snapshot_at("snap-other", "user-2", days_before(now, 40), dec!(1)),
        snapshot_at("snap-now", USER, now, dec!(10)),
    ]);

    let performance = service.calculate_performance_at(USER, now).await.unwrap();
    assert!(performance.windows.iter().all(|w| !w.has_data));
}

#[tokio::test]
async fn test_no_snapshots_is_an_error() {
    let service = service_with(Vec::new());

    let err = service
        .calculate_performance_at(USER, fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Portfolio(PortfolioError::NoSnapshotData(ref user)) if user == USER
    ));
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let repository = Arc::new(InMemorySnapshotRepository::with_snapshots(vec![snapshot_at(
        "snap-now",
        USER,
        fixed_now(),
        dec!(10),
    )]));
    repository.set_unavailable(true);
    let service = PerformanceService::new(repository);

    let err = service
        .calculate_performance_at(USER, fixed_now())
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
}

#[tokio::test]
async fn test_json_shape() {
    let performance = three_point_history()
        .calculate_performance_at(USER, fixed_now())
        .await
        .unwrap();

    let json = serde_json::to_value(&performance).unwrap();
    assert_eq!(json["userId"], USER);
    assert_eq!(json["windows"][0]["window"], "24h");
    assert_eq!(json["windows"][1]["window"], "7d");
    assert_eq!(json["windows"][2]["window"], "30d");
    assert_eq!(json["windows"][0]["hasData"], false);
    assert!(json["windows"][0]["absolutePnl"].is_null());
    assert!(json["windows"][1]["percentageChange"].is_number());
}
