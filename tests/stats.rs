mod common;

use common::{stats_body, unreachable_client, FakeBackend, Reply};
use payment_dashboard::chart::PaymentCategory;
use payment_dashboard::i18n::Locale;
use payment_dashboard::stats::{FetchOutcome, StatsController};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn fetch_derives_segments() {
    let backend = FakeBackend::start().await;
    let controller = StatsController::new(backend.client(), Locale::English);

    assert!(controller.reminders_disabled());
    assert_eq!(controller.fetch().await, FetchOutcome::Updated);

    let view = controller.view();
    assert_eq!(view.total_people, 10);
    assert!(!view.loading);
    assert!(view.error.is_none());
    assert!(view.last_updated.is_some());
    assert!(!view.reminders_disabled);

    let starts: Vec<_> = view
        .segments
        .iter()
        .map(|segment| (segment.category, segment.start_angle_degrees.round() as i64))
        .collect();
    assert_eq!(
        starts,
        vec![
            (PaymentCategory::PaidFull, -90),
            (PaymentCategory::PaidPartial, 126),
            (PaymentCategory::NotPaid, 234),
        ]
    );
    let legend: Vec<_> = view.legend.iter().map(|entry| entry.display.clone()).collect();
    assert_eq!(legend, vec!["60.0%", "30.0%", "10.0%"]);
}

#[tokio::test]
async fn failure_keeps_last_known_stats() {
    let backend = FakeBackend::start().await;
    let controller = StatsController::new(backend.client(), Locale::English);
    controller.fetch().await;

    backend.set_stats(Reply::new(
        404,
        json!({
            "error": "CSV file not found. Please upload one.",
            "total_people": 0, "paid_full": 0, "paid_partial": 0, "not_paid": 0
        }),
    ));
    assert_eq!(controller.fetch().await, FetchOutcome::Failed);

    let view = controller.view();
    assert_eq!(view.error.as_deref(), Some("CSV file not found. Please upload one."));
    assert_eq!(view.total_people, 10);
    assert_eq!(view.segments.len(), 3);
    assert!(!view.loading);

    backend.set_stats(Reply::new(200, stats_body(4, 4, 0, 0)));
    assert_eq!(controller.fetch().await, FetchOutcome::Updated);
    assert!(controller.error().is_none());
    assert_eq!(controller.segments().len(), 1);
}

#[tokio::test]
async fn message_field_wins_over_error_field() {
    let backend = FakeBackend::start().await;
    backend.set_stats(Reply::new(500, json!({ "message": "first", "error": "second" })));
    let controller = StatsController::new(backend.client(), Locale::English);

    controller.fetch().await;
    assert_eq!(controller.error().as_deref(), Some("first"));
    assert!(controller.stats().is_none());
}

#[tokio::test]
async fn failure_without_text_uses_fallback() {
    let backend = FakeBackend::start().await;
    backend.set_stats(Reply::new(500, json!({})));
    let controller = StatsController::new(backend.client(), Locale::Romanian);

    controller.fetch().await;
    assert_eq!(controller.error(), Some(Locale::Romanian.stats_failed()));
}

#[tokio::test]
async fn unreachable_server_sets_static_message() {
    let controller = StatsController::new(unreachable_client(), Locale::English);

    assert_eq!(controller.fetch().await, FetchOutcome::Failed);
    assert_eq!(controller.error(), Some(Locale::English.stats_unreachable()));
    assert!(!controller.is_loading());
    assert!(controller.reminders_disabled());
}

#[tokio::test]
async fn zero_people_disables_reminders_and_draws_nothing() {
    let backend = FakeBackend::start().await;
    backend.set_stats(Reply::new(200, stats_body(0, 0, 0, 0)));
    let controller = StatsController::new(backend.client(), Locale::English);

    controller.fetch().await;
    assert!(controller.stats().is_some());
    assert!(controller.segments().is_empty());
    assert!(controller.reminders_disabled());
}

#[tokio::test]
async fn stale_response_is_discarded() {
    let backend = FakeBackend::start().await;
    backend.queue_stats(
        Reply::new(200, stats_body(10, 10, 0, 0)).delayed(Duration::from_millis(300)),
    );
    backend.queue_stats(Reply::new(200, stats_body(20, 0, 0, 20)));
    let controller = Arc::new(StatsController::new(backend.client(), Locale::English));

    let slow = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.fetch().await }
    });
    common::eventually("first stats request", || backend.stats_hits() == 1).await;

    assert_eq!(controller.fetch().await, FetchOutcome::Updated);
    assert!(!controller.is_loading());
    assert_eq!(slow.await.expect("slow fetch"), FetchOutcome::Stale);

    let stats = controller.stats().expect("stats loaded");
    assert_eq!(stats.total_people, 20);
    assert_eq!(stats.not_paid, 20);
    assert_eq!(controller.segments()[0].category, PaymentCategory::NotPaid);
}

#[tokio::test]
async fn loading_stays_set_while_newest_fetch_is_in_flight() {
    let backend = FakeBackend::start().await;
    backend.queue_stats(Reply::new(200, stats_body(1, 1, 0, 0)));
    backend.queue_stats(
        Reply::new(200, stats_body(2, 1, 1, 0)).delayed(Duration::from_millis(300)),
    );
    let controller = Arc::new(StatsController::new(backend.client(), Locale::English));

    controller.fetch().await;
    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.fetch().await }
    });
    common::eventually("second stats request", || backend.stats_hits() == 2).await;
    assert!(controller.is_loading());

    assert_eq!(pending.await.expect("pending fetch"), FetchOutcome::Updated);
    assert!(!controller.is_loading());
    assert_eq!(controller.stats().map(|stats| stats.total_people), Some(2));
}
