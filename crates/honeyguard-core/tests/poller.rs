use std::sync::Arc;
use std::time::Duration;

use honeyguard_bus::{EventBus, Topic};
use honeyguard_client::{ApiClient, StubApi};
use honeyguard_core::{Dashboard, DashboardState, PollingConfig};
use honeyguard_schema::{
    BusMessage, ExtractedIntelligence, Interaction, IntelItem, IntelKind, ReportResult,
    StatsResponse, SuspicionLevel,
};
use tokio::sync::mpsc;
use tokio::time::timeout;

fn polling(stats_ms: u64, intel_ms: u64) -> PollingConfig {
    PollingConfig {
        stats_interval_ms: stats_ms,
        intel_interval_ms: intel_ms,
    }
}

fn threat_stats() -> StatsResponse {
    StatsResponse {
        interactions: Some(vec![Interaction {
            client_id: Some("scammer-0001".into()),
            scam_detected: true,
            suspicion_level: Some(SuspicionLevel::High),
            extracted_intelligence: Some(ExtractedIntelligence {
                upi_id: Some("abc@upi".into()),
                ..ExtractedIntelligence::default()
            }),
            ..Interaction::default()
        }]),
        turn_counts: Some([("scammer-0001".to_string(), 1)].into_iter().collect()),
    }
}

async fn next(rx: &mut mpsc::Receiver<BusMessage>) -> BusMessage {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for bus message")
        .expect("bus closed")
}

#[tokio::test]
async fn intel_fires_immediately_and_stats_waits_a_period() {
    let bus = EventBus::new(64);
    let mut stats_rx = bus.subscribe(Topic::StatsRefreshed).await;
    let mut intel_rx = bus.subscribe(Topic::IntelRefreshed).await;
    let stub = Arc::new(StubApi::offline().with_stats(threat_stats()));

    let dashboard = Dashboard::start(
        ApiClient::new(stub.clone()),
        bus.publisher(),
        &polling(60_000, 60_000),
    );

    let msg = next(&mut intel_rx).await;
    assert!(matches!(msg, BusMessage::IntelRefreshed { ref items, .. } if items.is_empty()));

    assert!(timeout(Duration::from_millis(200), stats_rx.recv()).await.is_err());
    assert_eq!(stub.stats_calls(), 0);

    dashboard.shutdown().await;
}

#[tokio::test]
async fn both_loops_keep_polling() {
    let bus = EventBus::new(64);
    let mut stats_rx = bus.subscribe(Topic::StatsRefreshed).await;
    let mut intel_rx = bus.subscribe(Topic::IntelRefreshed).await;
    let item = IntelItem {
        kind: IntelKind::Upi,
        value: "abc@upi".into(),
        source: "scammer-0001".into(),
    };
    let stub = Arc::new(
        StubApi::offline()
            .with_stats(threat_stats())
            .with_intel(vec![item.clone()]),
    );

    let dashboard = Dashboard::start(ApiClient::new(stub.clone()), bus.publisher(), &polling(30, 30));

    let mut state = DashboardState::new();
    for _ in 0..2 {
        state.apply(next(&mut stats_rx).await);
        state.apply(next(&mut intel_rx).await);
    }
    dashboard.shutdown().await;

    assert_eq!(state.scammer_count(), 1);
    assert_eq!(state.upi_flagged_count(), 1);
    assert_eq!(state.intel(), &[item][..]);
    assert!(stub.stats_calls() >= 2);
    assert!(stub.intel_calls() >= 2);
}

#[tokio::test]
async fn unreachable_backend_publishes_fallbacks() {
    let bus = EventBus::new(64);
    let mut stats_rx = bus.subscribe(Topic::StatsRefreshed).await;
    let mut intel_rx = bus.subscribe(Topic::IntelRefreshed).await;

    let dashboard = Dashboard::start(
        ApiClient::new(Arc::new(StubApi::offline())),
        bus.publisher(),
        &polling(20, 20),
    );

    let mut state = DashboardState::new();
    match next(&mut stats_rx).await {
        BusMessage::StatsRefreshed { stats, at } => {
            assert_eq!(stats, StatsResponse::empty());
            state.apply(BusMessage::StatsRefreshed { stats, at });
        }
        other => panic!("unexpected message {other:?}"),
    }
    state.apply(next(&mut intel_rx).await);
    dashboard.shutdown().await;

    assert_eq!(state.scammer_count(), 0);
    assert_eq!(state.upi_flagged_count(), 0);
    assert!(state.intel().is_empty());
}

#[tokio::test]
async fn nothing_is_published_after_shutdown() {
    let bus = EventBus::new(256);
    let mut stats_rx = bus.subscribe(Topic::StatsRefreshed).await;
    let mut intel_rx = bus.subscribe(Topic::IntelRefreshed).await;
    let stub = Arc::new(StubApi::offline().with_stats(threat_stats()));

    let dashboard = Dashboard::start(ApiClient::new(stub.clone()), bus.publisher(), &polling(10, 10));
    next(&mut stats_rx).await;
    dashboard.shutdown().await;

    while stats_rx.try_recv().is_ok() {}
    while intel_rx.try_recv().is_ok() {}
    let calls = (stub.stats_calls(), stub.intel_calls());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(stats_rx.try_recv().is_err());
    assert!(intel_rx.try_recv().is_err());
    assert_eq!((stub.stats_calls(), stub.intel_calls()), calls);
}

#[tokio::test]
async fn shutdown_aborts_in_flight_requests() {
    let bus = EventBus::new(64);
    let mut intel_rx = bus.subscribe(Topic::IntelRefreshed).await;
    let stub = Arc::new(
        StubApi::offline()
            .with_intel(vec![])
            .with_latency(Duration::from_secs(30)),
    );

    let dashboard = Dashboard::start(ApiClient::new(stub.clone()), bus.publisher(), &polling(10, 10));
    while stub.intel_calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    timeout(Duration::from_secs(2), dashboard.shutdown())
        .await
        .expect("shutdown should not wait for the slow backend");
    assert!(intel_rx.try_recv().is_err());
}

#[tokio::test]
async fn report_result_is_published() {
    let bus = EventBus::new(16);
    let mut report_rx = bus.subscribe(Topic::ReportCompleted).await;
    let success = ReportResult {
        status: "success".into(),
        message: "Reported 1 UPI IDs to NPCI.".into(),
    };
    let stub = Arc::new(StubApi::offline().with_report(success.clone()));
    let dashboard = Dashboard::start(ApiClient::new(stub.clone()), bus.publisher(), &polling(60_000, 60_000));

    let mut state = DashboardState::new();
    assert!(state.begin_report());
    dashboard.request_report();
    state.apply(next(&mut report_rx).await);

    assert_eq!(state.alert(), Some(&success));
    assert!(state.is_reporting());
    assert_eq!(state.acknowledge_alert(), Some(success));
    assert!(!state.is_reporting());
    assert_eq!(stub.report_calls(), 1);

    dashboard.shutdown().await;
}

#[tokio::test]
async fn offline_report_publishes_npci_failure() {
    let bus = EventBus::new(16);
    let mut report_rx = bus.subscribe(Topic::ReportCompleted).await;
    let dashboard = Dashboard::start(
        ApiClient::new(Arc::new(StubApi::offline())),
        bus.publisher(),
        &polling(60_000, 60_000),
    );

    dashboard.request_report();
    match next(&mut report_rx).await {
        BusMessage::ReportCompleted { result, .. } => {
            assert_eq!(result, ReportResult::failed());
            assert_eq!(result.message, "Failed to connect to NPCI.");
        }
        other => panic!("unexpected message {other:?}"),
    }

    dashboard.shutdown().await;
}
