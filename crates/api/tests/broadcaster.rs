//! Integration tests for the readiness broadcaster.
//!
//! Exercises the broadcaster against a real store, query service, and
//! subscription manager -- no HTTP involved. Covers the
//! snapshot-before-broadcast ordering, the zero-subscriber fast path, and
//! event-driven fan-out through the bus.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use chrono::Duration as ChronoDuration;
use unitwatch_api::services::ReadinessService;
use unitwatch_api::ws::{readiness_message, ReadinessBroadcaster, ReadinessWsManager};
use unitwatch_core::assignment::{AssignmentStatus, UnitAssignment};
use unitwatch_core::unit::{Unit, UnitType};
use unitwatch_events::bus::{EVENT_ASSIGNMENT_CREATED, EVENT_EXPIRY_SCAN_COMPLETED};
use unitwatch_events::{AnalyticsSink, DomainEvent, EventBus, NoopAnalyticsSink};
use unitwatch_store::repositories::{AssignmentRepo, UnitRepo};
use unitwatch_store::Store;

struct Fixture {
    store: Arc<Store>,
    ws_manager: Arc<ReadinessWsManager>,
    readiness: Arc<ReadinessService>,
    broadcaster: ReadinessBroadcaster,
}

fn fixture() -> Fixture {
    let store = Arc::new(Store::new());
    let analytics: Arc<dyn AnalyticsSink> = Arc::new(NoopAnalyticsSink);
    let ws_manager = Arc::new(ReadinessWsManager::new());
    let readiness = Arc::new(ReadinessService::new(Arc::clone(&store), analytics));
    let broadcaster = ReadinessBroadcaster::new(Arc::clone(&ws_manager), Arc::clone(&readiness));
    Fixture {
        store,
        ws_manager,
        readiness,
        broadcaster,
    }
}

fn unit(id: &str, minimum_staff: u32) -> Unit {
    Unit {
        unit_id: id.into(),
        unit_name: format!("Unit {id}"),
        unit_type: UnitType::Engine,
        minimum_staff,
        required_certifications: vec![],
        station_id: None,
    }
}

fn current_assignment(id: &str, unit_id: &str, personnel_id: &str) -> UnitAssignment {
    let now = chrono::Utc::now();
    UnitAssignment {
        assignment_id: id.into(),
        unit_id: unit_id.into(),
        personnel_id: personnel_id.into(),
        shift_start: now - ChronoDuration::hours(1),
        shift_end: now + ChronoDuration::hours(7),
        assignment_status: AssignmentStatus::OnShift,
    }
}

fn parse_report(msg: &Message) -> serde_json::Value {
    match msg {
        Message::Text(text) => {
            let envelope: serde_json::Value =
                serde_json::from_str(text.as_str()).expect("valid JSON envelope");
            assert_eq!(envelope["type"], "unit_readiness");
            envelope["data"].clone()
        }
        other => panic!("Expected Text frame, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: broadcast with zero subscribers performs zero computations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_without_subscribers_computes_nothing() {
    let f = fixture();
    UnitRepo::put(&f.store, unit("u-1", 2)).await.unwrap();

    f.broadcaster.broadcast_unit("u-1").await;

    assert_eq!(f.readiness.computed_total(), 0);
}

// ---------------------------------------------------------------------------
// Test: broadcast with subscribers computes exactly one report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_computes_once_and_fans_out_identical_copies() {
    let f = fixture();
    UnitRepo::put(&f.store, unit("u-1", 2)).await.unwrap();

    let mut rx1 = f
        .ws_manager
        .add("conn-1".to_string(), "u-1".to_string(), None)
        .await;
    let mut rx2 = f
        .ws_manager
        .add("conn-2".to_string(), "u-1".to_string(), None)
        .await;

    f.broadcaster.broadcast_unit("u-1").await;

    assert_eq!(f.readiness.computed_total(), 1);

    let report1 = parse_report(&rx1.recv().await.expect("rx1 should receive"));
    let report2 = parse_report(&rx2.recv().await.expect("rx2 should receive"));
    assert_eq!(report1, report2);
    assert_eq!(report1["unit_id"], "u-1");
    assert_eq!(report1["staff_required"], 2);
}

// ---------------------------------------------------------------------------
// Test: attach snapshot is observed before any later broadcast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshot_precedes_subsequent_broadcast() {
    let f = fixture();
    UnitRepo::put(&f.store, unit("u-1", 3)).await.unwrap();

    // Attach the way the upgrade handler does: snapshot computed first,
    // then enqueued as part of registration.
    let snapshot = f.readiness.get_unit_readiness("u-1").await.unwrap();
    let mut rx = f
        .ws_manager
        .add(
            "conn-1".to_string(),
            "u-1".to_string(),
            Some(readiness_message(&snapshot)),
        )
        .await;

    // A mutation lands right after the attach: the unit gains a crew
    // member, and a broadcast fires.
    AssignmentRepo::put(&f.store, current_assignment("a-1", "u-1", "p-1"))
        .await
        .unwrap();
    f.broadcaster.broadcast_unit("u-1").await;

    let first = parse_report(&rx.recv().await.expect("snapshot should arrive"));
    assert_eq!(first["staff_present"], 0);

    let second = parse_report(&rx.recv().await.expect("broadcast should arrive"));
    assert_eq!(second["staff_present"], 1);
}

// ---------------------------------------------------------------------------
// Test: a dead subscriber never blocks delivery to the others
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dead_subscriber_is_pruned_and_others_still_receive() {
    let f = fixture();
    UnitRepo::put(&f.store, unit("u-1", 1)).await.unwrap();

    let rx_dead = f
        .ws_manager
        .add("conn-dead".to_string(), "u-1".to_string(), None)
        .await;
    let mut rx_live = f
        .ws_manager
        .add("conn-live".to_string(), "u-1".to_string(), None)
        .await;
    drop(rx_dead);

    f.broadcaster.broadcast_unit("u-1").await;

    let report = parse_report(&rx_live.recv().await.expect("live subscriber should receive"));
    assert_eq!(report["unit_id"], "u-1");
    assert_eq!(f.ws_manager.subscriber_count("u-1").await, 1);
}

// ---------------------------------------------------------------------------
// Test: broadcast for an unknown unit is dropped quietly
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_for_missing_unit_is_dropped() {
    let f = fixture();

    let mut rx = f
        .ws_manager
        .add("conn-1".to_string(), "u-ghost".to_string(), None)
        .await;

    f.broadcaster.broadcast_unit("u-ghost").await;

    assert!(rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: assignment.created events drive broadcasts through the bus
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assignment_created_event_triggers_broadcast() {
    let f = fixture();
    UnitRepo::put(&f.store, unit("u-1", 1)).await.unwrap();

    let mut rx = f
        .ws_manager
        .add("conn-1".to_string(), "u-1".to_string(), None)
        .await;

    let bus = EventBus::default();
    let run_handle = tokio::spawn(f.broadcaster.run(bus.subscribe()));

    bus.publish(DomainEvent::new(EVENT_ASSIGNMENT_CREATED).with_source("unit", "u-1".to_string()));

    let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("broadcast should arrive before timeout")
        .expect("channel should stay open");
    let report = parse_report(&msg);
    assert_eq!(report["unit_id"], "u-1");

    // Dropping the bus closes the channel and stops the run loop.
    drop(bus);
    tokio::time::timeout(Duration::from_secs(2), run_handle)
        .await
        .expect("run loop should exit after bus closes")
        .expect("run task should not panic");
}

// ---------------------------------------------------------------------------
// Test: expiry_scan.completed fans out to every affected unit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn expiry_scan_event_broadcasts_each_affected_unit() {
    let f = fixture();
    UnitRepo::put(&f.store, unit("u-1", 1)).await.unwrap();
    UnitRepo::put(&f.store, unit("u-2", 1)).await.unwrap();

    let mut rx1 = f
        .ws_manager
        .add("conn-1".to_string(), "u-1".to_string(), None)
        .await;
    let mut rx2 = f
        .ws_manager
        .add("conn-2".to_string(), "u-2".to_string(), None)
        .await;

    let bus = EventBus::default();
    let run_handle = tokio::spawn(f.broadcaster.run(bus.subscribe()));

    bus.publish(
        DomainEvent::new(EVENT_EXPIRY_SCAN_COMPLETED).with_payload(serde_json::json!({
            "affected_unit_ids": ["u-1", "u-2"],
        })),
    );

    let report1 = parse_report(
        &tokio::time::timeout(Duration::from_secs(2), rx1.recv())
            .await
            .expect("u-1 broadcast should arrive")
            .expect("channel should stay open"),
    );
    let report2 = parse_report(
        &tokio::time::timeout(Duration::from_secs(2), rx2.recv())
            .await
            .expect("u-2 broadcast should arrive")
            .expect("channel should stay open"),
    );

    assert_eq!(report1["unit_id"], "u-1");
    assert_eq!(report2["unit_id"], "u-2");

    drop(bus);
    let _ = tokio::time::timeout(Duration::from_secs(2), run_handle).await;
}
