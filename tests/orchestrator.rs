mod common;

use cheapmaps::{OrchestratorState, PlanError, RouteOrchestrator, WaypointKind};
use common::{labels, route_labels, FakeGeocoder, FakeRouter};
use std::sync::Arc;

fn europe() -> FakeGeocoder {
    FakeGeocoder::new()
        .with_place("Paris", 48.85, 2.35)
        .with_place("Berlin", 52.52, 13.40)
        .with_place("Prague", 50.08, 14.43)
        .located_at(52.0, 13.0)
}

#[tokio::test]
async fn my_location_is_resolved_by_ip_and_order_is_kept() {
    let geocoder = Arc::new(europe());
    let router = Arc::new(FakeRouter::with_alternatives(2));
    let mut orchestrator = RouteOrchestrator::new(geocoder.clone(), router.clone());

    let plan = orchestrator
        .plan(&labels(&["Paris", "my location", "Berlin"]))
        .await
        .unwrap();

    assert_eq!(orchestrator.state(), OrchestratorState::Routed);
    assert_eq!(
        router.calls(),
        vec![vec![(48.85, 2.35), (52.0, 13.0), (52.52, 13.40)]]
    );
    assert_eq!(geocoder.forward_calls(), ["Paris", "Berlin"]);
    assert_eq!(*geocoder.locate_calls.lock().unwrap(), 1);

    let kinds: Vec<_> = plan.waypoints.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        [WaypointKind::Start, WaypointKind::Stop, WaypointKind::End]
    );
    assert_eq!(plan.waypoints[1].label, "my location");
    assert_eq!(plan.waypoints[1].index, Some(1));
    assert_eq!(plan.stats.alternatives, 1);
}

#[tokio::test]
async fn unknown_waypoint_aborts_before_routing() {
    let geocoder = Arc::new(europe());
    let router = Arc::new(FakeRouter::with_alternatives(3));
    let mut orchestrator = RouteOrchestrator::new(geocoder.clone(), router.clone());

    let err = orchestrator
        .plan(&labels(&["Nowhere12345", "Berlin"]))
        .await
        .unwrap_err();

    match err {
        PlanError::UnknownWaypoint { label, source } => {
            assert_eq!(label, "Nowhere12345");
            assert!(source.is_not_found());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
    assert!(router.calls().is_empty());
    // Fail fast: the second label is never looked up.
    assert_eq!(geocoder.forward_calls(), ["Nowhere12345"]);
}

#[tokio::test]
async fn fewer_than_two_labels_is_rejected() {
    let mut orchestrator = RouteOrchestrator::new(
        Arc::new(europe()),
        Arc::new(FakeRouter::with_alternatives(1)),
    );
    let err = orchestrator.plan(&labels(&["Paris"])).await.unwrap_err();
    assert!(matches!(err, PlanError::InsufficientWaypoints { found: 1 }));
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn refused_route_returns_to_idle_and_drops_the_old_set() {
    let geocoder = Arc::new(europe());
    let mut routed =
        RouteOrchestrator::new(geocoder.clone(), Arc::new(FakeRouter::with_alternatives(2)));
    routed.plan(&labels(&["Paris", "Berlin"])).await.unwrap();
    assert!(routed.current().is_some());

    let mut refused = RouteOrchestrator::new(geocoder, Arc::new(FakeRouter::refusing()));
    let err = refused.plan(&labels(&["Paris", "Berlin"])).await.unwrap_err();
    assert!(matches!(err, PlanError::RouteNotFound { .. }));
    assert_eq!(refused.state(), OrchestratorState::Idle);
    assert!(refused.current().is_none());
}

#[tokio::test]
async fn failed_replan_discards_previous_routes() {
    let mut orchestrator = RouteOrchestrator::new(
        Arc::new(europe()),
        Arc::new(FakeRouter::with_alternatives(2)),
    );
    let first = orchestrator.plan(&labels(&["Paris", "Berlin"])).await.unwrap();
    assert!(orchestrator.plan(&labels(&["Paris", "Atlantis"])).await.is_err());

    assert!(orchestrator.current().is_none());
    assert_eq!(orchestrator.select(first.id, 1), None);
}

#[tokio::test]
async fn select_promotes_and_keeps_relative_order() {
    let mut orchestrator = RouteOrchestrator::new(
        Arc::new(europe()),
        Arc::new(FakeRouter::with_alternatives(4)),
    );
    let plan = orchestrator.plan(&labels(&["Paris", "Prague"])).await.unwrap();

    let stats = orchestrator.select(plan.id, 2).unwrap();
    let (_, routes) = orchestrator.current().unwrap();
    assert_eq!(route_labels(routes), ["alt-2", "alt-0", "alt-1", "alt-3"]);
    assert_eq!(stats.distance_meters, 30_000.0);
    assert_eq!(stats.alternatives, 3);
    assert_eq!(orchestrator.state(), OrchestratorState::Routed);

    // Out of range: nothing moves.
    assert_eq!(orchestrator.select(plan.id, 4), None);
    let (_, routes) = orchestrator.current().unwrap();
    assert_eq!(route_labels(routes), ["alt-2", "alt-0", "alt-1", "alt-3"]);
}

#[tokio::test]
async fn selection_for_a_replaced_route_set_is_ignored() {
    let mut orchestrator = RouteOrchestrator::new(
        Arc::new(europe()),
        Arc::new(FakeRouter::with_alternatives(3)),
    );
    let first = orchestrator.plan(&labels(&["Paris", "Berlin"])).await.unwrap();
    let second = orchestrator.plan(&labels(&["Berlin", "Prague"])).await.unwrap();
    assert_ne!(first.id, second.id);

    assert_eq!(orchestrator.select(first.id, 1), None);
    let (live, routes) = orchestrator.current().unwrap();
    assert_eq!(live, second.id);
    assert_eq!(route_labels(routes), ["alt-0", "alt-1", "alt-2"]);

    assert!(orchestrator.select(second.id, 1).is_some());
}

#[tokio::test]
async fn select_before_any_plan_is_ignored() {
    let mut orchestrator = RouteOrchestrator::new(
        Arc::new(europe()),
        Arc::new(FakeRouter::with_alternatives(3)),
    );
    assert_eq!(orchestrator.select(cheapmaps::RouteSetId(1), 0), None);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}
