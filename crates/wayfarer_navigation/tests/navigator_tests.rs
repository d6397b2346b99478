use std::sync::Arc;

use wayfarer_core::{RouteModificationParams, RoutingProfile};
use wayfarer_navigation::{
    FixedLocationTracker, LocationError, LocationUpdate, ManualLocationTracker,
    ModificationOutcome, NavigationStateKind, NoticeLevel, RouteChoice, TransitionError,
};
use wayfarer_providers::RoutingError;

use crate::test_utils::{
    FakeIntentSource, FakeRoutingProvider, coordinate, default_origin, navigator, oakland, route,
};

mod test_utils;

/// Fixed at the default origin, so no fallback notice is queued.
fn located() -> Arc<FixedLocationTracker> {
    Arc::new(FixedLocationTracker::new(Some(default_origin())))
}

fn avoid_highways() -> Arc<FakeIntentSource> {
    Arc::new(FakeIntentSource::answering(
        RouteModificationParams::default().with_avoid("highway"),
        "Scenic backroads, avoiding highways",
    ))
}

#[tokio::test]
async fn test_destination_with_route_starts_navigating() {
    let routing = Arc::new(FakeRoutingProvider::default().with_route(Ok(route(10_000.0, 1200.0))));
    let navigator = navigator(
        Some(routing.clone()),
        avoid_highways(),
        Arc::new(FixedLocationTracker::unavailable()),
    );

    let kind = navigator.choose_destination(oakland()).await.unwrap();

    assert_eq!(kind, NavigationStateKind::Navigating);
    assert_eq!(navigator.take_notices()[0].level, NoticeLevel::Warning);
    let state = navigator.state();
    assert_eq!(state.destination(), Some(&oakland()));
    assert_eq!(state.active_route(), Some(&route(10_000.0, 1200.0)));
    assert!(!navigator.is_calculating_route());

    let calls = routing.route_calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].origin, default_origin());
    assert_eq!(calls[0].destination, oakland().coordinates);
}

#[tokio::test]
async fn test_modification_without_fix_uses_default_origin() {
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Ok(vec![route(13_000.0, 1500.0)])),
    );
    let navigator = navigator(
        Some(routing.clone()),
        avoid_highways(),
        Arc::new(FixedLocationTracker::unavailable()),
    );
    navigator.choose_destination(oakland()).await.unwrap();
    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);
    navigator.take_notices();

    let outcome = navigator.request_modification("scenic").await.unwrap();

    assert!(matches!(outcome, ModificationOutcome::Comparing { .. }));
    let calls = routing.alternatives_calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].origin, default_origin());

    let notices = navigator.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("default location"));
}

#[tokio::test]
async fn test_failed_route_returns_to_idle() {
    let routing = Arc::new(FakeRoutingProvider::default().with_route(Err(RoutingError::NoRoute)));
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );

    let kind = navigator.choose_destination(oakland()).await.unwrap();

    assert_eq!(kind, NavigationStateKind::Idle);
    assert!(navigator.state().destination().is_none());
    assert!(navigator.state().active_route().is_none());

    let notices = navigator.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("Oakland"));
    assert!(navigator.take_notices().is_empty());
}

#[tokio::test]
async fn test_modification_enters_comparison() {
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Ok(vec![
                route(10_500.0, 1250.0),
                route(12_000.0, 1200.0),
                route(12_100.0, 1210.0),
            ])),
    );
    let intent = avoid_highways();
    let navigator = navigator(
        Some(routing.clone()),
        intent.clone(),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();

    let outcome = navigator
        .request_modification("make it more scenic")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ModificationOutcome::Comparing {
            explanation: String::from("Scenic backroads, avoiding highways"),
            alternatives: 1,
        }
    );

    let state = navigator.state();
    assert_eq!(state.kind(), NavigationStateKind::ComparingRoutes);
    assert_eq!(
        state.candidate_routes(),
        &[route(10_000.0, 1200.0), route(12_000.0, 1200.0)]
    );
    assert_eq!(state.active_route(), Some(&route(10_000.0, 1200.0)));

    // The parsed params were sent to the provider, from the same origin
    let calls = routing.alternatives_calls.lock();
    assert!(calls[0].params.avoids("highway"));
    assert_eq!(calls[0].origin, routing.route_calls.lock()[0].origin);

    let contexts = intent.contexts.lock();
    assert_eq!(contexts[0].destination, oakland().coordinates);
    assert_eq!(
        contexts[0].current_params,
        Some(RouteModificationParams::default())
    );
}

#[tokio::test]
async fn test_reference_only_result_keeps_navigating() {
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Ok(vec![route(10_000.0, 1200.0), route(10_500.0, 1250.0)])),
    );
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();
    navigator.take_notices();

    let outcome = navigator.request_modification("scenic").await.unwrap();

    assert!(matches!(outcome, ModificationOutcome::NoAlternative { .. }));
    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);
    assert_eq!(
        navigator.state().active_route(),
        Some(&route(10_000.0, 1200.0))
    );
    assert!(navigator.state().candidate_routes().is_empty());

    let notices = navigator.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
}

#[tokio::test]
async fn test_failures_return_to_navigating() {
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Err(RoutingError::Api {
                status: 503,
                message: String::from("unavailable"),
            })),
    );
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();
    navigator.take_notices();

    let outcome = navigator.request_modification("scenic").await.unwrap();

    assert_eq!(outcome, ModificationOutcome::Failed);
    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);
    assert_eq!(
        navigator.state().active_route(),
        Some(&route(10_000.0, 1200.0))
    );
    let notices = navigator.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(!notices[0].message.contains("unavailable"));
}

#[tokio::test]
async fn test_too_many_waypoints_is_a_warning() {
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Err(RoutingError::TooManyWaypoints { count: 26, max: 25 })),
    );
    let navigator = navigator(Some(routing), avoid_highways(), located());
    navigator.choose_destination(oakland()).await.unwrap();
    navigator.take_notices();

    let outcome = navigator.request_modification("scenic").await.unwrap();

    assert_eq!(outcome, ModificationOutcome::Failed);
    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);
    let notices = navigator.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("23 stops"));
}

#[tokio::test]
async fn test_intent_failure_returns_to_navigating() {
    let routing = Arc::new(FakeRoutingProvider::default().with_route(Ok(route(10_000.0, 1200.0))));
    let navigator = navigator(
        Some(routing.clone()),
        Arc::new(FakeIntentSource::failing()),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();

    let outcome = navigator.request_modification("scenic").await.unwrap();

    assert_eq!(outcome, ModificationOutcome::Failed);
    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);
    assert!(routing.alternatives_calls.lock().is_empty());
}

#[tokio::test]
async fn test_confirm_candidate_and_keep_current() {
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Ok(vec![route(12_000.0, 1200.0)]))
            .with_alternatives(Ok(vec![route(8_000.0, 900.0)])),
    );
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();

    navigator.request_modification("scenic").await.unwrap();
    navigator.confirm(RouteChoice::KeepCurrent).unwrap();
    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);
    assert_eq!(
        navigator.state().active_route(),
        Some(&route(10_000.0, 1200.0))
    );

    navigator.request_modification("scenic").await.unwrap();
    navigator.select_candidate(1).unwrap();
    navigator.confirm(RouteChoice::Selected).unwrap();

    let state = navigator.state();
    assert_eq!(state.kind(), NavigationStateKind::Navigating);
    assert_eq!(state.active_route(), Some(&route(8_000.0, 900.0)));
    assert!(state.candidate_routes().is_empty());
    assert!(state.active().unwrap().params.avoids("highway"));
}

#[tokio::test]
async fn test_start_over() {
    let routing = Arc::new(FakeRoutingProvider::default().with_route(Ok(route(10_000.0, 1200.0))));
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();

    navigator.start_over().unwrap();

    let state = navigator.state();
    assert_eq!(state.kind(), NavigationStateKind::Idle);
    assert!(state.destination().is_none());
    assert!(state.active_route().is_none());
    assert!(state.selected_candidate_index().is_none());
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let routing = Arc::new(FakeRoutingProvider::default());
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );

    assert_eq!(
        navigator.request_modification("  ").await,
        Err(TransitionError::EmptyRequest)
    );
    assert!(matches!(
        navigator.request_modification("scenic").await,
        Err(TransitionError::InvalidTransition { .. })
    ));
    assert!(navigator.confirm(RouteChoice::KeepCurrent).is_err());
    assert_eq!(navigator.kind(), NavigationStateKind::Idle);
}

#[tokio::test]
async fn test_without_routing_provider() {
    let navigator = navigator(
        None,
        avoid_highways(),
        located(),
    );

    assert!(!navigator.is_routing_available());
    assert_eq!(
        navigator.banner().map(|notice| notice.level),
        Some(NoticeLevel::Persistent)
    );
    assert_eq!(
        navigator.choose_destination(oakland()).await,
        Err(TransitionError::RoutingUnavailable)
    );
    assert!(matches!(
        navigator.search_places("oakland").await,
        Err(RoutingError::NotConfigured(_))
    ));
}

#[tokio::test]
async fn test_live_fix_is_used_as_origin() {
    let here = coordinate(-122.41, 37.78);
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Ok(vec![route(12_000.0, 1200.0)])),
    );
    let navigator = navigator(
        Some(routing.clone()),
        avoid_highways(),
        Arc::new(FixedLocationTracker::new(Some(here))),
    );

    navigator.choose_destination(oakland()).await.unwrap();
    navigator.request_modification("scenic").await.unwrap();

    assert_eq!(routing.route_calls.lock()[0].origin, here);
    assert_eq!(routing.alternatives_calls.lock()[0].origin, here);
    assert_eq!(navigator.position(), Some(here));
}

#[tokio::test]
async fn test_location_watch_follows_navigation() {
    let tracker = Arc::new(ManualLocationTracker::new());
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Ok(vec![route(12_000.0, 1200.0)])),
    );
    let navigator = navigator(Some(routing), avoid_highways(), tracker.clone());
    assert!(!navigator.is_watching_location());

    navigator.choose_destination(oakland()).await.unwrap();
    assert!(navigator.is_watching_location());
    assert_eq!(tracker.watcher_count(), 1);

    let moved = coordinate(-122.40, 37.79);
    tracker.push_fix(moved);
    assert_eq!(navigator.poll_location_updates(), 1);
    assert_eq!(navigator.position(), Some(moved));
    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);

    navigator.request_modification("scenic").await.unwrap();
    assert_eq!(navigator.kind(), NavigationStateKind::ComparingRoutes);
    assert!(!navigator.is_watching_location());
    assert_eq!(tracker.watcher_count(), 0);

    navigator.confirm(RouteChoice::Candidate(1)).unwrap();
    assert!(navigator.is_watching_location());

    navigator.start_over().unwrap();
    assert!(!navigator.is_watching_location());
    assert_eq!(tracker.watcher_count(), 0);
}

#[tokio::test]
async fn test_location_errors_are_notices() {
    let routing = Arc::new(FakeRoutingProvider::default().with_route(Ok(route(10_000.0, 1200.0))));
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();
    navigator.take_notices();

    navigator.handle_location_update(LocationUpdate::Error(LocationError::PermissionDenied));

    assert_eq!(navigator.kind(), NavigationStateKind::Navigating);
    let notices = navigator.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
}

#[tokio::test]
async fn test_search_places() {
    let routing = Arc::new(FakeRoutingProvider::default());
    let navigator = navigator(
        Some(routing),
        avoid_highways(),
        located(),
    );

    assert_eq!(navigator.search_places("Oakland").await.unwrap(), vec![oakland()]);
    assert!(matches!(
        navigator.search_places("Atlantis").await,
        Err(RoutingError::NoResults(_))
    ));
}

#[tokio::test]
async fn test_profile_change_is_carried_into_next_request() {
    let routing = Arc::new(
        FakeRoutingProvider::default()
            .with_route(Ok(route(10_000.0, 1200.0)))
            .with_alternatives(Ok(vec![route(10_000.0, 900.0)]))
            .with_alternatives(Ok(vec![])),
    );
    let intent = Arc::new(FakeIntentSource::answering(
        RouteModificationParams::default().with_profile(RoutingProfile::DrivingTraffic),
        "Using live traffic",
    ));
    let navigator = navigator(
        Some(routing),
        intent.clone(),
        located(),
    );
    navigator.choose_destination(oakland()).await.unwrap();

    navigator.request_modification("fastest").await.unwrap();
    navigator.confirm(RouteChoice::Candidate(1)).unwrap();
    navigator.request_modification("fastest").await.unwrap();

    let contexts = intent.contexts.lock();
    assert_eq!(
        contexts[1].current_params.as_ref().map(|params| params.profile),
        Some(RoutingProfile::DrivingTraffic)
    );
}
