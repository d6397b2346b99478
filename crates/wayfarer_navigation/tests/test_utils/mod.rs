use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use wayfarer_core::{
    Coordinate, Place, PlaceSuggestion, Route, RouteGeometry, RouteModificationParams,
};
use wayfarer_intent::{IntentContext, IntentError, IntentSource, RouteIntent};
use wayfarer_navigation::{LocationTracker, Navigator, NavigatorConfig};
use wayfarer_providers::{RoutingError, RoutingProvider};

pub fn coordinate(lon: f64, lat: f64) -> Coordinate {
    Coordinate::new(lon, lat).unwrap()
}

pub fn default_origin() -> Coordinate {
    coordinate(-122.4194, 37.7749)
}

pub fn oakland() -> Place {
    Place {
        id: String::from("poi.oakland"),
        name: String::from("Oakland"),
        coordinates: coordinate(-122.2712, 37.8044),
        address: None,
    }
}

pub fn route(distance: f64, duration: f64) -> Route {
    let geometry = RouteGeometry::line_string(vec![default_origin(), oakland().coordinates]);
    Route::new(geometry, distance, duration, vec![]).unwrap()
}

#[derive(Debug, Clone)]
pub struct RouteCall {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub params: RouteModificationParams,
}

/// Answers from queued responses and records every call.
#[derive(Default)]
pub struct FakeRoutingProvider {
    routes: Mutex<VecDeque<Result<Route, RoutingError>>>,
    alternatives: Mutex<VecDeque<Result<Vec<Route>, RoutingError>>>,
    pub route_calls: Mutex<Vec<RouteCall>>,
    pub alternatives_calls: Mutex<Vec<RouteCall>>,
}

impl FakeRoutingProvider {
    pub fn with_route(self, route: Result<Route, RoutingError>) -> Self {
        self.routes.lock().push_back(route);
        self
    }

    pub fn with_alternatives(self, alternatives: Result<Vec<Route>, RoutingError>) -> Self {
        self.alternatives.lock().push_back(alternatives);
        self
    }
}

#[async_trait]
impl RoutingProvider for FakeRoutingProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        params: &RouteModificationParams,
    ) -> Result<Route, RoutingError> {
        self.route_calls.lock().push(RouteCall {
            origin,
            destination,
            params: params.clone(),
        });
        self.routes
            .lock()
            .pop_front()
            .unwrap_or(Err(RoutingError::NoRoute))
    }

    async fn alternatives(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        params: &RouteModificationParams,
    ) -> Result<Vec<Route>, RoutingError> {
        self.alternatives_calls.lock().push(RouteCall {
            origin,
            destination,
            params: params.clone(),
        });
        self.alternatives
            .lock()
            .pop_front()
            .unwrap_or(Err(RoutingError::NoRoute))
    }

    async fn suggest(
        &self,
        query: &str,
        _proximity: Option<Coordinate>,
    ) -> Result<Vec<PlaceSuggestion>, RoutingError> {
        if query.eq_ignore_ascii_case("oakland") {
            Ok(vec![PlaceSuggestion {
                id: String::from("poi.oakland"),
                name: String::from("Oakland"),
                address: None,
            }])
        } else {
            Ok(vec![])
        }
    }

    async fn retrieve(&self, _suggestion: &PlaceSuggestion) -> Result<Place, RoutingError> {
        Ok(oakland())
    }
}

/// Returns the same intent for every utterance and remembers the contexts
/// it was given.
pub struct FakeIntentSource {
    intent: Option<RouteIntent>,
    pub contexts: Mutex<Vec<IntentContext>>,
}

impl FakeIntentSource {
    pub fn answering(params: RouteModificationParams, explanation: &str) -> Self {
        Self {
            intent: Some(RouteIntent {
                params,
                explanation: explanation.to_string(),
            }),
            contexts: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        Self {
            intent: None,
            contexts: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl IntentSource for FakeIntentSource {
    async fn interpret(
        &self,
        _utterance: &str,
        context: &IntentContext,
    ) -> Result<RouteIntent, IntentError> {
        self.contexts.lock().push(context.clone());
        self.intent.clone().ok_or(IntentError::Api {
            status: 502,
            message: String::from("bad gateway"),
        })
    }
}

pub fn navigator(
    routing: Option<Arc<FakeRoutingProvider>>,
    intent: Arc<FakeIntentSource>,
    location: Arc<dyn LocationTracker>,
) -> Navigator {
    Navigator::new(
        NavigatorConfig::new(default_origin()),
        routing.map(|routing| routing as Arc<dyn RoutingProvider>),
        intent,
        location,
    )
}
