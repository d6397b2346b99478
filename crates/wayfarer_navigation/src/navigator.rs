use std::sync::Arc;

use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, warn};
use wayfarer_core::{
    Coordinate, Place, PlaceSuggestion, RouteComparator, RouteModificationParams,
};
use wayfarer_intent::{IntentContext, IntentSource};
use wayfarer_providers::{RoutingError, RoutingProvider};

use crate::{
    config::NavigatorConfig,
    error::TransitionError,
    location::{LocationTracker, LocationUpdate, WatchHandle},
    notice::Notice,
    session::{NavigationSession, RouteChoice, SessionEvent},
    state::{ActiveRoute, NavigationState, NavigationStateKind},
    view::NavigationView,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ModificationOutcome {
    /// Comparison mode was entered with this many alternatives next to the
    /// current route.
    Comparing {
        explanation: String,
        alternatives: usize,
    },
    /// Nothing meaningfully different came back, the current route stays.
    NoAlternative { explanation: String },
    /// Parsing or routing failed, the current route stays.
    Failed,
}

struct PendingRequest {
    request_id: u64,
    destination: Place,
    previous: Option<ActiveRoute>,
}

/// Drives one navigation session: resolves the origin, talks to the intent
/// source and the routing provider, and feeds the results into the
/// [`NavigationSession`] transition function.
///
/// Provider failures never escape as errors. They become notices and the
/// session returns to its last stable state. The `Err` results of the
/// public methods are reserved for calls that are invalid in the current
/// state.
pub struct Navigator {
    config: NavigatorConfig,
    comparator: RouteComparator,
    routing: Option<Arc<dyn RoutingProvider>>,
    intent: Arc<dyn IntentSource>,
    location: Arc<dyn LocationTracker>,
    session: RwLock<NavigationSession>,
    position: RwLock<Option<Coordinate>>,
    notices: Mutex<Vec<Notice>>,
    banner: Option<Notice>,
    watch: Mutex<Option<WatchHandle>>,
    updates_sender: UnboundedSender<LocationUpdate>,
    updates: Mutex<UnboundedReceiver<LocationUpdate>>,
}

impl Navigator {
    pub fn new(
        config: NavigatorConfig,
        routing: Option<Arc<dyn RoutingProvider>>,
        intent: Arc<dyn IntentSource>,
        location: Arc<dyn LocationTracker>,
    ) -> Self {
        let banner = match &routing {
            Some(provider) => {
                info!("Routing provider: {}", provider.name());
                None
            }
            None => {
                warn!("No routing provider configured, route features are disabled");
                Some(Notice::persistent(
                    "Routing is not configured. Destination search and routes are disabled.",
                ))
            }
        };

        let (updates_sender, updates) = mpsc::unbounded_channel();

        Self {
            comparator: RouteComparator::new(config.thresholds),
            config,
            routing,
            intent,
            location,
            session: RwLock::new(NavigationSession::new()),
            position: RwLock::new(None),
            notices: Mutex::new(Vec::new()),
            banner,
            watch: Mutex::new(None),
            updates_sender,
            updates: Mutex::new(updates),
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn state(&self) -> NavigationState {
        self.session.read().state().clone()
    }

    pub fn kind(&self) -> NavigationStateKind {
        self.session.read().kind()
    }

    pub fn is_calculating_route(&self) -> bool {
        self.session.read().is_calculating_route()
    }

    pub fn is_routing_available(&self) -> bool {
        self.routing.is_some()
    }

    pub fn is_watching_location(&self) -> bool {
        self.watch.lock().is_some()
    }

    pub fn position(&self) -> Option<Coordinate> {
        *self.position.read()
    }

    /// The persistent notice, if any.
    pub fn banner(&self) -> Option<&Notice> {
        self.banner.as_ref()
    }

    /// Drains the queued transient notices.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn view(&self, now: Timestamp) -> NavigationView {
        self.poll_location_updates();

        let session = self.session.read();
        NavigationView::project(
            &session,
            self.position(),
            self.banner.clone(),
            now,
        )
    }

    /// Live fix when one is known or can be obtained, the configured default
    /// otherwise.
    pub async fn resolve_origin(&self) -> Coordinate {
        self.poll_location_updates();

        if let Some(position) = self.position() {
            return position;
        }

        match self.location.get_once().await {
            Ok(position) => {
                *self.position.write() = Some(position);
                position
            }
            Err(error) => {
                debug!("No location fix ({}), using default origin", error);
                self.notify(Notice::warning(format!(
                    "{error}. Starting from the default location."
                )));
                self.config.default_origin
            }
        }
    }

    #[instrument(skip(self, destination), fields(destination = %destination.name))]
    pub async fn choose_destination(
        &self,
        destination: Place,
    ) -> Result<NavigationStateKind, TransitionError> {
        let routing = self.routing()?;
        let pending = self.begin(SessionEvent::DestinationChosen(destination))?;

        let origin = self.resolve_origin().await;
        let event = match routing
            .route(
                origin,
                pending.destination.coordinates,
                &RouteModificationParams::default(),
            )
            .await
        {
            Ok(route) => {
                info!(
                    "Route to {}: {:.0} m, {:.0} s",
                    pending.destination.name,
                    route.distance(),
                    route.duration()
                );
                SessionEvent::RouteResolved {
                    request_id: pending.request_id,
                    route,
                }
            }
            Err(error) => {
                warn!("{}: route request failed: {}", routing.name(), error);
                self.notify(route_failure_notice(&error, &pending.destination));
                SessionEvent::RequestFailed {
                    request_id: pending.request_id,
                }
            }
        };

        self.resolve(event);
        Ok(self.kind())
    }

    #[instrument(skip(self))]
    pub async fn request_modification(
        &self,
        utterance: &str,
    ) -> Result<ModificationOutcome, TransitionError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(TransitionError::EmptyRequest);
        }

        let routing = self.routing()?;
        let pending = self.begin(SessionEvent::ModificationRequested)?;
        let request_id = pending.request_id;

        let origin = self.resolve_origin().await;
        let destination = pending.destination.coordinates;
        let mut context = IntentContext::new(origin, destination);
        context.current_params = pending.previous.as_ref().map(|active| active.params.clone());

        let intent = match self.intent.interpret(utterance, &context).await {
            Ok(intent) => intent,
            Err(error) => {
                warn!("Intent source failed: {}", error);
                self.notify(Notice::error(
                    "Sorry, I couldn't work out that change. Keeping your current route.",
                ));
                self.resolve(SessionEvent::RequestFailed { request_id });
                return Ok(ModificationOutcome::Failed);
            }
        };

        let alternatives = match routing.alternatives(origin, destination, &intent.params).await {
            Ok(alternatives) => alternatives,
            Err(error) => {
                warn!("{}: alternatives request failed: {}", routing.name(), error);
                self.notify(alternatives_failure_notice(&error));
                self.resolve(SessionEvent::RequestFailed { request_id });
                return Ok(ModificationOutcome::Failed);
            }
        };

        let reference = pending.previous.as_ref().map(|active| &active.route);
        let candidates = self.comparator.deduplicate(&alternatives, reference);
        debug!(
            "{} alternatives, {} after deduplication",
            alternatives.len(),
            candidates.len()
        );

        let count = candidates.len();
        let applied = self.resolve(SessionEvent::AlternativesResolved {
            request_id,
            candidates,
            params: intent.params,
        });

        if !applied {
            return Ok(ModificationOutcome::Failed);
        }

        if self.kind() == NavigationStateKind::ComparingRoutes {
            self.notify(Notice::info(intent.explanation.clone()));
            return Ok(ModificationOutcome::Comparing {
                explanation: intent.explanation,
                alternatives: count.saturating_sub(1),
            });
        }

        self.notify(Notice::info(format!(
            "{}. I couldn't find a route that is meaningfully different, so you're staying on the current one.",
            intent.explanation.trim_end_matches('.')
        )));
        Ok(ModificationOutcome::NoAlternative {
            explanation: intent.explanation,
        })
    }

    /// Highlights a candidate without confirming it.
    pub fn select_candidate(&self, index: usize) -> Result<(), TransitionError> {
        self.session
            .write()
            .apply(SessionEvent::CandidateSelected(index))
    }

    pub fn confirm(&self, choice: RouteChoice) -> Result<(), TransitionError> {
        self.session.write().apply(SessionEvent::Confirmed(choice))?;
        self.sync_location_watch();
        Ok(())
    }

    pub fn start_over(&self) -> Result<(), TransitionError> {
        self.session.write().apply(SessionEvent::StartOver)?;
        self.sync_location_watch();
        Ok(())
    }

    /// Applies a position update. Never changes the session state.
    pub fn handle_location_update(&self, update: LocationUpdate) {
        match update {
            LocationUpdate::Fix(position) => *self.position.write() = Some(position),
            LocationUpdate::Error(error) => {
                debug!("Location watch error: {}", error);
                self.notify(Notice::warning(error.to_string()));
            }
        }
    }

    /// Applies every update the tracker delivered since the last call.
    pub fn poll_location_updates(&self) -> usize {
        let mut handled = 0;

        loop {
            let update = self.updates.lock().try_recv();
            let Ok(update) = update else {
                break;
            };

            self.handle_location_update(update);
            handled += 1;
        }

        handled
    }

    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>, RoutingError> {
        let routing = self.routing_or_not_configured()?;
        routing.search_places(query, Some(self.proximity())).await
    }

    pub async fn suggest(&self, query: &str) -> Result<Vec<PlaceSuggestion>, RoutingError> {
        let routing = self.routing_or_not_configured()?;
        routing.suggest(query, Some(self.proximity())).await
    }

    pub async fn retrieve(&self, suggestion: &PlaceSuggestion) -> Result<Place, RoutingError> {
        let routing = self.routing_or_not_configured()?;
        routing.retrieve(suggestion).await
    }

    fn proximity(&self) -> Coordinate {
        self.position().unwrap_or(self.config.default_origin)
    }

    fn routing(&self) -> Result<Arc<dyn RoutingProvider>, TransitionError> {
        self.routing
            .clone()
            .ok_or(TransitionError::RoutingUnavailable)
    }

    fn routing_or_not_configured(&self) -> Result<Arc<dyn RoutingProvider>, RoutingError> {
        self.routing
            .clone()
            .ok_or_else(|| RoutingError::NotConfigured(String::from("routing provider")))
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }

    /// Applies an event that enters `searching` and returns what the request
    /// needs to know.
    fn begin(&self, event: SessionEvent) -> Result<PendingRequest, TransitionError> {
        let event_name = event.name();

        let pending = {
            let mut session = self.session.write();
            session.apply(event)?;

            match session.state() {
                NavigationState::Searching {
                    destination,
                    previous,
                    request_id,
                } => PendingRequest {
                    request_id: *request_id,
                    destination: destination.clone(),
                    previous: previous.clone(),
                },
                state => {
                    return Err(TransitionError::InvalidTransition {
                        state: state.kind(),
                        event: event_name,
                    });
                }
            }
        };

        self.sync_location_watch();
        Ok(pending)
    }

    /// Applies the event that ends a request. Returns whether it was applied.
    fn resolve(&self, event: SessionEvent) -> bool {
        let result = self.session.write().apply(event);

        let applied = match result {
            Ok(()) => true,
            Err(error @ TransitionError::StaleResponse { .. }) => {
                debug!("{}", error);
                false
            }
            Err(error) => {
                warn!("Could not apply response: {}", error);
                false
            }
        };

        self.sync_location_watch();
        applied
    }

    /// Continuous tracking only runs while navigating.
    fn sync_location_watch(&self) {
        let navigating = self.kind() == NavigationStateKind::Navigating;
        let mut watch = self.watch.lock();

        match (navigating, watch.take()) {
            (true, None) => {
                debug!("Starting location watch");
                *watch = Some(self.location.watch(self.updates_sender.clone()));
            }
            (true, Some(handle)) => *watch = Some(handle),
            (false, Some(handle)) => {
                debug!("Stopping location watch");
                self.location.unwatch(handle);
            }
            (false, None) => {}
        }
    }
}

fn route_failure_notice(error: &RoutingError, destination: &Place) -> Notice {
    if error.is_not_found() {
        Notice::warning(format!("No route found to {}.", destination.name))
    } else if error.is_unreachable() {
        Notice::error("The routing service is unreachable. Please try again in a moment.")
    } else {
        Notice::error(format!("Could not calculate a route to {}.", destination.name))
    }
}

fn alternatives_failure_notice(error: &RoutingError) -> Notice {
    if let RoutingError::TooManyWaypoints { max, .. } = error {
        Notice::warning(format!(
            "A route can pass through at most {} stops. Keeping your current route.",
            max.saturating_sub(2)
        ))
    } else if error.is_not_found() {
        Notice::warning("No route matches that request. Keeping your current route.")
    } else if error.is_unreachable() {
        Notice::error("The routing service is unreachable. Keeping your current route.")
    } else {
        Notice::error("Could not calculate alternatives. Keeping your current route.")
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        if let Some(handle) = self.watch.get_mut().take() {
            self.location.unwatch(handle);
        }
    }
}
