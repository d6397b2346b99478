use tracing::debug;
use wayfarer_core::{Place, Route, RouteModificationParams};

use crate::{
    error::TransitionError,
    state::{ActiveRoute, NavigationState, NavigationStateKind},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteChoice {
    KeepCurrent,
    Candidate(usize),
    /// Whatever candidate is currently previewed.
    Selected,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    DestinationChosen(Place),
    RouteResolved {
        request_id: u64,
        route: Route,
    },
    /// `candidates` is the deduplicated list with the reference first.
    AlternativesResolved {
        request_id: u64,
        candidates: Vec<Route>,
        params: RouteModificationParams,
    },
    RequestFailed {
        request_id: u64,
    },
    ModificationRequested,
    CandidateSelected(usize),
    Confirmed(RouteChoice),
    StartOver,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::DestinationChosen(_) => "destination-chosen",
            SessionEvent::RouteResolved { .. } => "route-resolved",
            SessionEvent::AlternativesResolved { .. } => "alternatives-resolved",
            SessionEvent::RequestFailed { .. } => "request-failed",
            SessionEvent::ModificationRequested => "modification-requested",
            SessionEvent::CandidateSelected(_) => "candidate-selected",
            SessionEvent::Confirmed(_) => "confirmed",
            SessionEvent::StartOver => "start-over",
        }
    }

    fn request_id(&self) -> Option<u64> {
        match self {
            SessionEvent::RouteResolved { request_id, .. }
            | SessionEvent::AlternativesResolved { request_id, .. }
            | SessionEvent::RequestFailed { request_id } => Some(*request_id),
            _ => None,
        }
    }
}

/// Single owner of what is currently true for one user session.
///
/// [`NavigationSession::apply`] is the only way to change it. A rejected
/// event leaves the state untouched.
#[derive(Debug, Default)]
pub struct NavigationSession {
    state: NavigationState,
    next_request_id: u64,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn kind(&self) -> NavigationStateKind {
        self.state.kind()
    }

    pub fn destination(&self) -> Option<&Place> {
        self.state.destination()
    }

    pub fn active_route(&self) -> Option<&Route> {
        self.state.active_route()
    }

    pub fn candidate_routes(&self) -> &[Route] {
        self.state.candidate_routes()
    }

    pub fn selected_candidate_index(&self) -> Option<usize> {
        self.state.selected_candidate_index()
    }

    pub fn is_calculating_route(&self) -> bool {
        self.state.pending_request().is_some()
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<(), TransitionError> {
        let state = std::mem::take(&mut self.state);
        let from = state.kind();
        let event_name = event.name();

        match self.transition(state, event) {
            Ok(next) => {
                debug!("Session {} --{}--> {}", from, event_name, next.kind());
                self.state = next;
                Ok(())
            }
            Err((state, error)) => {
                self.state = state;
                Err(error)
            }
        }
    }

    fn issue_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn transition(
        &mut self,
        state: NavigationState,
        event: SessionEvent,
    ) -> Result<NavigationState, (NavigationState, TransitionError)> {
        if let Some(request_id) = event.request_id() {
            if state.pending_request() != Some(request_id) {
                return Err((state, TransitionError::StaleResponse { request_id }));
            }
        }

        match (state, event) {
            (NavigationState::Idle, SessionEvent::DestinationChosen(destination)) => {
                Ok(NavigationState::Searching {
                    destination,
                    previous: None,
                    request_id: self.issue_request_id(),
                })
            }

            (
                NavigationState::Searching {
                    destination,
                    previous: None,
                    ..
                },
                SessionEvent::RouteResolved { route, .. },
            ) => Ok(NavigationState::Navigating {
                destination,
                active: ActiveRoute {
                    route,
                    params: RouteModificationParams::default(),
                },
            }),

            (
                NavigationState::Searching {
                    destination,
                    previous: Some(active),
                    ..
                },
                SessionEvent::AlternativesResolved {
                    candidates, params, ..
                },
            ) => {
                if candidates.len() < 2 {
                    return Ok(NavigationState::Navigating {
                        destination,
                        active,
                    });
                }

                Ok(NavigationState::ComparingRoutes {
                    destination,
                    active,
                    candidates,
                    proposed: params,
                    selected: 0,
                })
            }

            (
                NavigationState::Searching {
                    destination,
                    previous,
                    ..
                },
                SessionEvent::RequestFailed { .. },
            ) => Ok(match previous {
                Some(active) => NavigationState::Navigating {
                    destination,
                    active,
                },
                None => NavigationState::Idle,
            }),

            (
                NavigationState::Navigating {
                    destination,
                    active,
                },
                SessionEvent::ModificationRequested,
            ) => Ok(NavigationState::Searching {
                destination,
                previous: Some(active),
                request_id: self.issue_request_id(),
            }),

            (
                NavigationState::ComparingRoutes {
                    destination,
                    active,
                    candidates,
                    proposed,
                    selected,
                },
                SessionEvent::CandidateSelected(index),
            ) => {
                if index >= candidates.len() {
                    let count = candidates.len();
                    let state = NavigationState::ComparingRoutes {
                        destination,
                        active,
                        candidates,
                        proposed,
                        selected,
                    };
                    return Err((state, TransitionError::CandidateOutOfRange { index, count }));
                }

                Ok(NavigationState::ComparingRoutes {
                    destination,
                    active,
                    candidates,
                    proposed,
                    selected: index,
                })
            }

            (
                NavigationState::ComparingRoutes {
                    destination,
                    active,
                    mut candidates,
                    proposed,
                    selected,
                },
                SessionEvent::Confirmed(choice),
            ) => {
                let index = match choice {
                    RouteChoice::KeepCurrent => 0,
                    RouteChoice::Candidate(index) => index,
                    RouteChoice::Selected => selected,
                };

                if index >= candidates.len() {
                    let count = candidates.len();
                    let state = NavigationState::ComparingRoutes {
                        destination,
                        active,
                        candidates,
                        proposed,
                        selected,
                    };
                    return Err((state, TransitionError::CandidateOutOfRange { index, count }));
                }

                // Index 0 is the reference, confirming it keeps the current route
                let active = if index == 0 {
                    active
                } else {
                    ActiveRoute {
                        route: candidates.swap_remove(index),
                        params: proposed,
                    }
                };

                Ok(NavigationState::Navigating {
                    destination,
                    active,
                })
            }

            (NavigationState::Idle, SessionEvent::StartOver)
            | (NavigationState::Navigating { .. }, SessionEvent::StartOver) => {
                Ok(NavigationState::Idle)
            }

            (state, event) => {
                let error = TransitionError::InvalidTransition {
                    state: state.kind(),
                    event: event.name(),
                };
                Err((state, error))
            }
        }
    }
}
