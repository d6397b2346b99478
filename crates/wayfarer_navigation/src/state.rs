use std::fmt::Display;

use serde::Serialize;
use wayfarer_core::{Place, Route, RouteModificationParams};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationStateKind {
    Idle,
    Searching,
    Navigating,
    ComparingRoutes,
}

impl Display for NavigationStateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NavigationStateKind::Idle => "idle",
            NavigationStateKind::Searching => "searching",
            NavigationStateKind::Navigating => "navigating",
            NavigationStateKind::ComparingRoutes => "comparing-routes",
        };
        write!(f, "{label}")
    }
}

/// The route being driven together with the constraints that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoute {
    pub route: Route,
    pub params: RouteModificationParams,
}

/// Each variant carries exactly the data that is valid in that state, so an
/// active route cannot be missing while navigating and candidates cannot
/// linger outside of a comparison.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NavigationState {
    #[default]
    Idle,

    /// A routing round trip is in flight. `previous` is the route to fall
    /// back to, present when the search is a modification.
    Searching {
        destination: Place,
        previous: Option<ActiveRoute>,
        request_id: u64,
    },

    Navigating {
        destination: Place,
        active: ActiveRoute,
    },

    /// `candidates[0]` is always the active route.
    ComparingRoutes {
        destination: Place,
        active: ActiveRoute,
        candidates: Vec<Route>,
        proposed: RouteModificationParams,
        selected: usize,
    },
}

impl NavigationState {
    pub fn kind(&self) -> NavigationStateKind {
        match self {
            NavigationState::Idle => NavigationStateKind::Idle,
            NavigationState::Searching { .. } => NavigationStateKind::Searching,
            NavigationState::Navigating { .. } => NavigationStateKind::Navigating,
            NavigationState::ComparingRoutes { .. } => NavigationStateKind::ComparingRoutes,
        }
    }

    pub fn destination(&self) -> Option<&Place> {
        match self {
            NavigationState::Idle => None,
            NavigationState::Searching { destination, .. }
            | NavigationState::Navigating { destination, .. }
            | NavigationState::ComparingRoutes { destination, .. } => Some(destination),
        }
    }

    pub fn active(&self) -> Option<&ActiveRoute> {
        match self {
            NavigationState::Idle => None,
            NavigationState::Searching { previous, .. } => previous.as_ref(),
            NavigationState::Navigating { active, .. }
            | NavigationState::ComparingRoutes { active, .. } => Some(active),
        }
    }

    pub fn active_route(&self) -> Option<&Route> {
        self.active().map(|active| &active.route)
    }

    pub fn candidate_routes(&self) -> &[Route] {
        match self {
            NavigationState::ComparingRoutes { candidates, .. } => candidates,
            _ => &[],
        }
    }

    pub fn selected_candidate_index(&self) -> Option<usize> {
        match self {
            NavigationState::ComparingRoutes { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    pub fn pending_request(&self) -> Option<u64> {
        match self {
            NavigationState::Searching { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_accessors() {
        let state = NavigationState::default();

        assert_eq!(state.kind(), NavigationStateKind::Idle);
        assert!(state.destination().is_none());
        assert!(state.active_route().is_none());
        assert!(state.candidate_routes().is_empty());
        assert!(state.selected_candidate_index().is_none());
        assert!(state.pending_request().is_none());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(NavigationStateKind::ComparingRoutes.to_string(), "comparing-routes");
        assert_eq!(
            serde_json::to_string(&NavigationStateKind::ComparingRoutes).unwrap(),
            "\"comparing-routes\""
        );
    }
}
