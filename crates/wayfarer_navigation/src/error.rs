use thiserror::Error;

use crate::state::NavigationStateKind;

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("Cannot handle {event} while {state}")]
    InvalidTransition {
        state: NavigationStateKind,
        event: &'static str,
    },

    #[error("Ignoring stale response for request {request_id}")]
    StaleResponse { request_id: u64 },

    #[error("Candidate {index} does not exist, there are {count} candidates")]
    CandidateOutOfRange { index: usize, count: usize },

    #[error("Routing is not available")]
    RoutingUnavailable,

    #[error("Request is empty")]
    EmptyRequest,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    Unavailable,

    #[error("Timed out waiting for a position fix")]
    Timeout,
}
