use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wayfarer_core::{Coordinate, RouteModificationParams};

use crate::error::IntentError;

/// What the user is currently driving, handed to every intent strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentContext {
    pub origin: Coordinate,
    pub destination: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_params: Option<RouteModificationParams>,
}

impl IntentContext {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            current_params: None,
        }
    }

    pub fn with_current_params(mut self, params: RouteModificationParams) -> Self {
        self.current_params = Some(params);
        self
    }

    /// The params in force, or the defaults when nothing was applied yet.
    pub fn base_params(&self) -> RouteModificationParams {
        self.current_params.clone().unwrap_or_default()
    }
}

/// An utterance turned into routing constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteIntent {
    pub params: RouteModificationParams,
    pub explanation: String,
}

/// Anything that can turn an utterance into a [`RouteIntent`].
///
/// Implemented by the in-process [`crate::IntentParser`] and by the HTTP
/// client of the intent endpoint, so callers don't care where parsing runs.
#[async_trait]
pub trait IntentSource: Send + Sync {
    async fn interpret(
        &self,
        utterance: &str,
        context: &IntentContext,
    ) -> Result<RouteIntent, IntentError>;
}
