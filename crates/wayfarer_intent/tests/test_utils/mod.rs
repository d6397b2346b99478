use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use wayfarer_core::{Coordinate, RouteModificationParams, RoutingProfile};
use wayfarer_intent::{IntentContext, IntentError, IntentStrategy, RouteIntent};

pub fn san_francisco_to_oakland() -> IntentContext {
    IntentContext::new(
        Coordinate::new(-122.4194, 37.7749).unwrap(),
        Coordinate::new(-122.2712, 37.8044).unwrap(),
    )
}

/// Always answers with the same intent and counts its calls.
pub struct FixedStrategy {
    pub name: &'static str,
    pub intent: RouteIntent,
    pub calls: Arc<AtomicUsize>,
}

impl FixedStrategy {
    pub fn new(name: &'static str, profile: RoutingProfile, explanation: &str) -> Self {
        Self {
            name,
            intent: RouteIntent {
                params: RouteModificationParams::default().with_profile(profile),
                explanation: explanation.to_string(),
            },
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl IntentStrategy for FixedStrategy {
    fn name(&self) -> &str {
        self.name
    }

    async fn parse(
        &self,
        _utterance: &str,
        _context: &IntentContext,
    ) -> Result<RouteIntent, IntentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.intent.clone())
    }
}

/// Fails every call, like a hosted tier that is down.
pub struct FailingStrategy {
    pub name: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl FailingStrategy {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl IntentStrategy for FailingStrategy {
    fn name(&self) -> &str {
        self.name
    }

    async fn parse(
        &self,
        _utterance: &str,
        _context: &IntentContext,
    ) -> Result<RouteIntent, IntentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(IntentError::Api {
            status: 503,
            message: String::from("service unavailable"),
        })
    }
}
