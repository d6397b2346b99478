use async_trait::async_trait;

use crate::{
    error::IntentError,
    intent::{IntentContext, RouteIntent},
};

/// One tier of the intent degradation chain.
#[async_trait]
pub trait IntentStrategy: Send + Sync {
    /// Short tier name, used in logs and the health endpoint.
    fn name(&self) -> &str;

    async fn parse(
        &self,
        utterance: &str,
        context: &IntentContext,
    ) -> Result<RouteIntent, IntentError>;
}
