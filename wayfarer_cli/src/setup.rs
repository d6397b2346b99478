use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use wayfarer_intent::{IntentApiClient, IntentParser, IntentSource};
use wayfarer_providers::{MapboxClient, RoutingProvider};

/// The remote intent endpoint when a URL is given, the in-process parser
/// otherwise.
pub fn intent_source(intent_url: Option<&str>) -> anyhow::Result<Arc<dyn IntentSource>> {
    match intent_url {
        Some(url) => {
            let client = IntentApiClient::new(url)
                .with_context(|| format!("Could not create intent client for {url}"))?;
            info!("Using intent endpoint {}", client.endpoint());
            Ok(Arc::new(client))
        }
        None => Ok(Arc::new(IntentParser::from_env())),
    }
}

/// `None` when no access token is configured.
pub fn routing_provider() -> Option<Arc<dyn RoutingProvider>> {
    match MapboxClient::from_env() {
        Ok(client) => Some(Arc::new(client)),
        Err(error) => {
            warn!("{}", error);
            None
        }
    }
}
