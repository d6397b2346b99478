use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    api::{MODIFY_ROUTE_PATH, ModifyRouteRequest, ModifyRouteResponse},
    error::IntentError,
    intent::{IntentContext, IntentSource, RouteIntent},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client of a remote `POST /api/modify-route` endpoint.
pub struct IntentApiClient {
    url: String,
    client: reqwest::Client,
}

impl IntentApiClient {
    /// `url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(url: &str) -> Result<Self, IntentError> {
        let client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_env() -> Result<Self, IntentError> {
        let url = std::env::var("WAYFARER_INTENT_URL")
            .map_err(|_| IntentError::NotConfigured(String::from("WAYFARER_INTENT_URL")))?;
        Self::new(&url)
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url, MODIFY_ROUTE_PATH)
    }
}

#[async_trait]
impl IntentSource for IntentApiClient {
    #[instrument(skip(self, context))]
    async fn interpret(
        &self,
        utterance: &str,
        context: &IntentContext,
    ) -> Result<RouteIntent, IntentError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&ModifyRouteRequest::new(utterance, context))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(IntentError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!("Intent endpoint replied: {}", text);

        let response: ModifyRouteResponse = serde_json::from_str(&text)?;

        Ok(response.into())
    }
}
