//! Anthropic messages API client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::LlmProviderConfig,
    error::IntentError,
    llm_client::{LlmClient, truncate_for_log},
};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

pub struct AnthropicClient {
    config: LlmProviderConfig,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(config: LlmProviderConfig) -> Result<Self, IntentError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn chat_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, IntentError> {
        // No JSON mode on this API, the instruction has to live in the prompt
        let system_prompt = format!(
            "{system_prompt}\n\nRespond with valid JSON only. No markdown code blocks, no prose."
        );

        let response = self
            .client
            .post(format!("{}/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&serde_json::json!({
                "model": &self.config.model,
                "max_tokens": MAX_TOKENS,
                "system": system_prompt,
                "messages": [{"role": "user", "content": user_prompt}]
            }))
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

        debug!(
            "Anthropic raw response: {}",
            truncate_for_log(&text)
        );

        parse_messages_response(&text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

fn parse_messages_response(text: &str) -> Result<String, IntentError> {
    let response: MessagesResponse = serde_json::from_str(text)?;

    response
        .content
        .into_iter()
        .find_map(|block| block.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| IntentError::EmptyResponse(String::from("anthropic")))
}
