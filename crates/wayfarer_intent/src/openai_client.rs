//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::LlmProviderConfig,
    error::IntentError,
    llm_client::{LlmClient, truncate_for_log},
};

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

pub struct OpenAiClient {
    config: LlmProviderConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: LlmProviderConfig) -> Result<Self, IntentError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, IntentError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "model": &self.config.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt}
                ],
                "temperature": 0.1,
                "response_format": {"type": "json_object"}
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
            "OpenAI raw response: {}",
            truncate_for_log(&text)
        );

        parse_chat_completion(&text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

fn parse_chat_completion(text: &str) -> Result<String, IntentError> {
    let response: ChatCompletionResponse = serde_json::from_str(text)?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| IntentError::EmptyResponse(String::from("openai")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_new_client() {
        let client = OpenAiClient::new(LlmProviderConfig {
            api_key: String::from("test-key"),
            model: String::from("gpt-4o-mini"),
            base_url: String::from("http://localhost:1234/v1"),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(client.model_name(), "gpt-4o-mini");
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_parse_chat_completion() {
        let content = parse_chat_completion(
            r#"{
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "{\"avoid\":[\"toll\"]}" },
                    "finish_reason": "stop"
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(content, r#"{"avoid":["toll"]}"#);

        assert!(matches!(
            parse_chat_completion(r#"{ "choices": [] }"#),
            Err(IntentError::EmptyResponse(_))
        ));
        assert!(matches!(
            parse_chat_completion(r#"{ "choices": [{ "message": { "content": null } }] }"#),
            Err(IntentError::EmptyResponse(_))
        ));
        assert!(matches!(
            parse_chat_completion("<html>"),
            Err(IntentError::InvalidReply(_))
        ));
    }
}
