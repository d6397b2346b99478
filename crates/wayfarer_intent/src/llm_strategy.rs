use async_trait::async_trait;
use tracing::debug;

use crate::{
    anthropic_client::AnthropicClient,
    config::LlmProviderConfig,
    error::IntentError,
    intent::{IntentContext, RouteIntent},
    llm_client::LlmClient,
    openai_client::OpenAiClient,
    prompt::{anthropic_system_prompt, openai_system_prompt, user_prompt},
    reply::parse_reply,
    strategy::IntentStrategy,
};

/// A hosted-model tier: prompt the model, parse its JSON reply.
pub struct LlmStrategy<C: LlmClient> {
    client: C,
    system_prompt: String,
}

impl<C: LlmClient> LlmStrategy<C> {
    pub fn new(client: C, system_prompt: String) -> Self {
        Self {
            client,
            system_prompt,
        }
    }
}

impl LlmStrategy<OpenAiClient> {
    pub fn openai(config: LlmProviderConfig) -> Result<Self, IntentError> {
        Ok(Self::new(OpenAiClient::new(config)?, openai_system_prompt()))
    }
}

impl LlmStrategy<AnthropicClient> {
    pub fn anthropic(config: LlmProviderConfig) -> Result<Self, IntentError> {
        Ok(Self::new(
            AnthropicClient::new(config)?,
            anthropic_system_prompt(),
        ))
    }
}

#[async_trait]
impl<C: LlmClient> IntentStrategy for LlmStrategy<C> {
    fn name(&self) -> &str {
        self.client.provider_name()
    }

    async fn parse(
        &self,
        utterance: &str,
        context: &IntentContext,
    ) -> Result<RouteIntent, IntentError> {
        debug!(
            "{}: asking {} about \"{}\"",
            self.client.provider_name(),
            self.client.model_name(),
            utterance
        );

        let reply = self
            .client
            .chat_json(&self.system_prompt, &user_prompt(utterance, context))
            .await?;

        parse_reply(&reply, context)
    }
}
