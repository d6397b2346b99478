use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    anthropic_client::AnthropicClient,
    config::IntentParserConfig,
    error::IntentError,
    intent::{IntentContext, IntentSource, RouteIntent},
    keyword_matcher::KeywordMatcher,
    llm_strategy::LlmStrategy,
    openai_client::OpenAiClient,
    strategy::IntentStrategy,
};

/// Runs the degradation chain: hosted tiers in order, then the keyword
/// matcher, which always answers.
///
/// Which hosted tiers exist is fixed at construction. A tier failing at
/// runtime only skips it for the request at hand.
pub struct IntentParser {
    strategies: Vec<Box<dyn IntentStrategy>>,
    fallback: KeywordMatcher,
}

impl IntentParser {
    pub fn new(strategies: Vec<Box<dyn IntentStrategy>>) -> Self {
        Self {
            strategies,
            fallback: KeywordMatcher,
        }
    }

    /// Keyword matching only, no network.
    pub fn rule_based() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_config(config: IntentParserConfig) -> Self {
        let mut strategies: Vec<Box<dyn IntentStrategy>> = Vec::new();

        if let Some(openai) = config.openai {
            match LlmStrategy::<OpenAiClient>::openai(openai) {
                Ok(strategy) => strategies.push(Box::new(strategy)),
                Err(error) => warn!("Could not set up the OpenAI tier: {}", error),
            }
        }

        if let Some(anthropic) = config.anthropic {
            match LlmStrategy::<AnthropicClient>::anthropic(anthropic) {
                Ok(strategy) => strategies.push(Box::new(strategy)),
                Err(error) => warn!("Could not set up the Anthropic tier: {}", error),
            }
        }

        let parser = Self::new(strategies);
        info!("Intent tiers: {}", parser.tiers().join(" -> "));
        parser
    }

    pub fn from_env() -> Self {
        Self::from_config(IntentParserConfig::from_env())
    }

    /// Tier names in the order they are tried.
    pub fn tiers(&self) -> Vec<&str> {
        self.strategies
            .iter()
            .map(|strategy| strategy.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    pub async fn parse(&self, utterance: &str, context: &IntentContext) -> RouteIntent {
        for strategy in &self.strategies {
            match strategy.parse(utterance, context).await {
                Ok(intent) => {
                    info!("Intent parsed by {} tier", strategy.name());
                    return intent;
                }
                Err(error) => {
                    warn!(
                        "Intent tier {} failed, falling through: {}",
                        strategy.name(),
                        error
                    );
                }
            }
        }

        self.fallback.matches(utterance, context)
    }
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::rule_based()
    }
}

#[async_trait]
impl IntentSource for IntentParser {
    async fn interpret(
        &self,
        utterance: &str,
        context: &IntentContext,
    ) -> Result<RouteIntent, IntentError> {
        Ok(self.parse(utterance, context).await)
    }
}
