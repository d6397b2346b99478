use std::time::Duration;

use tracing::debug;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct LlmProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Which hosted tiers are available. Decided once, at startup.
#[derive(Debug, Clone, Default)]
pub struct IntentParserConfig {
    pub openai: Option<LlmProviderConfig>,
    pub anthropic: Option<LlmProviderConfig>,
}

impl IntentParserConfig {
    pub fn from_env() -> Self {
        Self {
            openai: provider_from_env(
                "OPENAI_API_KEY",
                "OPENAI_MODEL",
                DEFAULT_OPENAI_MODEL,
                "OPENAI_BASE_URL",
                DEFAULT_OPENAI_BASE_URL,
            ),
            anthropic: provider_from_env(
                "ANTHROPIC_API_KEY",
                "ANTHROPIC_MODEL",
                DEFAULT_ANTHROPIC_MODEL,
                "ANTHROPIC_BASE_URL",
                DEFAULT_ANTHROPIC_BASE_URL,
            ),
        }
    }
}

fn provider_from_env(
    key_var: &str,
    model_var: &str,
    default_model: &str,
    url_var: &str,
    default_url: &str,
) -> Option<LlmProviderConfig> {
    let Some(api_key) = std::env::var(key_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
    else {
        debug!("{} is not set, skipping tier", key_var);
        return None;
    };

    Some(LlmProviderConfig {
        api_key,
        model: std::env::var(model_var).unwrap_or_else(|_| default_model.to_string()),
        base_url: std::env::var(url_var)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| default_url.to_string()),
        timeout: DEFAULT_TIMEOUT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LlmProviderConfig {
            api_key: String::from("sk-secret"),
            model: String::from(DEFAULT_OPENAI_MODEL),
            base_url: String::from(DEFAULT_OPENAI_BASE_URL),
            timeout: DEFAULT_TIMEOUT,
        };

        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains(DEFAULT_OPENAI_MODEL));
    }
}
