use async_trait::async_trait;

use crate::error::IntentError;

/// Chat endpoint of a hosted language model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// System + user prompt in, the model's JSON reply out (as text).
    async fn chat_json(&self, system_prompt: &str, user_prompt: &str)
    -> Result<String, IntentError>;

    fn model_name(&self) -> &str;

    fn provider_name(&self) -> &str;
}

const LOG_PREVIEW_CHARS: usize = 1000;

pub(crate) fn truncate_for_log(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
