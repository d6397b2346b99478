use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Invalid intent reply: {0}")]
    InvalidReply(String),

    #[error("Intent provider is not configured: {0}")]
    NotConfigured(String),
}

impl From<serde_json::Error> for IntentError {
    fn from(error: serde_json::Error) -> Self {
        IntentError::InvalidReply(error.to_string())
    }
}
