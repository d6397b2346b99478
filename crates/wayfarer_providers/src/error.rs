use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Routing provider unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("No route found")]
    NoRoute,

    #[error("No results for \"{0}\"")]
    NoResults(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Too many waypoints: {count} coordinates, at most {max} allowed")]
    TooManyWaypoints { count: usize, max: usize },

    #[error("Routing provider is not configured: {0}")]
    NotConfigured(String),
}

impl RoutingError {
    /// The provider answered, but had nothing for this query.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RoutingError::NoRoute | RoutingError::NoResults(_))
    }

    /// The provider could not be reached or failed on its side.
    pub fn is_unreachable(&self) -> bool {
        match self {
            RoutingError::Unreachable(_) => true,
            RoutingError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for RoutingError {
    fn from(error: serde_json::Error) -> Self {
        RoutingError::InvalidResponse(error.to_string())
    }
}
