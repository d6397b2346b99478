use async_trait::async_trait;
use tracing::warn;
use wayfarer_core::{Coordinate, Place, PlaceSuggestion, Route, RouteModificationParams};

use crate::error::RoutingError;

/// Number of suggestions `search_places` resolves into full places.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Directions and place search, as offered by an external provider.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    fn name(&self) -> &str;

    /// The provider's preferred route between two points.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        params: &RouteModificationParams,
    ) -> Result<Route, RoutingError>;

    /// Every route the provider offers for the request, preferred one first.
    async fn alternatives(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        params: &RouteModificationParams,
    ) -> Result<Vec<Route>, RoutingError>;

    async fn suggest(
        &self,
        query: &str,
        proximity: Option<Coordinate>,
    ) -> Result<Vec<PlaceSuggestion>, RoutingError>;

    async fn retrieve(&self, suggestion: &PlaceSuggestion) -> Result<Place, RoutingError>;

    /// Suggest, then retrieve the top suggestions.
    ///
    /// Suggestions that fail to resolve are skipped; the call only fails when
    /// none of them could be retrieved.
    async fn search_places(
        &self,
        query: &str,
        proximity: Option<Coordinate>,
    ) -> Result<Vec<Place>, RoutingError> {
        let suggestions = self.suggest(query, proximity).await?;

        if suggestions.is_empty() {
            return Err(RoutingError::NoResults(query.to_string()));
        }

        let mut places = Vec::with_capacity(suggestions.len().min(DEFAULT_SEARCH_LIMIT));
        let mut first_error = None;

        for suggestion in suggestions.iter().take(DEFAULT_SEARCH_LIMIT) {
            match self.retrieve(suggestion).await {
                Ok(place) => places.push(place),
                Err(error) => {
                    warn!(
                        "{}: could not retrieve suggestion {}: {}",
                        self.name(),
                        suggestion.id,
                        error
                    );
                    first_error.get_or_insert(error);
                }
            }
        }

        match (places.is_empty(), first_error) {
            (true, Some(error)) => Err(error),
            _ => Ok(places),
        }
    }
}
