pub mod error;
pub mod health;
pub mod modify_route;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, Uri};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wayfarer_intent::api::MODIFY_ROUTE_PATH;

use crate::error::ApiError;
use crate::health::health_handler;
use crate::modify_route::modify_route_handler;
use crate::state::AppState;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route(MODIFY_ROUTE_PATH, post(modify_route_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
