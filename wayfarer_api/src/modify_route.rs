use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use tracing::{debug, info};
use wayfarer_core::{Coordinate, RouteModificationParams};
use wayfarer_intent::{IntentContext, ModifyRouteResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// Every field is optional so that a missing one is reported as a 400 with
/// a useful message instead of a generic deserialization failure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRouteBody {
    user_request: Option<String>,
    current_route: Option<CurrentRouteBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRouteBody {
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
    #[serde(default)]
    current_params: Option<RouteModificationParams>,
}

pub async fn modify_route_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ModifyRouteBody>, JsonRejection>,
) -> Result<Json<ModifyRouteResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        debug!("Rejected modify-route body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    })?;

    let (user_request, context) = validate(body)?;

    let intent = state.intent.interpret(&user_request, &context).await?;
    info!("Modified route: {}", intent.explanation);

    Ok(Json(intent.into()))
}

fn validate(body: ModifyRouteBody) -> Result<(String, IntentContext), ApiError> {
    let user_request = body
        .user_request
        .map(|request| request.trim().to_string())
        .filter(|request| !request.is_empty())
        .ok_or_else(|| ApiError::BadRequest(String::from("userRequest is required")))?;

    let current_route = body
        .current_route
        .ok_or_else(|| ApiError::BadRequest(String::from("currentRoute is required")))?;

    let origin = current_route
        .origin
        .ok_or_else(|| ApiError::BadRequest(String::from("currentRoute.origin is required")))?;

    let destination = current_route.destination.ok_or_else(|| {
        ApiError::BadRequest(String::from("currentRoute.destination is required"))
    })?;

    let mut context = IntentContext::new(origin, destination);
    context.current_params = current_route.current_params;

    Ok((user_request, context))
}
