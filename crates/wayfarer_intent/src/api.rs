//! Wire types of `POST /api/modify-route`.

use serde::{Deserialize, Serialize};
use wayfarer_core::{Coordinate, RouteModificationParams};

use crate::intent::{IntentContext, RouteIntent};

pub const MODIFY_ROUTE_PATH: &str = "/api/modify-route";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRoute {
    pub origin: Coordinate,
    pub destination: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_params: Option<RouteModificationParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRouteRequest {
    pub user_request: String,
    pub current_route: CurrentRoute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRouteResponse {
    pub modified_params: RouteModificationParams,
    pub explanation: String,
}

impl ModifyRouteRequest {
    pub fn new(utterance: &str, context: &IntentContext) -> Self {
        Self {
            user_request: utterance.to_string(),
            current_route: CurrentRoute::from(context.clone()),
        }
    }
}

impl From<IntentContext> for CurrentRoute {
    fn from(context: IntentContext) -> Self {
        Self {
            origin: context.origin,
            destination: context.destination,
            current_params: context.current_params,
        }
    }
}

impl From<CurrentRoute> for IntentContext {
    fn from(route: CurrentRoute) -> Self {
        Self {
            origin: route.origin,
            destination: route.destination,
            current_params: route.current_params,
        }
    }
}

impl From<RouteIntent> for ModifyRouteResponse {
    fn from(intent: RouteIntent) -> Self {
        Self {
            modified_params: intent.params,
            explanation: intent.explanation,
        }
    }
}

impl From<ModifyRouteResponse> for RouteIntent {
    fn from(response: ModifyRouteResponse) -> Self {
        Self {
            params: response.modified_params,
            explanation: response.explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wayfarer_core::RoutingProfile;

    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let context = IntentContext::new(
            Coordinate::new(-122.4194, 37.7749).unwrap(),
            Coordinate::new(-122.2712, 37.8044).unwrap(),
        );

        let value = serde_json::to_value(ModifyRouteRequest::new("avoid tolls", &context)).unwrap();

        assert_eq!(
            value,
            json!({
                "userRequest": "avoid tolls",
                "currentRoute": {
                    "origin": [-122.4194, 37.7749],
                    "destination": [-122.2712, 37.8044]
                }
            })
        );
    }

    #[test]
    fn test_response_wire_shape() {
        let response = ModifyRouteResponse {
            modified_params: RouteModificationParams::default()
                .with_avoid("highway")
                .with_profile(RoutingProfile::DrivingTraffic),
            explanation: String::from("Avoiding highways"),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "modifiedParams": {
                    "avoid": ["highway"],
                    "waypoints": [],
                    "profile": "driving-traffic"
                },
                "explanation": "Avoiding highways"
            })
        );
    }
}
