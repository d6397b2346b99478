use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use wayfarer_core::{
    Coordinate, RoutingProfile,
    route_params::{ROAD_CLASS_FERRY, ROAD_CLASS_HIGHWAY, ROAD_CLASS_TOLL, ROAD_CLASS_UNPAVED},
};

use crate::{
    error::IntentError,
    intent::{IntentContext, RouteIntent},
};

pub const DEFAULT_LLM_EXPLANATION: &str = "Updated your route preferences";

/// The JSON object language models are asked to produce.
///
/// Missing fields keep whatever the current route already uses.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LlmIntentReply {
    /// Road classes to avoid, from: highway, toll, ferry, unpaved.
    #[serde(default)]
    pub avoid: Option<Vec<String>>,

    /// Intermediate stops as [longitude, latitude] pairs, in visiting order.
    #[serde(default)]
    #[schemars(with = "Option<Vec<[f64; 2]>>")]
    pub waypoints: Option<Vec<Value>>,

    /// One of: driving, walking, cycling, driving-traffic.
    #[serde(default)]
    pub profile: Option<String>,

    /// One short sentence for the driver describing the change.
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Parses a model reply into a [`RouteIntent`], filling gaps from `context`.
pub fn parse_reply(text: &str, context: &IntentContext) -> Result<RouteIntent, IntentError> {
    let mut value = first_json_value(text)?;

    // Some models echo the endpoint's response shape back
    if let Some(inner) = value.get("modifiedParams").cloned() {
        let explanation = value.get("explanation").cloned();
        value = inner;
        if let (Some(explanation), Some(object)) = (explanation, value.as_object_mut()) {
            object.entry("explanation").or_insert(explanation);
        }
    }

    let reply: LlmIntentReply = serde_json::from_value(value)?;

    Ok(normalize(reply, context))
}

fn normalize(reply: LlmIntentReply, context: &IntentContext) -> RouteIntent {
    let mut params = context.base_params();

    if let Some(avoid) = reply.avoid {
        params.avoid = avoid
            .iter()
            .filter_map(|tag| {
                let road_class = canonical_road_class(tag);
                if road_class.is_none() {
                    debug!("Dropping unknown road class from reply: {}", tag);
                }
                road_class.map(str::to_string)
            })
            .collect();
    }

    if let Some(waypoints) = reply.waypoints {
        params.waypoints = waypoints.iter().filter_map(parse_waypoint).collect();
    }

    if let Some(profile) = reply.profile {
        match profile.parse::<RoutingProfile>() {
            Ok(profile) => params.profile = profile,
            Err(error) => debug!("{}, keeping {}", error, params.profile),
        }
    }

    let explanation = reply
        .explanation
        .map(|explanation| explanation.trim().to_string())
        .filter(|explanation| !explanation.is_empty())
        .unwrap_or_else(|| DEFAULT_LLM_EXPLANATION.to_string());

    RouteIntent {
        params,
        explanation,
    }
}

pub fn canonical_road_class(tag: &str) -> Option<&'static str> {
    match tag.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
        "highway" | "highways" | "motorway" | "motorways" | "freeway" | "freeways"
        | "interstate" | "interstates" => Some(ROAD_CLASS_HIGHWAY),
        "toll" | "tolls" | "toll road" | "toll roads" => Some(ROAD_CLASS_TOLL),
        "ferry" | "ferries" => Some(ROAD_CLASS_FERRY),
        "unpaved" | "dirt" | "gravel" | "unpaved road" | "unpaved roads" => {
            Some(ROAD_CLASS_UNPAVED)
        }
        _ => None,
    }
}

/// Accepts `[lon, lat]` arrays and `{lon|lng|longitude, lat|latitude}`
/// objects. Anything else, or an invalid position, is dropped.
fn parse_waypoint(value: &Value) -> Option<Coordinate> {
    let (lon, lat) = match value {
        Value::Array(items) if items.len() == 2 => (items[0].as_f64()?, items[1].as_f64()?),
        Value::Object(object) => {
            let lon = ["lon", "lng", "longitude"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_f64))?;
            let lat = ["lat", "latitude"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_f64))?;
            (lon, lat)
        }
        _ => return None,
    };

    Coordinate::new(lon, lat)
        .inspect_err(|error| debug!("Dropping waypoint from reply: {}", error))
        .ok()
}

/// Strips markdown fences and surrounding prose.
/// The first JSON value starting at the first `{`, ignoring whatever follows
/// it (closing fences, more prose, a second object).
fn first_json_value(text: &str) -> Result<Value, IntentError> {
    let start = text
        .find('{')
        .ok_or_else(|| IntentError::InvalidReply(String::from("no JSON object in reply")))?;

    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| IntentError::InvalidReply(String::from("no JSON object in reply")))?
        .map_err(IntentError::from)
}
