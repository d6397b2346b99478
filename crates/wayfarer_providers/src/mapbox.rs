use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;
use wayfarer_core::{
    Coordinate, Maneuver, Place, PlaceSuggestion, Route, RouteGeometry, RouteModificationParams,
    RouteStep, RoutingProfile,
    route_params::{ROAD_CLASS_FERRY, ROAD_CLASS_HIGHWAY, ROAD_CLASS_TOLL, ROAD_CLASS_UNPAVED},
};

use crate::{error::RoutingError, routing_provider::RoutingProvider};

pub const MAPBOX_API_URL: &str = "https://api.mapbox.com";
pub const MAPBOX_DIRECTIONS_PATH: &str = "/directions/v5/mapbox";
pub const MAPBOX_SUGGEST_PATH: &str = "/search/searchbox/v1/suggest";
pub const MAPBOX_RETRIEVE_PATH: &str = "/search/searchbox/v1/retrieve";

const ACCESS_TOKEN_ENV_VAR: &str = "MAPBOX_ACCESS_TOKEN";
const BASE_URL_ENV_VAR: &str = "MAPBOX_BASE_URL";

/// Mapbox rejects requests with more coordinates than this.
const MAX_COORDINATES: usize = 25;
const SUGGEST_LIMIT: usize = 5;

#[derive(Deserialize)]
struct DirectionsResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    geometry: DirectionsGeometry,
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Deserialize)]
struct DirectionsGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    steps: Vec<DirectionsStep>,
}

#[derive(Deserialize)]
struct DirectionsStep {
    distance: f64,
    duration: f64,
    maneuver: DirectionsManeuver,
}

#[derive(Deserialize)]
struct DirectionsManeuver {
    #[serde(rename = "type")]
    maneuver_type: String,
    #[serde(default)]
    modifier: Option<String>,
    location: [f64; 2],
    #[serde(default)]
    instruction: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

#[derive(Deserialize)]
struct Suggestion {
    name: String,
    mapbox_id: String,
    #[serde(default)]
    full_address: Option<String>,
    #[serde(default)]
    place_formatted: Option<String>,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    features: Vec<RetrieveFeature>,
}

#[derive(Deserialize)]
struct RetrieveFeature {
    geometry: RetrieveGeometry,
    properties: RetrieveProperties,
}

#[derive(Deserialize)]
struct RetrieveGeometry {
    coordinates: [f64; 2],
}

#[derive(Deserialize)]
struct RetrieveProperties {
    name: String,
    mapbox_id: String,
    #[serde(default)]
    full_address: Option<String>,
    #[serde(default)]
    place_formatted: Option<String>,
}

pub struct MapboxClientParams {
    pub access_token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl MapboxClientParams {
    pub fn from_env() -> Result<Self, RoutingError> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                RoutingError::NotConfigured(format!("{ACCESS_TOKEN_ENV_VAR} is not set"))
            })?;

        Ok(Self {
            access_token,
            base_url: std::env::var(BASE_URL_ENV_VAR).unwrap_or_else(|_| MAPBOX_API_URL.into()),
            timeout: Duration::from_secs(15),
        })
    }
}

/// Directions and Search Box client for the Mapbox APIs.
///
/// Also works against any server exposing the same directions API shape
/// through `base_url`.
pub struct MapboxClient {
    params: MapboxClientParams,
    client: reqwest::Client,
    /// Search Box bills per session; a session ends with a retrieve.
    session_token: Mutex<String>,
}

impl MapboxClient {
    pub fn new(params: MapboxClientParams) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self {
            params,
            client,
            session_token: Mutex::new(Uuid::new_v4().to_string()),
        })
    }

    pub fn from_env() -> Result<Self, RoutingError> {
        Self::new(MapboxClientParams::from_env()?)
    }

    async fn fetch_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        params: &RouteModificationParams,
        alternatives: bool,
    ) -> Result<Vec<Route>, RoutingError> {
        let url = format!(
            "{}{}",
            self.params.base_url,
            directions_path(origin, destination, params)?
        );

        let mut query = vec![
            ("alternatives", alternatives.to_string()),
            ("geometries", String::from("geojson")),
            ("overview", String::from("full")),
            ("steps", String::from("true")),
            ("access_token", self.params.access_token.clone()),
        ];

        let exclude = exclude_classes(params);
        if !exclude.is_empty() {
            query.push(("exclude", exclude.join(",")));
        }

        debug!(
            "Mapbox: requesting directions, profile={}, exclude={:?}, waypoints={}",
            params.profile,
            exclude,
            params.waypoints.len()
        );

        let response = self.client.get(url).query(&query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(directions_error(status.as_u16(), &text));
        }

        parse_directions(&text)
    }

    fn session_token(&self) -> String {
        self.session_token.lock().clone()
    }

    fn end_session(&self) {
        *self.session_token.lock() = Uuid::new_v4().to_string();
    }
}

#[async_trait]
impl RoutingProvider for MapboxClient {
    fn name(&self) -> &str {
        "mapbox"
    }

    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        params: &RouteModificationParams,
    ) -> Result<Route, RoutingError> {
        self.fetch_directions(origin, destination, params, false)
            .await?
            .into_iter()
            .next()
            .ok_or(RoutingError::NoRoute)
    }

    async fn alternatives(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        params: &RouteModificationParams,
    ) -> Result<Vec<Route>, RoutingError> {
        self.fetch_directions(origin, destination, params, true)
            .await
    }

    async fn suggest(
        &self,
        query: &str,
        proximity: Option<Coordinate>,
    ) -> Result<Vec<PlaceSuggestion>, RoutingError> {
        let url = format!("{}{}", self.params.base_url, MAPBOX_SUGGEST_PATH);

        let mut params = vec![
            ("q", query.to_string()),
            ("limit", SUGGEST_LIMIT.to_string()),
            ("session_token", self.session_token()),
            ("access_token", self.params.access_token.clone()),
        ];
        if let Some(proximity) = proximity {
            params.push(("proximity", proximity.to_string()));
        }

        let response = self.client.get(url).query(&params).send().await?;
        let text = handle_response(response).await?;

        parse_suggestions(&text)
    }

    async fn retrieve(&self, suggestion: &PlaceSuggestion) -> Result<Place, RoutingError> {
        let url = format!(
            "{}{}/{}",
            self.params.base_url, MAPBOX_RETRIEVE_PATH, suggestion.id
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("session_token", self.session_token()),
                ("access_token", self.params.access_token.clone()),
            ])
            .send()
            .await?;
        let text = handle_response(response).await?;

        self.end_session();

        parse_retrieve(&text, &suggestion.id)
    }
}

async fn handle_response(response: reqwest::Response) -> Result<String, RoutingError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        Ok(text)
    } else {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);
        Err(RoutingError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn profile_path(profile: RoutingProfile) -> &'static str {
    match profile {
        RoutingProfile::Driving => "driving",
        RoutingProfile::Walking => "walking",
        RoutingProfile::Cycling => "cycling",
        RoutingProfile::DrivingTraffic => "driving-traffic",
    }
}

/// `/directions/v5/mapbox/{profile}/{lon,lat;...}` with waypoints between
/// origin and destination.
fn directions_path(
    origin: Coordinate,
    destination: Coordinate,
    params: &RouteModificationParams,
) -> Result<String, RoutingError> {
    let coordinates: Vec<String> = std::iter::once(origin)
        .chain(params.waypoints.iter().copied())
        .chain(std::iter::once(destination))
        .map(|coordinate| coordinate.to_string())
        .collect();

    if coordinates.len() > MAX_COORDINATES {
        return Err(RoutingError::TooManyWaypoints {
            count: coordinates.len(),
            max: MAX_COORDINATES,
        });
    }

    Ok(format!(
        "{}/{}/{}",
        MAPBOX_DIRECTIONS_PATH,
        profile_path(params.profile),
        coordinates.join(";")
    ))
}

/// Maps canonical road classes to Mapbox `exclude` values, keeping only the
/// ones the profile supports.
fn exclude_classes(params: &RouteModificationParams) -> Vec<&'static str> {
    params
        .avoid
        .iter()
        .filter_map(|road_class| {
            let mapped = match road_class.as_str() {
                ROAD_CLASS_HIGHWAY => "motorway",
                ROAD_CLASS_TOLL => "toll",
                ROAD_CLASS_FERRY => "ferry",
                ROAD_CLASS_UNPAVED => "unpaved",
                other => {
                    debug!("Mapbox: ignoring unknown road class {}", other);
                    return None;
                }
            };

            let supported = match params.profile {
                RoutingProfile::Driving | RoutingProfile::DrivingTraffic => true,
                RoutingProfile::Cycling => mapped == "ferry",
                RoutingProfile::Walking => false,
            };

            if !supported {
                debug!(
                    "Mapbox: profile {} cannot exclude {}",
                    params.profile, mapped
                );
            }

            supported.then_some(mapped)
        })
        .collect()
}

fn directions_error(status: u16, text: &str) -> RoutingError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            code: Some(code), ..
        }) if code == "NoRoute" || code == "NoSegment" => RoutingError::NoRoute,
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => RoutingError::Api { status, message },
        _ => RoutingError::Api {
            status,
            message: text.to_string(),
        },
    }
}

fn coordinate(value: [f64; 2]) -> Result<Coordinate, RoutingError> {
    Coordinate::try_from(value).map_err(|error| RoutingError::InvalidResponse(error.to_string()))
}

fn parse_directions(text: &str) -> Result<Vec<Route>, RoutingError> {
    let response: DirectionsResponse = serde_json::from_str(text)?;

    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(RoutingError::NoRoute),
        other => {
            return Err(RoutingError::InvalidResponse(format!(
                "{}: {}",
                other,
                response.message.unwrap_or_default()
            )));
        }
    }

    if response.routes.is_empty() {
        return Err(RoutingError::NoRoute);
    }

    response.routes.into_iter().map(convert_route).collect()
}

fn convert_route(route: DirectionsRoute) -> Result<Route, RoutingError> {
    let coordinates = route
        .geometry
        .coordinates
        .into_iter()
        .map(coordinate)
        .collect::<Result<Vec<_>, _>>()?;

    let steps = route
        .legs
        .into_iter()
        .flat_map(|leg| leg.steps)
        .map(|step| -> Result<RouteStep, RoutingError> {
            Ok(RouteStep {
                distance: step.distance,
                duration: step.duration,
                instruction: step.maneuver.instruction,
                maneuver: Maneuver {
                    maneuver_type: step.maneuver.maneuver_type,
                    modifier: step.maneuver.modifier,
                    location: coordinate(step.maneuver.location)?,
                },
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Route::new(
        RouteGeometry::line_string(coordinates),
        route.distance,
        route.duration,
        steps,
    )
    .map_err(|error| RoutingError::InvalidResponse(error.to_string()))
}

fn parse_suggestions(text: &str) -> Result<Vec<PlaceSuggestion>, RoutingError> {
    let response: SuggestResponse = serde_json::from_str(text)?;

    Ok(response
        .suggestions
        .into_iter()
        .map(|suggestion| PlaceSuggestion {
            id: suggestion.mapbox_id,
            name: suggestion.name,
            address: suggestion.full_address.or(suggestion.place_formatted),
        })
        .collect())
}

fn parse_retrieve(text: &str, id: &str) -> Result<Place, RoutingError> {
    let response: RetrieveResponse = serde_json::from_str(text)?;

    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::NoResults(id.to_string()))?;

    Ok(Place {
        id: feature.properties.mapbox_id,
        name: feature.properties.name,
        coordinates: coordinate(feature.geometry.coordinates)?,
        address: feature
            .properties
            .full_address
            .or(feature.properties.place_formatted),
    })
}
