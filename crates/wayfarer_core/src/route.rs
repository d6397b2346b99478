use geo::BoundingRect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::Coordinate;

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("Route geometry needs at least one point")]
    EmptyGeometry,

    #[error("Route {field} must be a finite, non-negative number, got {value}")]
    InvalidMeasure { field: &'static str, value: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineType {
    #[default]
    LineString,
}

/// Polyline of a route, shaped like a GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(rename = "type", default)]
    pub line_type: LineType,
    pub coordinates: Vec<Coordinate>,
}

impl RouteGeometry {
    pub fn line_string(coordinates: Vec<Coordinate>) -> Self {
        Self {
            line_type: LineType::LineString,
            coordinates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    #[serde(rename = "type")]
    pub maneuver_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    pub location: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    #[serde(default)]
    pub instruction: String,
    pub maneuver: Maneuver,
}

#[derive(Deserialize)]
struct RouteData {
    geometry: RouteGeometry,
    distance: f64,
    duration: f64,
    #[serde(default)]
    steps: Vec<RouteStep>,
}

impl TryFrom<RouteData> for Route {
    type Error = RouteError;

    fn try_from(data: RouteData) -> Result<Self, Self::Error> {
        Route::new(data.geometry, data.distance, data.duration, data.steps)
    }
}

/// A single-leg route as furnished by the routing provider.
///
/// Routes are never edited in place: asking for a different route always
/// yields a new value. `distance` and `duration` are the leg totals and are
/// trusted as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteData")]
pub struct Route {
    geometry: RouteGeometry,
    distance: f64,
    duration: f64,
    steps: Vec<RouteStep>,
}

impl Route {
    pub fn new(
        geometry: RouteGeometry,
        distance: f64,
        duration: f64,
        steps: Vec<RouteStep>,
    ) -> Result<Self, RouteError> {
        if geometry.coordinates.is_empty() {
            return Err(RouteError::EmptyGeometry);
        }

        check_measure("distance", distance)?;
        check_measure("duration", duration)?;

        Ok(Self {
            geometry,
            distance,
            duration,
            steps,
        })
    }

    pub fn geometry(&self) -> &RouteGeometry {
        &self.geometry
    }

    /// Meters
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    pub fn start(&self) -> Coordinate {
        self.geometry.coordinates[0]
    }

    pub fn end(&self) -> Coordinate {
        self.geometry.coordinates[self.geometry.coordinates.len() - 1]
    }

    /// Bounding box of the polyline, used by the map to fit the view.
    pub fn bounds(&self) -> Option<geo_types::Rect> {
        let line: geo_types::LineString = self
            .geometry
            .coordinates
            .iter()
            .map(|coordinate| geo_types::Coord::<f64>::from(coordinate))
            .collect();

        line.bounding_rect()
    }
}

fn check_measure(field: &'static str, value: f64) -> Result<(), RouteError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RouteError::InvalidMeasure { field, value })
    }
}
