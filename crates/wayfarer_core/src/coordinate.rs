use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS: f64 = 6_371_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Coordinate components must be finite, got ({0}, {1})")]
    NotFinite(f64, f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Expected \"lon,lat\", got \"{0}\"")]
    Malformed(String),
}

/// A WGS84 position, always longitude first.
///
/// Serialized as a `[lon, lat]` array, which is what every provider we talk
/// to expects on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Result<Self, CoordinateError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(CoordinateError::NotFinite(lon, lat));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }

        Ok(Self { lon, lat })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, other: &Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lon, value.lat]
    }
}

impl From<Coordinate> for geo_types::Point {
    fn from(value: Coordinate) -> Self {
        geo_types::Point::new(value.lon, value.lat)
    }
}

impl From<&Coordinate> for geo_types::Point {
    fn from(value: &Coordinate) -> Self {
        geo_types::Point::new(value.lon, value.lat)
    }
}

impl From<&Coordinate> for geo_types::Coord {
    fn from(value: &Coordinate) -> Self {
        geo_types::Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

/// Parses the `lon,lat` form used in URLs and environment variables.
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| CoordinateError::Malformed(s.to_string()))?;

        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;

        Coordinate::new(lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(181.0, 0.0),
            Err(CoordinateError::LongitudeOutOfRange(181.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -90.5),
            Err(CoordinateError::LatitudeOutOfRange(-90.5))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(180.0, -90.0).is_ok());
    }

    #[test]
    fn test_serializes_longitude_first() {
        let coordinate = Coordinate::new(-122.4194, 37.7749).unwrap();
        let json = serde_json::to_string(&coordinate).unwrap();

        assert_eq!(json, "[-122.4194,37.7749]");

        let parsed: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, coordinate);
    }

    #[test]
    fn test_deserialize_validates() {
        let result = serde_json::from_str::<Coordinate>("[12.0, 95.0]");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_str() {
        let coordinate: Coordinate = "4.3517, 50.8503".parse().unwrap();
        assert_eq!(coordinate.lon(), 4.3517);
        assert_eq!(coordinate.lat(), 50.8503);

        assert!("4.3517".parse::<Coordinate>().is_err());
        assert!("abc,def".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_haversine_distance() {
        let brussels = Coordinate::new(4.3517, 50.8503).unwrap();
        let antwerp = Coordinate::new(4.4025, 51.2194).unwrap();

        let distance = brussels.haversine_distance(&antwerp);
        assert!((distance - 41_200.0).abs() < 500.0);
    }
}
