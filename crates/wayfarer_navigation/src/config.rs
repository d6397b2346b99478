use tracing::warn;
use wayfarer_core::{ComparisonThresholds, Coordinate, CoordinateError};

pub const DEFAULT_ORIGIN: &str = "-122.4194,37.7749";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorConfig {
    /// Origin used whenever no live fix is available.
    pub default_origin: Coordinate,
    pub thresholds: ComparisonThresholds,
}

impl NavigatorConfig {
    pub fn new(default_origin: Coordinate) -> Self {
        Self {
            default_origin,
            thresholds: ComparisonThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: ComparisonThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Reads `WAYFARER_DEFAULT_ORIGIN`, `WAYFARER_DISTANCE_THRESHOLD` and
    /// `WAYFARER_DURATION_THRESHOLD`. Malformed values are logged and replaced
    /// by the defaults.
    pub fn from_env() -> Result<Self, CoordinateError> {
        let default_origin: Coordinate = match std::env::var("WAYFARER_DEFAULT_ORIGIN") {
            Ok(value) => value.parse::<Coordinate>().or_else(|error| {
                warn!("Invalid WAYFARER_DEFAULT_ORIGIN {:?}: {}", value, error);
                DEFAULT_ORIGIN.parse()
            })?,
            Err(_) => DEFAULT_ORIGIN.parse()?,
        };

        let defaults = ComparisonThresholds::default();
        let thresholds = ComparisonThresholds {
            distance: threshold_from_env("WAYFARER_DISTANCE_THRESHOLD", defaults.distance),
            duration: threshold_from_env("WAYFARER_DURATION_THRESHOLD", defaults.duration),
        };

        Ok(Self::new(default_origin).with_thresholds(thresholds))
    }
}

fn threshold_from_env(name: &str, default: f64) -> f64 {
    let Ok(value) = std::env::var(name) else {
        return default;
    };

    match value.trim().parse::<f64>() {
        Ok(threshold) if threshold.is_finite() && threshold >= 0.0 => threshold,
        _ => {
            warn!("Invalid {} {:?}, using {}", name, value, default);
            default
        }
    }
}
