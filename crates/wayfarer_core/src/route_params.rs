use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Road classes the rest of the system speaks. Provider adapters translate
/// these into their own vocabulary.
pub const ROAD_CLASS_HIGHWAY: &str = "highway";
pub const ROAD_CLASS_TOLL: &str = "toll";
pub const ROAD_CLASS_FERRY: &str = "ferry";
pub const ROAD_CLASS_UNPAVED: &str = "unpaved";

pub const ROAD_CLASSES: [&str; 4] = [
    ROAD_CLASS_HIGHWAY,
    ROAD_CLASS_TOLL,
    ROAD_CLASS_FERRY,
    ROAD_CLASS_UNPAVED,
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
    DrivingTraffic,
}

impl RoutingProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingProfile::Driving => "driving",
            RoutingProfile::Walking => "walking",
            RoutingProfile::Cycling => "cycling",
            RoutingProfile::DrivingTraffic => "driving-traffic",
        }
    }
}

impl Display for RoutingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoutingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "driving" | "car" => Ok(RoutingProfile::Driving),
            "walking" | "foot" => Ok(RoutingProfile::Walking),
            "cycling" | "bike" => Ok(RoutingProfile::Cycling),
            "driving-traffic" | "traffic" => Ok(RoutingProfile::DrivingTraffic),
            other => Err(format!("Unknown routing profile: {other}")),
        }
    }
}

/// Constraints handed to the routing provider when asking for alternatives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteModificationParams {
    #[serde(default)]
    pub avoid: BTreeSet<String>,
    /// Intermediate stops, visited in order.
    #[serde(default)]
    pub waypoints: Vec<Coordinate>,
    #[serde(default)]
    pub profile: RoutingProfile,
}

impl RouteModificationParams {
    pub fn with_avoid(mut self, road_class: &str) -> Self {
        self.avoid.insert(road_class.to_string());
        self
    }

    pub fn with_profile(mut self, profile: RoutingProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn avoids(&self, road_class: &str) -> bool {
        self.avoid.contains(road_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_serde() {
        assert_eq!(
            serde_json::to_string(&RoutingProfile::DrivingTraffic).unwrap(),
            "\"driving-traffic\""
        );
        assert_eq!(
            serde_json::from_str::<RoutingProfile>("\"cycling\"").unwrap(),
            RoutingProfile::Cycling
        );
        assert_eq!(
            "driving_traffic".parse::<RoutingProfile>(),
            Ok(RoutingProfile::DrivingTraffic)
        );
        assert!("teleport".parse::<RoutingProfile>().is_err());
    }

    #[test]
    fn test_params_defaults_when_fields_missing() {
        let params: RouteModificationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, RouteModificationParams::default());
        assert_eq!(params.profile, RoutingProfile::Driving);

        let params: RouteModificationParams = serde_json::from_str(
            r#"{ "avoid": ["toll", "highway", "toll"], "waypoints": [[4.0, 50.0]] }"#,
        )
        .unwrap();
        assert_eq!(params.avoid.len(), 2);
        assert!(params.avoids(ROAD_CLASS_TOLL));
        assert_eq!(params.waypoints.len(), 1);
    }

    #[test]
    fn test_avoid_serializes_sorted() {
        let params = RouteModificationParams::default()
            .with_avoid(ROAD_CLASS_TOLL)
            .with_avoid(ROAD_CLASS_HIGHWAY);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["avoid"], serde_json::json!(["highway", "toll"]));
        assert_eq!(json["profile"], "driving");
    }
}
