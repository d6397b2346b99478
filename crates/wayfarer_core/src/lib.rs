pub mod comparator;
pub mod coordinate;
pub mod place;
pub mod route;
pub mod route_params;

pub use comparator::{ComparisonThresholds, RouteComparator, deduplicate, is_significantly_different};
pub use coordinate::{Coordinate, CoordinateError};
pub use place::{Place, PlaceSuggestion};
pub use route::{LineType, Maneuver, Route, RouteError, RouteGeometry, RouteStep};
pub use route_params::{RouteModificationParams, RoutingProfile};
