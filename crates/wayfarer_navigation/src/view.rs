//! Read-only projection of a [`NavigationSession`] for the display layer.

use jiff::{SignedDuration, Timestamp};
use wayfarer_core::{Coordinate, Route, RouteModificationParams, RoutingProfile};

use crate::{
    notice::Notice,
    session::NavigationSession,
    state::NavigationStateKind,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub distance_text: String,
    pub duration_text: String,
    pub eta: Option<Timestamp>,
    pub steps: usize,
}

impl RouteSummary {
    pub fn new(route: &Route, now: Timestamp) -> Self {
        Self {
            distance: route.distance(),
            duration: route.duration(),
            distance_text: format_distance(route.distance()),
            duration_text: format_duration(route.duration()),
            eta: now
                .checked_add(SignedDuration::from_secs(route.duration().round() as i64))
                .ok(),
            steps: route.steps().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSummary {
    pub index: usize,
    pub summary: RouteSummary,
    /// Relative to the current route, `0.2` is 20% longer.
    pub distance_delta: f64,
    pub duration_delta: f64,
    pub is_current: bool,
    pub is_selected: bool,
}

/// South-west and north-east corners, for fitting the map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapBounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl MapBounds {
    fn of_route(route: &Route) -> Option<Self> {
        let rect = route.bounds()?;
        Some(Self {
            south_west: Coordinate::new(rect.min().x, rect.min().y).ok()?,
            north_east: Coordinate::new(rect.max().x, rect.max().y).ok()?,
        })
    }

    fn union(self, other: Self) -> Self {
        let corner = |lon: f64, lat: f64, fallback: Coordinate| {
            Coordinate::new(lon, lat).unwrap_or(fallback)
        };

        Self {
            south_west: corner(
                self.south_west.lon().min(other.south_west.lon()),
                self.south_west.lat().min(other.south_west.lat()),
                self.south_west,
            ),
            north_east: corner(
                self.north_east.lon().max(other.north_east.lon()),
                self.north_east.lat().max(other.north_east.lat()),
                self.north_east,
            ),
        }
    }
}

/// Everything a display needs, derived from the session and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationView {
    pub state: NavigationStateKind,
    pub destination: Option<String>,
    pub route: Option<RouteSummary>,
    pub avoid: Vec<String>,
    pub profile: RoutingProfile,
    pub candidates: Vec<CandidateSummary>,
    pub selected_candidate: Option<usize>,
    pub bounds: Option<MapBounds>,
    pub calculating: bool,
    pub position: Option<Coordinate>,
    pub banner: Option<Notice>,
}

impl NavigationView {
    pub fn project(
        session: &NavigationSession,
        position: Option<Coordinate>,
        banner: Option<Notice>,
        now: Timestamp,
    ) -> Self {
        let state = session.state();
        let active = state.active();
        let reference = active.map(|active| &active.route);
        let selected = state.selected_candidate_index();

        let candidates: Vec<CandidateSummary> = match reference {
            Some(reference) => state
                .candidate_routes()
                .iter()
                .enumerate()
                .map(|(index, route)| CandidateSummary {
                    index,
                    summary: RouteSummary::new(route, now),
                    distance_delta: relative_delta(reference.distance(), route.distance()),
                    duration_delta: relative_delta(reference.duration(), route.duration()),
                    is_current: index == 0,
                    is_selected: selected == Some(index),
                })
                .collect(),
            None => Vec::new(),
        };

        let bounds = if candidates.is_empty() {
            reference.and_then(MapBounds::of_route)
        } else {
            state
                .candidate_routes()
                .iter()
                .filter_map(MapBounds::of_route)
                .reduce(MapBounds::union)
        };

        let params = active
            .map(|active| active.params.clone())
            .unwrap_or_else(RouteModificationParams::default);

        Self {
            state: state.kind(),
            destination: state.destination().map(|place| place.label()),
            route: reference.map(|route| RouteSummary::new(route, now)),
            avoid: params.avoid.into_iter().collect(),
            profile: params.profile,
            candidates,
            selected_candidate: selected,
            bounds,
            calculating: session.is_calculating_route(),
            position,
            banner,
        }
    }
}

fn relative_delta(reference: f64, other: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        (other - reference) / reference
    }
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else if meters < 100_000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{:.0} km", meters / 1000.0)
    }
}

pub fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round() as u64;

    match (minutes / 60, minutes % 60) {
        (0, 0) => String::from("<1 min"),
        (0, minutes) => format!("{minutes} min"),
        (hours, 0) => format!("{hours} h"),
        (hours, minutes) => format!("{hours} h {minutes} min"),
    }
}

/// `+20%`, `-5%`, `same`
pub fn format_delta(ratio: f64) -> String {
    let percent = (ratio * 100.0).round();
    if percent == 0.0 {
        String::from("same")
    } else {
        format!("{percent:+.0}%")
    }
}
