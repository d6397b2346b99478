use serde::{Deserialize, Serialize};

use crate::route::Route;

pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.10;
pub const DEFAULT_DURATION_THRESHOLD: f64 = 0.15;

/// Relative deltas above which two routes count as different.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonThresholds {
    pub distance: f64,
    pub duration: f64,
}

impl Default for ComparisonThresholds {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE_THRESHOLD,
            duration: DEFAULT_DURATION_THRESHOLD,
        }
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct RouteComparator {
    thresholds: ComparisonThresholds,
}

impl RouteComparator {
    pub fn new(thresholds: ComparisonThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> ComparisonThresholds {
        self.thresholds
    }

    /// Whether `other` differs enough from `reference` to be worth offering.
    ///
    /// `reference` is the denominator of both ratios, so the result is not
    /// symmetric. A zero-length reference is degenerate: anything with a
    /// length is different from it, another zero-length route is not.
    pub fn is_significantly_different(&self, reference: &Route, other: &Route) -> bool {
        if reference.distance() == 0.0 {
            return other.distance() != 0.0;
        }

        let distance_delta = (reference.distance() - other.distance()).abs() / reference.distance();
        if distance_delta > self.thresholds.distance {
            return true;
        }

        if reference.duration() == 0.0 {
            return other.duration() != 0.0;
        }

        let duration_delta = (reference.duration() - other.duration()).abs() / reference.duration();
        duration_delta > self.thresholds.duration
    }

    /// Greedy, order-preserving filter over `candidates`.
    ///
    /// A candidate survives when it differs from every route kept before it
    /// and from `reference`. The reference, when given, is element 0 of the
    /// result.
    pub fn deduplicate(&self, candidates: &[Route], reference: Option<&Route>) -> Vec<Route> {
        let mut kept: Vec<Route> = Vec::with_capacity(candidates.len() + 1);

        for candidate in candidates {
            let differs_from_reference = reference
                .is_none_or(|reference| self.is_significantly_different(reference, candidate));
            if !differs_from_reference {
                continue;
            }

            if kept
                .iter()
                .any(|route| !self.is_significantly_different(route, candidate))
            {
                continue;
            }

            kept.push(candidate.clone());
        }

        if let Some(reference) = reference {
            kept.insert(0, reference.clone());
        }

        kept
    }
}

/// [`RouteComparator::is_significantly_different`] with the default thresholds.
pub fn is_significantly_different(reference: &Route, other: &Route) -> bool {
    RouteComparator::default().is_significantly_different(reference, other)
}

/// [`RouteComparator::deduplicate`] with the default thresholds.
pub fn deduplicate(candidates: &[Route], reference: Option<&Route>) -> Vec<Route> {
    RouteComparator::default().deduplicate(candidates, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coordinate::Coordinate, route::RouteGeometry};

    fn route(distance: f64, duration: f64) -> Route {
        let geometry = RouteGeometry::line_string(vec![
            Coordinate::new(4.0, 50.0).unwrap(),
            Coordinate::new(4.1, 50.1).unwrap(),
        ]);
        Route::new(geometry, distance, duration, vec![]).unwrap()
    }

    #[test]
    fn test_same_route_is_not_different() {
        let a = route(10_000.0, 1_200.0);
        assert!(!is_significantly_different(&a, &a));
        assert_eq!(
            is_significantly_different(&a, &route(12_000.0, 1_200.0)),
            is_significantly_different(&a, &route(12_000.0, 1_200.0))
        );
    }

    #[test]
    fn test_thresholds() {
        let reference = route(10_000.0, 1_200.0);

        // 5% distance, ~4% duration
        assert!(!is_significantly_different(
            &reference,
            &route(10_500.0, 1_250.0)
        ));
        // 20% distance
        assert!(is_significantly_different(
            &reference,
            &route(12_000.0, 1_200.0)
        ));
        // exactly 10% is not above the threshold
        assert!(!is_significantly_different(
            &reference,
            &route(11_000.0, 1_200.0)
        ));
        // 20% duration
        assert!(is_significantly_different(
            &reference,
            &route(10_000.0, 1_440.0)
        ));
    }

    #[test]
    fn test_asymmetric_denominator() {
        let short = route(10_000.0, 1_000.0);
        let long = route(10_950.0, 1_000.0);

        // 9.5% of the short route, ~8.7% of the long one
        assert!(!is_significantly_different(&short, &long));

        let comparator = RouteComparator::new(ComparisonThresholds {
            distance: 0.09,
            duration: 0.15,
        });
        assert!(comparator.is_significantly_different(&short, &long));
        assert!(!comparator.is_significantly_different(&long, &short));
    }

    #[test]
    fn test_degenerate_reference() {
        let empty = route(0.0, 0.0);
        assert!(!is_significantly_different(&empty, &route(0.0, 0.0)));
        assert!(!is_significantly_different(&empty, &route(0.0, 30.0)));
        assert!(is_significantly_different(&empty, &route(10.0, 0.0)));

        let instant = route(100.0, 0.0);
        assert!(!is_significantly_different(&instant, &route(100.0, 0.0)));
        assert!(is_significantly_different(&instant, &route(100.0, 5.0)));
    }

    #[test]
    fn test_deduplicate_against_reference() {
        let reference = route(10_000.0, 1_200.0);
        let a = route(10_500.0, 1_250.0);
        let b = route(12_000.0, 1_200.0);

        let kept = deduplicate(&[a, b.clone()], Some(&reference));

        assert_eq!(kept, vec![reference, b]);
    }

    #[test]
    fn test_deduplicate_only_near_duplicates() {
        let reference = route(10_000.0, 1_200.0);
        let candidates = vec![
            route(10_000.0, 1_200.0),
            route(10_200.0, 1_300.0),
            route(9_500.0, 1_100.0),
        ];

        assert_eq!(deduplicate(&candidates, Some(&reference)), vec![reference]);
    }

    #[test]
    fn test_deduplicate_first_seen_wins() {
        let first = route(20_000.0, 2_000.0);
        let near_first = route(20_500.0, 2_100.0);
        let other = route(30_000.0, 2_000.0);

        let kept = deduplicate(&[first.clone(), near_first, other.clone()], None);

        assert_eq!(kept, vec![first, other]);
        assert!(deduplicate(&[], None).is_empty());
    }
}
