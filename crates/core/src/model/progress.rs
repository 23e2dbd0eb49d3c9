use crate::model::route::Route;
use crate::model::waypoint::Waypoint;

/// Journey position as a pair of cumulative steps and waypoint index.
///
/// This is an immutable value: every update produces a new `ProgressState`
/// instead of mutating fields in place, so there is no hidden tracker state
/// to reason about in tests.
///
/// Step counts are not required to be monotonic. Passing a smaller total to
/// [`ProgressState::at_steps`] moves the index backward; callers that want to
/// guard against sensor resets must do so themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    total_steps: u32,
    waypoint_index: usize,
}

impl ProgressState {
    /// The state at the start of the journey: zero steps, first waypoint.
    #[must_use]
    pub fn start() -> Self {
        Self {
            total_steps: 0,
            waypoint_index: 0,
        }
    }

    /// Computes the state for an absolute cumulative step count.
    ///
    /// Scans the route from the last waypoint backward and picks the highest
    /// index whose threshold the count has reached (exactly matching a
    /// threshold counts as arrival). The first waypoint requires 0 steps, so
    /// a qualifying index always exists.
    #[must_use]
    pub fn at_steps(route: &Route, total_steps: u32) -> Self {
        let mut waypoint_index = 0;
        for (index, waypoint) in route.waypoints().iter().enumerate().rev() {
            if total_steps >= waypoint.required_steps() {
                waypoint_index = index;
                break;
            }
        }

        Self {
            total_steps,
            waypoint_index,
        }
    }

    /// Rebuilds a state from persisted fields without validation.
    ///
    /// An out-of-range index is tolerated here; [`ProgressState::snapshot`]
    /// falls back to the first waypoint when reading it.
    #[must_use]
    pub fn from_persisted(total_steps: u32, waypoint_index: usize) -> Self {
        Self {
            total_steps,
            waypoint_index,
        }
    }

    // Accessors
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    #[must_use]
    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    /// Derives the read-only view of this state against a route.
    ///
    /// The waypoint defaults to the route start if the stored index is out of
    /// bounds, and the fraction is 0 when the final threshold is 0.
    #[must_use]
    pub fn snapshot(&self, route: &Route) -> Snapshot {
        let waypoint = route
            .get(self.waypoint_index)
            .unwrap_or_else(|| route.first())
            .clone();

        let final_threshold = route.final_threshold();
        let fraction = if final_threshold == 0 {
            0.0
        } else {
            (self.total_steps as f32 / final_threshold as f32).clamp(0.0, 1.0)
        };

        Snapshot {
            total_steps: self.total_steps,
            waypoint,
            fraction,
        }
    }

    /// The waypoint after the current one, or `None` at the end of the route.
    #[must_use]
    pub fn next_waypoint<'a>(&self, route: &'a Route) -> Option<&'a Waypoint> {
        route.get(self.waypoint_index + 1)
    }
}

/// Derived, read-only progress view; computed on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    total_steps: u32,
    waypoint: Waypoint,
    fraction: f32,
}

impl Snapshot {
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// The waypoint reached at this step count.
    #[must_use]
    pub fn waypoint(&self) -> &Waypoint {
        &self.waypoint
    }

    /// Journey completion in `[0.0, 1.0]`, suitable for map-marker placement.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.fraction
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::route::RouteError;

    fn route() -> Route {
        Route::fellowship()
    }

    #[test]
    fn start_is_bag_end() {
        let state = ProgressState::at_steps(&route(), 0);
        assert_eq!(state.waypoint_index(), 0);

        let snapshot = state.snapshot(&route());
        assert_eq!(snapshot.waypoint().name(), "The Shire - Bag End");
        assert!((snapshot.fraction() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn threshold_is_inclusive() {
        // Exactly 40 miles worth of steps arrives at Bucklebury Ferry.
        let state = ProgressState::at_steps(&route(), 8_000);
        let snapshot = state.snapshot(&route());
        assert_eq!(snapshot.waypoint().name(), "Bucklebury Ferry");
    }

    #[test]
    fn one_step_short_stays_behind() {
        let state = ProgressState::at_steps(&route(), 7_999);
        let snapshot = state.snapshot(&route());
        assert_eq!(snapshot.waypoint().name(), "The Shire - Bag End");
    }

    #[test]
    fn final_threshold_completes_the_journey() {
        let state = ProgressState::at_steps(&route(), 250_000);
        let snapshot = state.snapshot(&route());
        assert_eq!(snapshot.waypoint().name(), "Mount Doom");
        assert!((snapshot.fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fraction_clamps_beyond_the_final_threshold() {
        let state = ProgressState::at_steps(&route(), 300_000);
        let snapshot = state.snapshot(&route());
        assert_eq!(snapshot.waypoint().name(), "Mount Doom");
        assert!((snapshot.fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn at_steps_picks_the_unique_bracketing_index() {
        let route = route();
        for &steps in &[0_u32, 1, 7_999, 8_000, 95_999, 96_000, 249_999, 250_000] {
            let state = ProgressState::at_steps(&route, steps);
            let i = state.waypoint_index();
            assert!(route.get(i).unwrap().required_steps() <= steps);
            if let Some(next) = route.get(i + 1) {
                assert!(next.required_steps() > steps);
            }
        }
    }

    #[test]
    fn fraction_is_always_in_unit_range() {
        let route = route();
        for &steps in &[0_u32, 1, 12_345, 250_000, 250_001, u32::MAX] {
            let fraction = ProgressState::at_steps(&route, steps)
                .snapshot(&route)
                .fraction();
            assert!((0.0..=1.0).contains(&fraction), "steps={steps}");
        }
    }

    #[test]
    fn smaller_totals_move_the_index_backward() {
        let route = route();
        let ahead = ProgressState::at_steps(&route, 50_000);
        assert_eq!(ahead.snapshot(&route).waypoint().name(), "Rivendell");

        // Not clamped: regression is permitted and visible.
        let behind = ProgressState::at_steps(&route, 10_000);
        assert_eq!(behind.snapshot(&route).waypoint().name(), "Bucklebury Ferry");
    }

    #[test]
    fn corrupt_persisted_index_falls_back_to_route_start() {
        let route = route();
        let state = ProgressState::from_persisted(12_000, 99);
        let snapshot = state.snapshot(&route);
        assert_eq!(snapshot.waypoint().name(), "The Shire - Bag End");
        assert_eq!(snapshot.total_steps(), 12_000);
    }

    #[test]
    fn zero_final_threshold_guards_division() {
        let single = Route::new(vec![Waypoint::new("Home", "", 0).unwrap()]).unwrap();
        let snapshot = ProgressState::at_steps(&single, 500).snapshot(&single);
        assert!((snapshot.fraction() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn next_waypoint_walks_the_table() {
        let route = route();
        let state = ProgressState::at_steps(&route, 0);
        assert_eq!(state.next_waypoint(&route).unwrap().name(), "Bucklebury Ferry");

        let done = ProgressState::at_steps(&route, 250_000);
        assert!(done.next_waypoint(&route).is_none());
    }

    #[test]
    fn two_waypoint_route_still_validates() {
        let route = Route::new(vec![
            Waypoint::new("Door", "", 0).unwrap(),
            Waypoint::new("Gate", "", 10).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            ProgressState::at_steps(&route, 9).snapshot(&route).waypoint().name(),
            "Door"
        );
        assert_eq!(
            ProgressState::at_steps(&route, 10).snapshot(&route).waypoint().name(),
            "Gate"
        );
        assert!(matches!(
            Route::new(vec![Waypoint::new("Gate", "", 10).unwrap()]),
            Err(RouteError::FirstThresholdNotZero)
        ));
    }
}
