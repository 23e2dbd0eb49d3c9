use thiserror::Error;

use crate::model::waypoint::Waypoint;

/// Average walking steps per mile.
pub const STEPS_PER_MILE: u32 = 2000;

/// The journey is scaled down 10x so the full route stays achievable.
pub const SCALING_FACTOR: u32 = 10;

const fn miles(distance: u32) -> u32 {
    distance * STEPS_PER_MILE / SCALING_FACTOR
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteError {
    #[error("route must contain at least one waypoint")]
    Empty,

    #[error("the first waypoint must require 0 steps")]
    FirstThresholdNotZero,

    #[error("waypoint {index} does not increase the step threshold")]
    ThresholdNotIncreasing { index: usize },
}

//
// ─── ROUTE ─────────────────────────────────────────────────────────────────────
//

/// The ordered waypoint table for a journey.
///
/// Step thresholds are strictly increasing and the route always begins at a
/// zero-step waypoint, so any cumulative count maps onto exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Creates a route from an ordered waypoint list.
    ///
    /// # Errors
    ///
    /// Returns `RouteError` if the list is empty, the first waypoint requires
    /// steps, or thresholds are not strictly increasing.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, RouteError> {
        let Some(first) = waypoints.first() else {
            return Err(RouteError::Empty);
        };
        if first.required_steps() != 0 {
            return Err(RouteError::FirstThresholdNotZero);
        }
        for (index, pair) in waypoints.windows(2).enumerate() {
            if pair[1].required_steps() <= pair[0].required_steps() {
                return Err(RouteError::ThresholdNotIncreasing { index: index + 1 });
            }
        }

        Ok(Self { waypoints })
    }

    /// The Fellowship's journey from Bag End to Mount Doom.
    ///
    /// Distances are approximate miles from the books, scaled by
    /// [`STEPS_PER_MILE`] / [`SCALING_FACTOR`].
    ///
    /// # Panics
    ///
    /// Never panics in practice; the built-in table satisfies the route
    /// invariants.
    #[must_use]
    pub fn fellowship() -> Self {
        let entries = [
            (
                "The Shire - Bag End",
                "Your journey begins at Bilbo's home in Hobbiton",
                0,
            ),
            (
                "Bucklebury Ferry",
                "Crossing the Brandywine River to escape the Black Riders",
                miles(40),
            ),
            (
                "Bree",
                "The town where you meet Strider at the Prancing Pony",
                miles(80),
            ),
            (
                "Weathertop",
                "The ruins where Frodo is wounded by the Nazgûl",
                miles(120),
            ),
            (
                "Rivendell",
                "The house of Elrond, where the Fellowship is formed",
                miles(200),
            ),
            (
                "Moria - The Mines",
                "The ancient dwarven kingdom beneath the Misty Mountains",
                miles(400),
            ),
            (
                "Lothlórien",
                "The Golden Wood, realm of the Lady Galadriel",
                miles(480),
            ),
            (
                "Amon Hen",
                "Where the Fellowship breaks and Boromir falls",
                miles(580),
            ),
            (
                "Emyn Muil",
                "The rocky highlands where Frodo and Sam meet Gollum",
                miles(650),
            ),
            (
                "The Dead Marshes",
                "Treacherous swamps haunted by the dead",
                miles(750),
            ),
            (
                "The Black Gate",
                "The main entrance to Mordor - impassable",
                miles(850),
            ),
            (
                "Ithilien",
                "The fair land where Frodo meets Faramir",
                miles(950),
            ),
            (
                "Cirith Ungol",
                "The pass guarded by Shelob the spider",
                miles(1050),
            ),
            (
                "Plains of Gorgoroth",
                "The desolate wastes of Mordor",
                miles(1150),
            ),
            (
                "Mount Doom",
                "The final destination - the Crack of Doom",
                miles(1250),
            ),
        ];

        let waypoints = entries
            .into_iter()
            .map(|(name, description, required_steps)| {
                Waypoint::new(name, description, required_steps)
                    .expect("built-in waypoint should be valid")
            })
            .collect();

        Self::new(waypoints).expect("built-in route should be valid")
    }

    // Accessors
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Construction rejects empty routes, so this is always false.
        self.waypoints.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// The starting waypoint.
    #[must_use]
    pub fn first(&self) -> &Waypoint {
        // Invariant: the route is never empty.
        &self.waypoints[0]
    }

    /// The final destination.
    #[must_use]
    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Steps required to complete the whole journey.
    #[must_use]
    pub fn final_threshold(&self) -> u32 {
        self.last().required_steps()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(name: &str, steps: u32) -> Waypoint {
        Waypoint::new(name, "", steps).unwrap()
    }

    #[test]
    fn route_rejects_empty_table() {
        let err = Route::new(Vec::new()).unwrap_err();
        assert_eq!(err, RouteError::Empty);
    }

    #[test]
    fn route_rejects_nonzero_first_threshold() {
        let err = Route::new(vec![wp("Start", 10)]).unwrap_err();
        assert_eq!(err, RouteError::FirstThresholdNotZero);
    }

    #[test]
    fn route_rejects_non_increasing_thresholds() {
        let err = Route::new(vec![wp("A", 0), wp("B", 100), wp("C", 100)]).unwrap_err();
        assert_eq!(err, RouteError::ThresholdNotIncreasing { index: 2 });

        let err = Route::new(vec![wp("A", 0), wp("B", 100), wp("C", 50)]).unwrap_err();
        assert_eq!(err, RouteError::ThresholdNotIncreasing { index: 2 });
    }

    #[test]
    fn fellowship_route_shape() {
        let route = Route::fellowship();
        assert_eq!(route.len(), 15);
        assert_eq!(route.first().name(), "The Shire - Bag End");
        assert_eq!(route.last().name(), "Mount Doom");
        assert_eq!(route.final_threshold(), 250_000);
    }

    #[test]
    fn fellowship_scaled_thresholds() {
        let route = Route::fellowship();
        // 40 miles * 2000 steps/mile / 10 = 8000 steps to Bucklebury Ferry.
        assert_eq!(route.get(1).unwrap().required_steps(), 8_000);
        assert_eq!(route.get(4).unwrap().name(), "Rivendell");
        assert_eq!(route.get(4).unwrap().required_steps(), 40_000);
    }
}
