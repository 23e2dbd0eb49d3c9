use chrono::{DateTime, Utc};
use serde::Serialize;

use journey_core::model::Snapshot;

/// Presentation-agnostic journey progress item.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The UI may render the fraction as a map-marker position and format the
/// counts as needed. `Serialize` is derived for machine-readable output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyView {
    /// Steps counted since app launch in this session.
    pub session_steps: u32,
    pub total_steps: u32,
    pub location_name: String,
    pub location_description: String,
    /// Whole-number journey percentage, 0..=100.
    pub percent: u8,
    /// Normalized journey completion in `[0.0, 1.0]`.
    pub fraction: f32,
    pub as_of: DateTime<Utc>,
}

impl JourneyView {
    #[must_use]
    pub fn from_snapshot(session_steps: u32, snapshot: &Snapshot, as_of: DateTime<Utc>) -> Self {
        let fraction = snapshot.fraction();
        Self {
            session_steps,
            total_steps: snapshot.total_steps(),
            location_name: snapshot.waypoint().name().to_owned(),
            location_description: snapshot.waypoint().description().to_owned(),
            percent: percent_of(fraction),
            fraction,
            as_of,
        }
    }
}

fn percent_of(fraction: f32) -> u8 {
    // fraction is clamped to [0, 1], so the rounded value fits in u8.
    (fraction * 100.0).round() as u8
}
