use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WaypointError {
    #[error("waypoint name cannot be empty")]
    EmptyName,
}

/// A named milestone on the journey with a required cumulative step count.
///
/// Waypoints are immutable and defined at construction time; they only exist
/// inside an ordered [`Route`](crate::model::Route).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Waypoint {
    name: String,
    description: String,
    required_steps: u32,
}

impl Waypoint {
    /// Creates a new Waypoint.
    ///
    /// # Errors
    ///
    /// Returns `WaypointError::EmptyName` if the name is empty or
    /// whitespace-only.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        required_steps: u32,
    ) -> Result<Self, WaypointError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WaypointError::EmptyName);
        }

        Ok(Self {
            name: name.trim().to_owned(),
            description: description.into().trim().to_owned(),
            required_steps,
        })
    }

    // Accessors
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cumulative steps a walker must reach before arriving here.
    #[must_use]
    pub fn required_steps(&self) -> u32 {
        self.required_steps
    }
}
