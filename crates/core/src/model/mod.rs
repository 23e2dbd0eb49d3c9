mod progress;
mod route;
mod steps;
mod waypoint;

pub use progress::{ProgressState, Snapshot};
pub use route::{Route, RouteError, SCALING_FACTOR, STEPS_PER_MILE};
pub use steps::StepMeter;
pub use waypoint::{Waypoint, WaypointError};
