#![forbid(unsafe_code)]

pub mod error;
pub mod journey;
pub mod sensor;
pub mod view;

pub use journey_core::Clock;

pub use error::JourneyServiceError;
pub use journey::JourneyService;
pub use sensor::{SensorFeed, SensorKind, SensorSample, StepSensor, report_sensor_missing};
pub use view::JourneyView;
