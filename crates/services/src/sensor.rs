use std::sync::Arc;

use async_trait::async_trait;
use journey_core::model::StepMeter;

use crate::error::JourneyServiceError;
use crate::journey::JourneyService;
use crate::view::JourneyView;

/// Kind tag for device sensor samples. Only step-counter samples advance the
/// journey; everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    StepCounter,
    Other,
}

/// One raw sensor event: a cumulative step count since last device reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub cumulative_steps: u32,
}

impl SensorSample {
    #[must_use]
    pub fn step_counter(cumulative_steps: u32) -> Self {
        Self {
            kind: SensorKind::StepCounter,
            cumulative_steps,
        }
    }
}

/// Source of device step samples.
///
/// Implementations deliver samples one at a time; `None` ends the stream for
/// the session.
#[async_trait]
pub trait StepSensor: Send {
    async fn sample(&mut self) -> Option<SensorSample>;
}

/// Reports a missing step sensor once.
///
/// Sensor absence is informational and terminal for the session: the journey
/// continues with no step updates, and no retry is attempted.
pub fn report_sensor_missing() {
    tracing::warn!("no step counter sensor available; journey progress will not advance");
}

/// Drives the journey from a sensor sample stream.
///
/// Each consumed sample is metered into a session step count and recorded as
/// the absolute cumulative total, matching what the device reports for one
/// app session.
pub struct SensorFeed {
    meter: StepMeter,
    journey: Arc<JourneyService>,
}

impl SensorFeed {
    #[must_use]
    pub fn new(journey: Arc<JourneyService>) -> Self {
        Self {
            meter: StepMeter::new(),
            journey,
        }
    }

    /// True once a baseline reading has been consumed.
    #[must_use]
    pub fn is_primed(&self) -> bool {
        self.meter.is_primed()
    }

    /// Apply one sample.
    ///
    /// Returns the refreshed view when the sample was a step-counter reading,
    /// or `None` for ignored sample kinds.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` when persisting the update
    /// fails.
    pub async fn apply(
        &mut self,
        sample: SensorSample,
    ) -> Result<Option<JourneyView>, JourneyServiceError> {
        if sample.kind != SensorKind::StepCounter {
            return Ok(None);
        }

        let session_steps = self.meter.observe(sample.cumulative_steps);
        self.journey.record_steps(session_steps).await?;
        tracing::debug!(session_steps, "journey progress updated");

        Ok(Some(self.journey.view(session_steps)))
    }

    /// Consume samples until the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` when persisting an update
    /// fails; remaining samples are not consumed.
    pub async fn run(&mut self, sensor: &mut dyn StepSensor) -> Result<(), JourneyServiceError> {
        while let Some(sample) = sensor.sample().await {
            self.apply(sample).await?;
        }
        Ok(())
    }
}
