/// Derives session step counts from a device step counter.
///
/// Hardware step counters report cumulative steps since the last device
/// reboot, not since app start. The first reading observed becomes the
/// baseline and every later reading is reported relative to it.
///
/// A reading below the baseline (a sensor reset) yields 0 rather than
/// underflowing; the regression itself is surfaced to callers as a smaller
/// session count, not corrected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepMeter {
    baseline: Option<u32>,
}

impl StepMeter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one cumulative reading and returns the session step count.
    pub fn observe(&mut self, cumulative: u32) -> u32 {
        let baseline = *self.baseline.get_or_insert(cumulative);
        cumulative.saturating_sub(baseline)
    }

    /// True once a baseline reading has been captured.
    #[must_use]
    pub fn is_primed(&self) -> bool {
        self.baseline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_becomes_the_baseline() {
        let mut meter = StepMeter::new();
        assert!(!meter.is_primed());
        assert_eq!(meter.observe(120_000), 0);
        assert!(meter.is_primed());
    }

    #[test]
    fn later_readings_are_relative_to_the_baseline() {
        let mut meter = StepMeter::new();
        meter.observe(120_000);
        assert_eq!(meter.observe(120_500), 500);
        assert_eq!(meter.observe(128_000), 8_000);
    }

    #[test]
    fn reading_below_baseline_saturates_at_zero() {
        let mut meter = StepMeter::new();
        meter.observe(120_000);
        // Sensor reset after a reboot: the baseline is not re-primed.
        assert_eq!(meter.observe(50), 0);
        assert_eq!(meter.observe(120_100), 100);
    }

    #[test]
    fn zero_baseline_passes_readings_through() {
        let mut meter = StepMeter::new();
        assert_eq!(meter.observe(0), 0);
        assert_eq!(meter.observe(42), 42);
    }
}
