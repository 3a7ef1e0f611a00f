//! Runtime configuration and validation.

use embassy_time::Duration;

use crate::constants::{mode, signal, threshold, timing};
use crate::error::ConfigError;

/// Tunable parameters of the monitor.
///
/// `Default` yields the factory values from [`constants`](crate::constants).
/// Override fields with the `with_*` setters, then let
/// [`Monitor::new`](crate::Monitor::new) validate the result.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    pub offset_smoothing: f32,
    pub ac_gain: f32,
    pub calibration: f32,
    pub floor_db: f32,
    /// Seed the DC offset with the first sample instead of zero.
    ///
    /// Off by default. Starting from zero, a source resting on a bias well
    /// above the calibration level reads as loud until the offset catches up,
    /// which raises and counts one alert at power-on.
    pub prime_offset: bool,
    pub threshold_db: f32,
    pub min_threshold_db: f32,
    pub max_threshold_db: f32,
    pub threshold_step_db: f32,
    pub debounce: Duration,
    pub monitor_below: f32,
    pub statistics_above: f32,
    pub cycle_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            offset_smoothing: signal::OFFSET_SMOOTHING,
            ac_gain: signal::AC_GAIN,
            calibration: signal::CALIBRATION,
            floor_db: signal::FLOOR_DB,
            prime_offset: false,
            threshold_db: threshold::DEFAULT_DB,
            min_threshold_db: threshold::MIN_DB,
            max_threshold_db: threshold::MAX_DB,
            threshold_step_db: threshold::STEP_DB,
            debounce: Duration::from_millis(threshold::DEBOUNCE_MS),
            monitor_below: mode::MONITOR_BELOW,
            statistics_above: mode::STATISTICS_ABOVE,
            cycle_interval: Duration::from_millis(timing::CYCLE_INTERVAL_MS),
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub const fn with_threshold_db(mut self, threshold_db: f32) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    #[must_use]
    pub const fn with_threshold_bounds(mut self, min_db: f32, max_db: f32) -> Self {
        self.min_threshold_db = min_db;
        self.max_threshold_db = max_db;
        self
    }

    #[must_use]
    pub const fn with_threshold_step_db(mut self, step_db: f32) -> Self {
        self.threshold_step_db = step_db;
        self
    }

    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub const fn with_offset_smoothing(mut self, smoothing: f32) -> Self {
        self.offset_smoothing = smoothing;
        self
    }

    #[must_use]
    pub const fn with_ac_gain(mut self, gain: f32) -> Self {
        self.ac_gain = gain;
        self
    }

    #[must_use]
    pub const fn with_calibration(mut self, calibration: f32) -> Self {
        self.calibration = calibration;
        self
    }

    #[must_use]
    pub const fn with_floor_db(mut self, floor_db: f32) -> Self {
        self.floor_db = floor_db;
        self
    }

    #[must_use]
    pub const fn with_prime_offset(mut self, prime: bool) -> Self {
        self.prime_offset = prime;
        self
    }

    #[must_use]
    pub const fn with_mode_band(mut self, monitor_below: f32, statistics_above: f32) -> Self {
        self.monitor_below = monitor_below;
        self.statistics_above = statistics_above;
        self
    }

    #[must_use]
    pub const fn with_cycle_interval(mut self, interval: Duration) -> Self {
        self.cycle_interval = interval;
        self
    }

    /// Check the parameters for consistency.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(0.0..1.0).contains(&self.offset_smoothing) {
            return Err(ConfigError::Smoothing);
        }
        if !(self.ac_gain > 0.0 && self.ac_gain.is_finite()) {
            return Err(ConfigError::Gain);
        }
        if !(self.calibration > 0.0 && self.calibration.is_finite()) {
            return Err(ConfigError::Calibration);
        }
        if !(self.min_threshold_db.is_finite()
            && self.max_threshold_db.is_finite()
            && self.min_threshold_db <= self.max_threshold_db)
        {
            return Err(ConfigError::ThresholdBounds);
        }
        if !(self.min_threshold_db..=self.max_threshold_db).contains(&self.threshold_db) {
            return Err(ConfigError::InitialThreshold);
        }
        if !(self.threshold_step_db > 0.0 && self.threshold_step_db.is_finite()) {
            return Err(ConfigError::ThresholdStep);
        }
        if !(0.0 <= self.monitor_below
            && self.monitor_below <= self.statistics_above
            && self.statistics_above <= 1.0)
        {
            return Err(ConfigError::HysteresisBand);
        }
        Ok(self)
    }
}
