//! Adjustable alert threshold with a shared debounce window.

use embassy_time::{Duration, Instant};

use crate::config::MonitorConfig;

/// Monotonic time source for debouncing.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Instant {
        T::now(self)
    }
}

/// Holds the alert threshold within `[min, max]`.
///
/// Both adjustment directions share one debounce window that starts at the
/// last accepted press. A press inside the window is dropped, whichever
/// button made it.
#[derive(Debug, Clone)]
pub struct ThresholdController {
    value: f32,
    min: f32,
    max: f32,
    step: f32,
    debounce: Duration,
    last_accepted: Option<Instant>,
}

impl ThresholdController {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            value: config
                .threshold_db
                .clamp(config.min_threshold_db, config.max_threshold_db),
            min: config.min_threshold_db,
            max: config.max_threshold_db,
            step: config.threshold_step_db,
            debounce: config.debounce,
            last_accepted: None,
        }
    }

    /// Current threshold in dB.
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Raise the threshold by one step. Returns `false` if debounced.
    pub fn increase(&mut self, now: Instant) -> bool {
        self.poll(true, false, now)
    }

    /// Lower the threshold by one step. Returns `false` if debounced.
    pub fn decrease(&mut self, now: Instant) -> bool {
        self.poll(false, true, now)
    }

    /// Apply one poll of both buttons.
    ///
    /// The debounce window is checked once for the whole poll. If it is open,
    /// a held increase is applied and then a held decrease, each clamped on
    /// its own, so pressing both nets out. Returns `true` if any press was
    /// accepted.
    pub fn poll(&mut self, increase: bool, decrease: bool, now: Instant) -> bool {
        if !(increase || decrease) {
            return false;
        }
        if !self.is_ready(now) {
            trace!("threshold press debounced");
            return false;
        }
        let before = self.value;
        if increase {
            self.value = (self.value + self.step).clamp(self.min, self.max);
        }
        if decrease {
            self.value = (self.value - self.step).clamp(self.min, self.max);
        }
        self.last_accepted = Some(now);
        if self.value != before {
            debug!("threshold {} dB -> {} dB", before, self.value);
        }
        true
    }

    /// `true` if a press at `now` would be accepted.
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_none_or(|elapsed| elapsed >= self.debounce),
        }
    }
}
