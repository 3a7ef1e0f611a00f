//! Operating modes and the hysteresis selector.

use crate::config::MonitorConfig;

/// Operating mode of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Live reading and history graph.
    #[default]
    Monitoring,
    /// Monitoring while the alarm is sounding. Never chosen by the selector.
    Alerting,
    /// Alert counter screen; the alarm is suppressed.
    Statistics,
}

impl Mode {
    /// Label shown on the live screen.
    pub const fn label(self) -> &'static str {
        match self {
            Mode::Monitoring => "Monitoring",
            Mode::Alerting => "Alert mode",
            Mode::Statistics => "Statistics",
        }
    }
}

/// Maps the axis position onto [`Mode::Monitoring`] or [`Mode::Statistics`].
///
/// Positions inside `[monitor_below, statistics_above]` keep the current mode.
#[derive(Debug, Clone)]
pub struct ModeSelector {
    mode: Mode,
    monitor_below: f32,
    statistics_above: f32,
}

impl ModeSelector {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            mode: Mode::Monitoring,
            monitor_below: config.monitor_below,
            statistics_above: config.statistics_above,
        }
    }

    pub const fn current(&self) -> Mode {
        self.mode
    }

    /// Update the mode from `position` and return it.
    pub fn select(&mut self, position: f32) -> Mode {
        let next = if position < self.monitor_below {
            Mode::Monitoring
        } else if position > self.statistics_above {
            Mode::Statistics
        } else {
            self.mode
        };
        if next != self.mode {
            info!("mode {} -> {}", self.mode, next);
            self.mode = next;
        }
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ModeSelector {
        ModeSelector::new(&MonitorConfig::default())
    }

    #[test]
    fn test_starts_monitoring() {
        assert_eq!(selector().current(), Mode::Monitoring);
    }

    #[test]
    fn test_extremes_select_modes() {
        let mut s = selector();
        assert_eq!(s.select(0.9), Mode::Statistics);
        assert_eq!(s.select(0.1), Mode::Monitoring);
    }

    #[test]
    fn test_band_holds_mode() {
        let mut s = selector();
        for p in [0.3, 0.45, 0.5, 0.7] {
            assert_eq!(s.select(p), Mode::Monitoring);
        }
        s.select(1.0);
        for p in [0.3, 0.45, 0.5, 0.7] {
            assert_eq!(s.select(p), Mode::Statistics);
        }
    }

    #[test]
    fn test_noisy_boundary_does_not_flap() {
        let mut s = selector();
        s.select(0.75);
        for p in [0.69, 0.71, 0.68, 0.72, 0.5, 0.31] {
            assert_eq!(s.select(p), Mode::Statistics);
        }
    }

    #[test]
    fn test_nan_keeps_mode() {
        let mut s = selector();
        s.select(1.0);
        assert_eq!(s.select(f32::NAN), Mode::Statistics);
    }

    #[test]
    fn test_never_selects_alerting() {
        let mut s = selector();
        for i in 0..=100 {
            assert_ne!(s.select(i as f32 / 100.0), Mode::Alerting);
        }
    }
}
