//! Edge-triggered alert state machine and the alarm seam.

use crate::mode::Mode;

/// Audible (or tactile) alarm output.
#[allow(async_fn_in_trait)]
pub trait Alarm {
    /// Switch the alarm on or off.
    async fn set_active(&mut self, active: bool);
}

impl<T: Alarm + ?Sized> Alarm for &mut T {
    async fn set_active(&mut self, active: bool) {
        T::set_active(self, active).await;
    }
}

/// Whether the monitor is currently alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertState {
    #[default]
    Quiet,
    Alerting,
}

/// A change of [`AlertState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Quiet to alerting. The alarm turns on and the counter advances.
    Raised,
    /// Alerting to quiet. The alarm turns off.
    Cleared,
}

impl Transition {
    /// Alarm level after this transition.
    pub const fn alarm_active(self) -> bool {
        matches!(self, Transition::Raised)
    }
}

/// Compares each reading against the threshold and counts rising edges.
#[derive(Debug, Clone, Default)]
pub struct AlertStateMachine {
    state: AlertState,
    raised: u32,
}

impl AlertStateMachine {
    pub const fn new() -> Self {
        Self {
            state: AlertState::Quiet,
            raised: 0,
        }
    }

    pub const fn state(&self) -> AlertState {
        self.state
    }

    /// Number of quiet-to-alerting transitions since start.
    pub const fn alert_count(&self) -> u32 {
        self.raised
    }

    /// Feed one reading. Returns the transition, if the state changed.
    ///
    /// The alert condition is `reading > threshold` outside statistics mode.
    pub fn evaluate(&mut self, reading: f32, threshold: f32, mode: Mode) -> Option<Transition> {
        let condition = reading > threshold && mode != Mode::Statistics;
        match (self.state, condition) {
            (AlertState::Quiet, true) => {
                self.state = AlertState::Alerting;
                self.raised = self.raised.saturating_add(1);
                Some(Transition::Raised)
            }
            (AlertState::Alerting, false) => {
                self.state = AlertState::Quiet;
                Some(Transition::Cleared)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_episode_counts_once() {
        let mut sm = AlertStateMachine::new();
        let mut transitions = alloc::vec::Vec::new();
        let readings = [90.0, 110.0, 110.0, 110.0, 110.0, 110.0, 90.0];
        let mut alerting_cycles = 0;
        for r in readings {
            if let Some(t) = sm.evaluate(r, 100.0, Mode::Monitoring) {
                transitions.push(t);
            }
            if sm.state() == AlertState::Alerting {
                alerting_cycles += 1;
            }
        }
        assert_eq!(transitions, [Transition::Raised, Transition::Cleared]);
        assert_eq!(sm.alert_count(), 1);
        assert_eq!(alerting_cycles, 5);
    }

    #[test]
    fn test_equal_to_threshold_is_quiet() {
        let mut sm = AlertStateMachine::new();
        assert_eq!(sm.evaluate(100.0, 100.0, Mode::Monitoring), None);
        assert_eq!(sm.state(), AlertState::Quiet);
    }

    #[test]
    fn test_statistics_suppresses_alert() {
        let mut sm = AlertStateMachine::new();
        for _ in 0..10 {
            assert_eq!(sm.evaluate(120.0, 100.0, Mode::Statistics), None);
        }
        assert_eq!(sm.alert_count(), 0);
    }

    #[test]
    fn test_entering_statistics_clears_alert() {
        let mut sm = AlertStateMachine::new();
        assert_eq!(sm.evaluate(110.0, 100.0, Mode::Monitoring), Some(Transition::Raised));
        assert_eq!(sm.evaluate(110.0, 100.0, Mode::Statistics), Some(Transition::Cleared));
        // Back to monitoring while still loud is a new episode.
        assert_eq!(sm.evaluate(110.0, 100.0, Mode::Monitoring), Some(Transition::Raised));
        assert_eq!(sm.alert_count(), 2);
    }

    #[test]
    fn test_count_matches_runs() {
        let pattern = [
            false, true, true, false, false, true, false, true, true, true, false, true,
        ];
        let mut sm = AlertStateMachine::new();
        for loud in pattern {
            sm.evaluate(if loud { 105.0 } else { 95.0 }, 100.0, Mode::Monitoring);
        }
        let runs = pattern
            .windows(2)
            .filter(|w| !w[0] && w[1])
            .count()
            + usize::from(pattern[0]);
        assert_eq!(sm.alert_count() as usize, runs);
        assert_eq!(runs, 4);
    }

    #[test]
    fn test_alarm_level_of_transition() {
        assert!(Transition::Raised.alarm_active());
        assert!(!Transition::Cleared.alarm_active());
    }
}
