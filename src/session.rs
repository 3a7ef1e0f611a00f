//! All per-device state, advanced once per cycle.

use embassy_time::Instant;

use crate::alert::{
    AlertState,
    AlertStateMachine,
    Transition,
};
use crate::config::MonitorConfig;
use crate::constants::history::CAPACITY;
use crate::error::Result;
use crate::history::HistoryBuffer;
use crate::mode::{
    Mode,
    ModeSelector,
};
use crate::signal::{
    SampleSource,
    SignalConditioner,
};
use crate::threshold::ThresholdController;
use crate::view::{
    View,
    assemble,
};

/// Control inputs sampled for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Inputs {
    pub increase: bool,
    pub decrease: bool,
    /// Mode axis position in `[0, 1]`.
    pub axis: f32,
}

/// What happened during one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub reading: f32,
    pub threshold: f32,
    pub mode: Mode,
    pub alert: AlertState,
    pub transition: Option<Transition>,
    pub alerts: u32,
}

/// Owner of the DC offset, history, threshold, mode and alert state.
#[derive(Debug, Clone)]
pub struct Session<const N: usize = CAPACITY> {
    conditioner: SignalConditioner,
    history: HistoryBuffer<N>,
    threshold: ThresholdController,
    mode: ModeSelector,
    alert: AlertStateMachine,
    last_reading: f32,
}

impl<const N: usize> Session<N> {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            conditioner: SignalConditioner::new(config),
            history: HistoryBuffer::new(),
            threshold: ThresholdController::new(config),
            mode: ModeSelector::new(config),
            alert: AlertStateMachine::new(),
            last_reading: config.floor_db,
        }
    }

    /// Take one reading from `source`.
    pub fn measure<S: SampleSource>(&mut self, source: &mut S) -> Result<f32> {
        self.conditioner.measure(source)
    }

    /// Record `reading`, apply the inputs and evaluate the alert condition.
    ///
    /// Both threshold buttons go through one debounced poll, so holding
    /// both leaves the threshold where it was.
    pub fn advance(&mut self, reading: f32, inputs: Inputs, now: Instant) -> Step {
        self.last_reading = reading;
        self.history.record(reading);

        self.threshold.poll(inputs.increase, inputs.decrease, now);
        let mode = self.mode.select(inputs.axis);

        let threshold = self.threshold.value();
        let transition = self.alert.evaluate(reading, threshold, mode);
        match transition {
            Some(Transition::Raised) => {
                info!(
                    "alert #{}: {} dB over {} dB",
                    self.alert.alert_count(),
                    reading,
                    threshold
                );
            }
            Some(Transition::Cleared) => info!("alert cleared at {} dB", reading),
            None => {}
        }

        Step {
            reading,
            threshold,
            mode,
            alert: self.alert.state(),
            transition,
            alerts: self.alert.alert_count(),
        }
    }

    /// View for the most recent reading.
    pub fn view(&self) -> View<'_, N> {
        assemble(
            self.mode.current(),
            self.alert.state(),
            self.last_reading,
            self.threshold.value(),
            &self.history,
            self.alert.alert_count(),
        )
    }

    /// Selected mode, with an active alert in monitoring reported as
    /// [`Mode::Alerting`]. The screen shows that state as the alert banner.
    pub fn effective_mode(&self) -> Mode {
        match (self.mode.current(), self.alert.state()) {
            (Mode::Monitoring, AlertState::Alerting) => Mode::Alerting,
            (mode, _) => mode,
        }
    }

    pub const fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub const fn threshold(&self) -> f32 {
        self.threshold.value()
    }

    pub const fn alert_state(&self) -> AlertState {
        self.alert.state()
    }

    pub const fn alert_count(&self) -> u32 {
        self.alert.alert_count()
    }

    pub const fn dc_offset(&self) -> f32 {
        self.conditioner.offset()
    }

    pub const fn history(&self) -> &HistoryBuffer<N> {
        &self.history
    }

    pub const fn last_reading(&self) -> f32 {
        self.last_reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::View;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn quiet() -> Inputs {
        Inputs::default()
    }

    fn session() -> Session<8> {
        Session::new(&MonitorConfig::default())
    }

    #[test]
    fn test_jump_over_threshold_counts_once() {
        let mut s = session();
        let mut readings = alloc::vec![90.0; 3];
        readings.extend([110.0; 5]);
        readings.extend([90.0; 3]);

        let mut active = 0;
        for (i, r) in readings.into_iter().enumerate() {
            let step = s.advance(r, quiet(), at(i as u64 * 30));
            if step.alert == AlertState::Alerting {
                active += 1;
            }
        }
        assert_eq!(s.alert_count(), 1);
        assert_eq!(active, 5);
        assert_eq!(s.alert_state(), AlertState::Quiet);
    }

    #[test]
    fn test_statistics_mode_suppresses_alarm() {
        let mut s = session();
        let stats = Inputs { axis: 0.9, ..quiet() };
        for i in 0..20 {
            let step = s.advance(115.0, stats, at(i * 30));
            assert_eq!(step.transition, None);
            assert_eq!(step.mode, Mode::Statistics);
        }
        assert_eq!(s.alert_count(), 0);
        assert!(matches!(s.view(), View::Statistics { alerts: 0 }));
    }

    #[test]
    fn test_buttons_move_threshold_with_debounce() {
        let mut s = session();
        let up = Inputs { increase: true, ..quiet() };
        // Held for 10 cycles of 30 ms: accepted at 0, 210 ms.
        for i in 0..10 {
            s.advance(50.0, up, at(i * 30));
        }
        assert_eq!(s.threshold(), 102.0);
    }

    #[test]
    fn test_both_buttons_in_one_cycle_cancel_out() {
        let mut s = session();
        let both = Inputs { increase: true, decrease: true, ..quiet() };
        s.advance(50.0, both, at(0));
        assert_eq!(s.threshold(), 100.0);

        // Letting go of B inside the window changes nothing yet.
        let up = Inputs { increase: true, ..quiet() };
        s.advance(50.0, up, at(30));
        assert_eq!(s.threshold(), 100.0);
        s.advance(50.0, up, at(210));
        assert_eq!(s.threshold(), 101.0);
    }

    #[test]
    fn test_lowered_threshold_triggers_alert() {
        let mut s = session();
        let down = Inputs { decrease: true, ..quiet() };
        let mut now = 0;
        let mut step = s.advance(95.0, quiet(), at(now));
        assert_eq!(step.alert, AlertState::Quiet);
        for _ in 0..6 {
            now += 250;
            step = s.advance(95.0, down, at(now));
        }
        assert_eq!(s.threshold(), 94.0);
        assert_eq!(step.alert, AlertState::Alerting);
        assert_eq!(step.alerts, 1);
    }

    #[test]
    fn test_effective_mode_and_view() {
        let mut s = session();
        s.advance(50.0, quiet(), at(0));
        assert_eq!(s.effective_mode(), Mode::Monitoring);
        assert!(matches!(s.view(), View::Live(_)));

        s.advance(105.0, quiet(), at(30));
        assert_eq!(s.effective_mode(), Mode::Alerting);
        assert_eq!(s.mode(), Mode::Monitoring);
        assert!(matches!(s.view(), View::Alert));

        s.advance(50.0, quiet(), at(60));
        assert_eq!(s.effective_mode(), Mode::Monitoring);
        match s.view() {
            View::Live(live) => assert_eq!(live.mode, Mode::Monitoring),
            other => panic!("expected live view, got {other:?}"),
        }
    }

    #[test]
    fn test_history_records_every_reading() {
        let mut s = session();
        for i in 0..10 {
            s.advance(40.0 + i as f32, quiet(), at(i * 30));
        }
        assert!(s.history().is_full());
        assert_eq!(s.history().latest(), Some(49.0));
        assert_eq!(s.last_reading(), 49.0);
    }
}
