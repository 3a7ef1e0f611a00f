//! The measurement loop: sample, update state, drive the alarm, render.

use embassy_futures::select::{
    Either,
    select,
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    signal::Signal,
};
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::DrawTarget,
};
use embedded_hal_async::delay::DelayNs;

use crate::alert::{
    Alarm,
    AlertState,
};
use crate::config::MonitorConfig;
use crate::constants::history::CAPACITY;
use crate::controls::{
    Button,
    ControlPanel,
};
use crate::error::{
    Error,
    Result,
};
use crate::render;
use crate::session::{
    Inputs,
    Session,
    Step,
};
use crate::signal::SampleSource;
use crate::threshold::Clock;

/// Stops [`Monitor::run`] after the cycle in progress.
pub type Shutdown = Signal<CriticalSectionRawMutex, ()>;

/// A [`Session`] wired to its collaborators.
pub struct Monitor<M, P, A, D, C, const N: usize = CAPACITY> {
    config: MonitorConfig,
    session: Session<N>,
    microphone: M,
    panel: P,
    alarm: A,
    display: D,
    clock: C,
}

impl<M, P, A, D, C, const N: usize> Monitor<M, P, A, D, C, N>
where
    M: SampleSource,
    P: ControlPanel,
    A: Alarm,
    D: DrawTarget<Color = Rgb565>,
    C: Clock,
{
    /// Validate `config` and build a monitor in its power-on state.
    ///
    /// For a biased microphone enable
    /// [`MonitorConfig::with_prime_offset`], or the first cycle counts an
    /// alert while the DC offset settles.
    pub fn new(
        config: MonitorConfig,
        microphone: M,
        panel: P,
        alarm: A,
        display: D,
        clock: C,
    ) -> Result<Self> {
        let config = config.validate()?;
        info!(
            "noise monitor: threshold {} dB in [{}, {}], floor {} dB",
            config.threshold_db,
            config.min_threshold_db,
            config.max_threshold_db,
            config.floor_db
        );
        Ok(Self {
            config,
            session: Session::new(&config),
            microphone,
            panel,
            alarm,
            display,
            clock,
        })
    }

    /// Run one cycle.
    ///
    /// A failed sample read skips the cycle before any state changes. A
    /// failed draw is reported after the state and alarm were updated.
    pub async fn cycle(&mut self) -> Result<Step> {
        let reading = self.session.measure(&mut self.microphone)?;

        let inputs = Inputs {
            increase: self.panel.is_asserted(Button::Increase),
            decrease: self.panel.is_asserted(Button::Decrease),
            axis: self.panel.axis_position(),
        };
        let step = self.session.advance(reading, inputs, self.clock.now());

        if let Some(transition) = step.transition {
            self.alarm.set_active(transition.alarm_active()).await;
        }

        render::draw_view(&mut self.display, &self.session.view()).map_err(|_| Error::Render)?;
        trace!(
            "{} dB, threshold {} dB, {}",
            step.reading,
            step.threshold,
            self.session.effective_mode()
        );
        Ok(step)
    }

    /// Cycle until `shutdown` is signalled, pausing `cycle_interval` between
    /// cycles. Leaves the alarm off.
    pub async fn run<T: DelayNs>(&mut self, delay: &mut T, shutdown: &Shutdown) {
        let pause_us = u32::try_from(self.config.cycle_interval.as_micros()).unwrap_or(u32::MAX);
        info!("monitoring, {} us between cycles", pause_us);

        loop {
            if let Err(err) = self.cycle().await {
                warn!("cycle skipped: {}", err);
            }
            if let Either::First(()) = select(shutdown.wait(), delay.delay_us(pause_us)).await {
                break;
            }
        }

        if self.session.alert_state() == AlertState::Alerting {
            self.alarm.set_active(false).await;
        }
        info!("monitor stopped, {} alerts", self.session.alert_count());
    }

    pub const fn session(&self) -> &Session<N> {
        &self.session
    }

    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub const fn display(&self) -> &D {
        &self.display
    }

    pub const fn alarm(&self) -> &A {
        &self.alarm
    }

    /// Mutable access to the display, e.g. for a splash screen before running.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
