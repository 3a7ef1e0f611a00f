//! # noise-monitor
//!
//! Sound level monitor for the Disobey 2026 badge.
//!
//! Each cycle the monitor:
//! - samples the microphone and turns one window into a dB SPL estimate
//!   (DC offset tracking, RMS, log scaling, noise floor clamp)
//! - records the reading in a ring buffer used for the history graph
//! - polls the threshold buttons (shared debounce) and the mode axis
//!   (hysteresis band)
//! - raises or clears the alert on threshold crossings, counting each rising
//!   edge once and switching the alarm only on transitions
//! - draws the live readout, the alert banner or the statistics screen
//!
//! The core is hardware-independent and builds on the host. Enable the
//! `firmware` feature for the badge bring-up in [`board`] and the
//! `noise-monitor` binary.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let mut monitor = Monitor::new(
//!     MonitorConfig::default(),
//!     microphone,
//!     controls,
//!     alarm,
//!     display,
//!     SystemClock,
//! )?;
//! monitor.run(&mut embassy_time::Delay, &SHUTDOWN).await;
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod alert;
pub mod config;
pub mod constants;
pub mod controls;
mod error;
pub mod history;
pub mod mode;
pub mod monitor;
pub mod render;
pub mod session;
pub mod signal;
pub mod threshold;
pub mod view;

#[cfg(feature = "firmware")]
pub mod board;

pub use alert::{
    Alarm,
    AlertState,
    AlertStateMachine,
    Transition,
};
#[cfg(feature = "firmware")]
pub use board::*;
pub use config::MonitorConfig;
pub use controls::{
    Button,
    ButtonPanel,
    ControlPanel,
    SteppedAxis,
};
pub use error::{
    ConfigError,
    Error,
    Result,
};
pub use history::HistoryBuffer;
pub use mode::{
    Mode,
    ModeSelector,
};
pub use monitor::{
    Monitor,
    Shutdown,
};
pub use session::{
    Inputs,
    Session,
    Step,
};
pub use signal::{
    SampleSource,
    SignalConditioner,
};
pub use threshold::{
    Clock,
    ThresholdController,
};
pub use view::View;

/// StaticCell helper: allocates a value into a `static` exactly once.
#[cfg(feature = "firmware")]
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}
