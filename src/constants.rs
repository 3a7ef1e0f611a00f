//! Fixed parameters of the sound level meter.
//!
//! These are the factory values; [`MonitorConfig`](crate::MonitorConfig)
//! starts from them and lets the firmware override the tunable ones.

/// Microphone signal chain.
pub mod signal {
    /// Samples taken for one reading.
    pub const SAMPLES_PER_READING: usize = 64;
    /// Weight of the previous DC offset estimate in the low-pass filter.
    pub const OFFSET_SMOOTHING: f32 = 0.95;
    /// Gain applied to the AC component before squaring.
    pub const AC_GAIN: f32 = 10.0;
    /// 0 dB SPL reference (20 µPa).
    pub const CALIBRATION: f32 = 0.000_02;
    /// Keeps `log10` away from zero.
    pub const LOG_EPSILON: f32 = 1e-12;
    /// Microphone noise floor; quieter readings are reported as this.
    pub const FLOOR_DB: f32 = 30.0;
    /// Full-scale voltage that raw samples are normalised onto.
    pub const FULL_SCALE_VOLTS: f32 = 3.3;
}

/// Alert threshold adjustment.
pub mod threshold {
    pub const MIN_DB: f32 = 30.0;
    pub const MAX_DB: f32 = 120.0;
    /// Threshold at power-on.
    pub const DEFAULT_DB: f32 = 100.0;
    /// Change per accepted button press.
    pub const STEP_DB: f32 = 1.0;
    /// Shared debounce window for both adjustment buttons.
    pub const DEBOUNCE_MS: u64 = 200;
}

/// Mode selection from the axis position.
pub mod mode {
    /// Positions below this select monitoring.
    pub const MONITOR_BELOW: f32 = 0.3;
    /// Positions above this select statistics.
    pub const STATISTICS_ABOVE: f32 = 0.7;
    /// Movement of the stepped axis per poll while a direction is held.
    pub const AXIS_STEP: f32 = 0.1;
}

/// Reading history.
pub mod history {
    /// One slot per graph column.
    pub const CAPACITY: usize = 128;
}

/// Screen layout.
pub mod display {
    /// Badge LCD width in pixels (landscape).
    pub const SCREEN_WIDTH: u32 = 320;
    /// Badge LCD height in pixels (landscape).
    pub const SCREEN_HEIGHT: u32 = 170;
    /// Height of the graph band in logical units; readings are scaled to fit.
    pub const GRAPH_BAND: f32 = 40.0;
    /// Screen pixels per logical graph unit, both axes.
    pub const GRAPH_PIXEL: u32 = 2;
}

/// Main loop timing.
pub mod timing {
    /// Pause between two cycles.
    pub const CYCLE_INTERVAL_MS: u64 = 30;
    /// How long the splash screen stays up at boot.
    pub const SPLASH_MS: u64 = 500;
}
