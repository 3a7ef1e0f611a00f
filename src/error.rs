//! Error types for the monitor core.

use core::fmt;

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Offset smoothing must lie in `[0, 1)`.
    Smoothing,
    /// AC gain must be positive.
    Gain,
    /// Calibration reference must be positive.
    Calibration,
    /// Threshold bounds are inverted or not finite.
    ThresholdBounds,
    /// Initial threshold lies outside the bounds.
    InitialThreshold,
    /// Threshold step must be positive.
    ThresholdStep,
    /// Mode hysteresis band must satisfy `0 <= low <= high <= 1`.
    HysteresisBand,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::Smoothing => "offset smoothing must be in [0, 1)",
            ConfigError::Gain => "AC gain must be positive",
            ConfigError::Calibration => "calibration reference must be positive",
            ConfigError::ThresholdBounds => "threshold minimum must not exceed maximum",
            ConfigError::InitialThreshold => "initial threshold is outside its bounds",
            ConfigError::ThresholdStep => "threshold step must be positive",
            ConfigError::HysteresisBand => "mode band must satisfy 0 <= low <= high <= 1",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for ConfigError {}

/// Monitor error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The sample source could not deliver a full window.
    Sample,
    /// A sample was NaN or infinite.
    NonFiniteSample,
    /// The display rejected a draw call.
    Render,
    /// Invalid configuration.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Sample => write!(f, "sample acquisition failed"),
            Error::NonFiniteSample => write!(f, "sample window contains a non-finite value"),
            Error::Render => write!(f, "display rendering failed"),
            Error::Config(err) => write!(f, "configuration error: {}", err),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for monitor operations.
pub type Result<T> = core::result::Result<T, Error>;
