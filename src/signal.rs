//! Microphone signal conditioning: DC offset tracking, RMS and dB conversion.
//!
//! The microphone output rides on a resting bias. A single-pole low-pass
//! filter follows that bias, the remainder is amplified and squared, and the
//! RMS of one window is expressed in dB relative to the calibration
//! reference, clamped to the noise floor.

use crate::config::MonitorConfig;
use crate::constants::signal::{FULL_SCALE_VOLTS, LOG_EPSILON, SAMPLES_PER_READING};
use crate::error::{Error, Result};

/// Source of raw microphone samples on the voltage scale.
pub trait SampleSource {
    /// Fill `samples` with consecutive readings.
    ///
    /// Any failure discards the whole window.
    fn read(&mut self, samples: &mut [f32]) -> Result<()>;
}

impl<T: SampleSource + ?Sized> SampleSource for &mut T {
    fn read(&mut self, samples: &mut [f32]) -> Result<()> {
        T::read(self, samples)
    }
}

/// Map a signed 16-bit PCM sample onto `0..FULL_SCALE_VOLTS`.
///
/// Silence (0) lands on the mid-scale bias.
pub fn pcm_to_volts(sample: i16) -> f32 {
    (f32::from(sample) + 32768.0) / 65536.0 * FULL_SCALE_VOLTS
}

/// Convert an RMS amplitude into dB against `calibration`, never below `floor_db`.
pub fn rms_to_db(rms: f32, calibration: f32, floor_db: f32) -> f32 {
    let db = 20.0 * libm::log10f(rms / calibration + LOG_EPSILON);
    if db.is_finite() { db.max(floor_db) } else { floor_db }
}

/// Turns windows of raw samples into sound level readings.
///
/// Owns the DC offset estimate, which carries over from one window to the next.
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    offset: f32,
    primed: bool,
    smoothing: f32,
    gain: f32,
    calibration: f32,
    floor_db: f32,
}

impl SignalConditioner {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            offset: 0.0,
            primed: !config.prime_offset,
            smoothing: config.offset_smoothing,
            gain: config.ac_gain,
            calibration: config.calibration,
            floor_db: config.floor_db,
        }
    }

    /// Current DC offset estimate.
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    pub const fn floor_db(&self) -> f32 {
        self.floor_db
    }

    /// Read one window from `source` and return its level in dB.
    ///
    /// On error the offset is left untouched.
    pub fn measure<S: SampleSource>(&mut self, source: &mut S) -> Result<f32> {
        let mut window = [0.0f32; SAMPLES_PER_READING];
        source.read(&mut window)?;
        if window.iter().any(|s| !s.is_finite()) {
            return Err(Error::NonFiniteSample);
        }
        Ok(self.process(&window))
    }

    /// Run a window of finite samples through the filter.
    pub fn process(&mut self, window: &[f32]) -> f32 {
        let Some(&first) = window.first() else {
            return self.floor_db;
        };
        if !self.primed {
            self.offset = first;
            self.primed = true;
        }

        let mut sum_of_squares = 0.0f32;
        for &sample in window {
            self.offset = self.smoothing * self.offset + (1.0 - self.smoothing) * sample;
            let ac = (sample - self.offset) * self.gain;
            sum_of_squares += ac * ac;
        }

        let rms = libm::sqrtf(sum_of_squares / window.len() as f32);
        rms_to_db(rms, self.calibration, self.floor_db)
    }
}
