//! I2S MEMS microphone as a [`SampleSource`].
//!
//! WS on GPIO8, SD on GPIO3, BCLK on GPIO46. Samples arrive as signed 16-bit
//! PCM over DMA and are mapped onto the voltage scale before conditioning.

use esp_hal::{
    Blocking,
    dma::DmaDescriptor,
    i2s::master::{
        Channels,
        Config,
        DataFormat,
        I2s,
        I2sRx,
    },
    time::Rate,
};

use super::MicResources;
use crate::constants::signal::SAMPLES_PER_READING;
use crate::error::{
    Error,
    Result,
};
use crate::signal::{
    SampleSource,
    pcm_to_volts,
};

/// Microphone sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

pub struct BadgeMicrophone<'a> {
    rx: I2sRx<'a, Blocking>,
    pcm: [i16; SAMPLES_PER_READING],
}

impl<'a> BadgeMicrophone<'a> {
    /// `descriptors` must be `'static`; allocate them with
    /// [`mk_static!`](crate::mk_static).
    pub fn new(
        res: MicResources<'a>,
        sample_rate: u32,
        descriptors: &'static mut [DmaDescriptor],
    ) -> Self {
        let i2s = I2s::new(
            res.i2s,
            res.dma,
            Config::new_tdm_philips()
                .with_sample_rate(Rate::from_hz(sample_rate))
                .with_data_format(DataFormat::Data16Channel16)
                .with_channels(Channels::MONO),
        )
        .unwrap();

        let rx = i2s
            .i2s_rx
            .with_bclk(res.dio)
            .with_ws(res.ws)
            .with_din(res.sd)
            .build(descriptors);

        Self {
            rx,
            pcm: [0; SAMPLES_PER_READING],
        }
    }
}

impl SampleSource for BadgeMicrophone<'_> {
    fn read(&mut self, samples: &mut [f32]) -> Result<()> {
        for chunk in samples.chunks_mut(SAMPLES_PER_READING) {
            let pcm = &mut self.pcm[..chunk.len()];
            self.rx.read_words(pcm).map_err(|err| {
                error!("I2S read failed: {}", err);
                Error::Sample
            })?;
            for (out, &raw) in chunk.iter_mut().zip(pcm.iter()) {
                *out = pcm_to_volts(raw);
            }
        }
        Ok(())
    }
}
