//! Disobey 2026 badge bring-up and collaborator implementations.
//!
//! - **Display**: 320×170 ST7789 LCD over SPI with DMA, backlight on
//! - **Controls**: A raises the threshold, B lowers it, D-pad LEFT/RIGHT walk
//!   the mode axis
//! - **Alarm**: vibration motor plus both LED bars in red
//! - **Microphone**: I2S MEMS microphone, 16-bit mono

mod alarm;
mod display;
mod microphone;

pub use alarm::{
    AlarmLeds,
    BadgeAlarm,
};
pub use display::{
    Display,
    backlight_on,
};
use embassy_time::Instant;
use esp_hal::{
    Blocking,
    assign_resources,
    clock::{
        Clock as _,
        CpuClock,
    },
    gpio::{
        Input,
        InputConfig,
        Level,
        Output,
        OutputConfig,
        Pull,
    },
    rmt::{
        Rmt,
        Tx,
        TxChannelConfig,
        TxChannelCreator as _,
    },
    rom,
    time::Rate,
};
pub use microphone::{
    BadgeMicrophone,
    DEFAULT_SAMPLE_RATE,
};

use crate::controls::ButtonPanel;

// ── Pin / peripheral assignments ────────────────────────────────────────────

assign_resources! {
    pub Resources<'d> {
        display: DisplayResources<'d> {
            dc: GPIO15,
            rst: GPIO7,
            sck: GPIO4,
            cs: GPIO6,
            miso: GPIO16,
            mosi: GPIO5,
            spi: SPI2,
            dma: DMA_CH0,
        },
        backlight: BacklightResources<'d> {
            led: GPIO19,
        },
        buttons: ButtonResources<'d> {
            left: GPIO21,
            right: GPIO2,
            a: GPIO13,
            b: GPIO38,
        },
        leds: LedResources<'d> {
            power: GPIO17,
            io: GPIO18,
            rmt: RMT,
        },
        vibra: VibrationResources<'d> {
            motor: GPIO20,
        },
        mic: MicResources<'d> {
            ws: GPIO8,
            sd: GPIO3,
            dio: GPIO46,
            i2s: I2S0,
            dma: DMA_CH1,
        },
    }
}

/// Wall clock backed by the embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl crate::threshold::Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Threshold buttons and the D-pad mode axis.
pub type BadgeControls = ButtonPanel<Input<'static>>;

impl From<ButtonResources<'static>> for BadgeControls {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        ButtonPanel::new(
            Input::new(res.a, pull_up),
            Input::new(res.b, pull_up),
            Input::new(res.left, pull_up),
            Input::new(res.right, pull_up),
        )
    }
}

// ── Board initialisation ────────────────────────────────────────────────────

/// The ESP32-S3 has to pass through an intermediate CPU frequency before
/// reaching the target one.
fn set_cpu_clock(cpu_clock_speed: CpuClock) {
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .sysclk_conf()
        .modify(|_, w| unsafe { w.soc_clk_sel().bits(1) });
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .cpu_per_conf()
        .modify(|_, w| unsafe {
            let _ = w.pll_freq_sel().set_bit();
            w.cpuperiod_sel().bits(match cpu_clock_speed {
                CpuClock::_80MHz => 0,
                CpuClock::_160MHz => 1,
                CpuClock::_240MHz => 2,
                _ => panic!("Unsupported CPU clock speed"),
            })
        });

    rom::ets_update_cpu_frequency_rom(cpu_clock_speed.frequency().as_mhz());
}

/// Initialise the badge and return the raw peripheral set.
///
/// Call once at the top of `main`, then break the peripherals up with
/// [`split_resources!`](crate::split_resources).
#[must_use]
pub fn init() -> esp_hal::peripherals::Peripherals {
    set_cpu_clock(CpuClock::_160MHz);
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    esp_hal::init(config)
}

impl<'a> From<LedResources<'a>> for esp_hal::rmt::Channel<'a, Blocking, Tx> {
    fn from(res: LedResources<'a>) -> Self {
        // The LED supply stays enabled for as long as the firmware runs.
        core::mem::forget(Output::new(res.power, Level::High, OutputConfig::default()));
        let rmt = Rmt::new(res.rmt, Rate::from_mhz(40)).unwrap();
        let tx_config = TxChannelConfig::default().with_clk_divider(1);
        rmt.channel0.configure_tx(res.io, tx_config).unwrap()
    }
}

impl From<VibrationResources<'static>> for Output<'static> {
    fn from(res: VibrationResources<'static>) -> Self {
        Output::new(res.motor, Level::Low, OutputConfig::default())
    }
}
