//! Alarm output: vibration motor and the WS2812 LED bars.
//!
//! The badge has no speaker, so an alert buzzes the motor and lights all ten
//! LEDs red until it clears.

use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::{
    Blocking,
    gpio::{
        Level,
        Output,
    },
    rmt::{
        Channel,
        PulseCode,
        Tx,
    },
};
use palette::{
    Srgb,
    named,
};

use crate::alert::Alarm;

/// Number of WS2812 LEDs on the badge (two bars of five).
pub const LED_COUNT: usize = 10;

/// Red dimmed to keep current draw sane.
const ALERT_COLOR: Srgb<u8> = Srgb::new(named::RED.red / 4, 0, 0);
const OFF: Srgb<u8> = Srgb::new(0, 0, 0);

/// Single-colour fill of the LED strip over RMT.
pub struct AlarmLeds<'a> {
    channel: Option<Channel<'a, Blocking, Tx>>,
}

impl<'a> AlarmLeds<'a> {
    pub const fn new(channel: Channel<'a, Blocking, Tx>) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    /// Show `color` on every LED.
    pub async fn fill(&mut self, color: Srgb<u8>) {
        let Some(channel) = self.channel.take() else {
            error!("RMT channel lost during previous transmission");
            return;
        };

        // WS2812 expects GRB byte order.
        let pulses = core::iter::repeat_n([color.green, color.red, color.blue], LED_COUNT)
            .flatten()
            .flat_map(byte_to_pulses)
            .chain(core::iter::once(PulseCode::end_marker()))
            .collect::<alloc::vec::Vec<_>>();

        let transaction = match channel.transmit(&pulses) {
            Ok(t) => t,
            Err(e) => {
                error!("RMT transmit failed: {}", e);
                return;
            }
        };

        self.channel = Some(match transaction.wait() {
            Ok(ch) => ch,
            Err((err, ch)) => {
                error!("RMT transaction failed: {}", err);
                ch
            }
        });

        // WS2812 reset time
        Timer::after(Duration::from_micros(50)).await;
    }
}

/// WS2812 bit timing at 40 MHz RMT clock.
const fn bit_to_pulse(bit: bool) -> PulseCode {
    if bit {
        // '1': 0.8 µs high, 0.45 µs low
        PulseCode::new(Level::High, 32, Level::Low, 18)
    } else {
        // '0': 0.4 µs high, 0.85 µs low
        PulseCode::new(Level::High, 16, Level::Low, 34)
    }
}

fn byte_to_pulses(byte: u8) -> [PulseCode; 8] {
    core::array::from_fn(|i| bit_to_pulse((byte >> (7 - i)) & 1 != 0))
}

/// Motor plus LED bars, switched together.
pub struct BadgeAlarm<'a> {
    motor: Output<'static>,
    leds: AlarmLeds<'a>,
    active: bool,
}

impl<'a> BadgeAlarm<'a> {
    pub fn new(motor: Output<'static>, leds: AlarmLeds<'a>) -> Self {
        Self {
            motor,
            leds,
            active: false,
        }
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Alarm for BadgeAlarm<'_> {
    async fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            self.motor.set_high();
            self.leds.fill(ALERT_COLOR).await;
        } else {
            self.motor.set_low();
            self.leds.fill(OFF).await;
        }
    }
}
