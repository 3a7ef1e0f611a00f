//! Sound level monitor firmware for the Disobey 2026 badge.
//!
//! - A / B raise and lower the alert threshold in 1 dB steps
//! - D-pad LEFT / RIGHT walk the mode axis: far left monitors, far right
//!   shows the alert count
//! - Crossing the threshold buzzes the motor and lights the LED bars red

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{
    Delay,
    Duration,
    Timer,
};
use esp_backtrace as _;
use esp_hal::{
    Blocking,
    dma::DmaDescriptor,
    gpio::Output,
    rmt::{
        Channel,
        Tx,
    },
    timer::timg::TimerGroup,
};
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use noise_monitor::*;

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

static SHUTDOWN: Shutdown = Shutdown::new();

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    let peripherals = noise_monitor::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let _backlight = backlight_on(resources.backlight);
    let mut display: Display<'static> = resources.display.into();
    if render::draw_splash(&mut display, env!("CARGO_PKG_VERSION")).is_err() {
        defmt::warn!("splash screen failed");
    }
    Timer::after(Duration::from_millis(constants::timing::SPLASH_MS)).await;

    let descriptors = mk_static!([DmaDescriptor; 8], [DmaDescriptor::EMPTY; 8]);
    let microphone = BadgeMicrophone::new(resources.mic, DEFAULT_SAMPLE_RATE, descriptors);
    let controls: BadgeControls = resources.buttons.into();
    let channel: Channel<'static, Blocking, Tx> = resources.leds.into();
    let motor: Output<'static> = resources.vibra.into();
    let alarm = BadgeAlarm::new(motor, AlarmLeds::new(channel));

    let mut monitor: Monitor<_, _, _, _, _> = Monitor::new(
        // Unseeded, the 1.65 V microphone bias reads as a loud first window.
        MonitorConfig::default().with_prime_offset(true),
        microphone,
        controls,
        alarm,
        display,
        SystemClock,
    )
    .expect("default configuration is valid");

    monitor.run(&mut Delay, &SHUTDOWN).await;
    info!("monitor returned, idling");

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
