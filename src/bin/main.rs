#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use debounced_button::{
    ButtonEvent, ButtonState, HalInput, Pull, SystemClock,
    tasks::button::{
        BUTTON_POLL_INTERVAL, ButtonChannel, ButtonChannelReceiver, ButtonChannelSender,
        run_button,
    },
};
use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_time::Duration;
use esp_hal::{
    Config,
    clock::CpuClock,
    gpio::{self, Input, InputConfig, Level, Output, OutputConfig},
    peripherals::GPIO9,
    timer::systimer::SystemTimer,
};
use panic_rtt_target as _;
use static_cell::StaticCell;

/// Button events flow from the polling task to the main loop through this channel
static BUTTON_CHANNEL: StaticCell<ButtonChannel> = StaticCell::new();

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

/// Polls the boot button, which pulls GPIO9 low when pressed.
#[embassy_executor::task]
async fn button_task(pin: GPIO9<'static>, sender: ButtonChannelSender) {
    let input = Input::new(pin, InputConfig::default().with_pull(gpio::Pull::Up));
    let mut button = match ButtonState::new(HalInput::new(input), SystemClock, false, Pull::Up) {
        Ok(button) => button,
        Err(_) => {
            error!("BUTTON_TASK: could not configure input");
            return;
        }
    };
    let e = run_button(
        &mut button,
        sender,
        Duration::from_millis(BUTTON_POLL_INTERVAL),
    )
    .await;
    error!("BUTTON_TASK: stopped: {}", e);
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    #[cfg(all(feature = "rtt", feature = "defmt"))]
    rtt_target::rtt_init_defmt!();

    info!("MAIN: debounced-button {}", debounced_button::version());

    let peripherals = esp_hal::init(Config::default().with_cpu_clock(CpuClock::max()));
    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    let channel = BUTTON_CHANNEL.init(ButtonChannel::new());
    let receiver: ButtonChannelReceiver = channel.receiver();
    spawner
        .spawn(button_task(peripherals.GPIO9, channel.sender()))
        .expect("Failed to spawn button task");

    let mut led = Output::new(peripherals.GPIO3, Level::Low, OutputConfig::default());
    let mut torch = false;

    info!("MAIN: Starting main loop");
    loop {
        match receiver.receive().await {
            ButtonEvent::Press => {
                torch ^= true;
                info!("MAIN: Toggling torch mode {}", torch);
                led.set_level(Level::from(torch));
            }
            ButtonEvent::Release => info!("MAIN: Button released"),
            ButtonEvent::DoubleClick => info!("MAIN: Double click"),
            ButtonEvent::Hold => {
                info!("MAIN: Button held, torch off");
                torch = false;
                led.set_low();
            }
        }
    }
}

