use embassy_sync::{
    blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex},
    channel::{Channel, Receiver, Sender},
};
use embassy_time::{Duration, Ticker};

use crate::{
    button::{ButtonEvent, ButtonState},
    drivers::{clock::Clock, input::DigitalInput},
    error::Error,
};

/// How often the polling loop samples the button, in milliseconds
pub const BUTTON_POLL_INTERVAL: u64 = 5;

const BUTTON_QUEUE_SIZE: usize = 8;
/// Channel types for handing button events to other tasks.
pub type ButtonChannel = Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE_SIZE>;
pub type ButtonChannelSender =
    Sender<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE_SIZE>;
pub type ButtonChannelReceiver =
    Receiver<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE_SIZE>;

/// Sample the button once and queue every event the sample produced.
///
/// Returns the number of events queued. Events that don't fit in the channel are dropped.
///
/// # Parameters
/// * `button` - The button to sample
/// * `events` - Where to send the events
pub fn publish_events<I, C, M, const N: usize>(
    button: &mut ButtonState<I, C>,
    events: &Sender<'_, M, ButtonEvent, N>,
) -> Result<usize, Error<I::Error>>
where
    I: DigitalInput,
    C: Clock,
    M: RawMutex,
{
    button.sample()?;
    let mut queued = 0;
    for event in button.events() {
        match events.try_send(event) {
            Ok(()) => queued += 1,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("BUTTON_TASK: event queue full, dropping {}", event);
            }
        }
    }
    Ok(queued)
}

/// Poll the button forever at a fixed rate, forwarding its events.
///
/// This only returns if the input pin fails, handing back the error.
///
/// # Parameters
/// * `button` - The button to poll
/// * `events` - Where to send the events
/// * `period` - Time between samples, keep it well below the debounce delay
pub async fn run_button<I, C, M, const N: usize>(
    button: &mut ButtonState<I, C>,
    events: Sender<'_, M, ButtonEvent, N>,
    period: Duration,
) -> Error<I::Error>
where
    I: DigitalInput,
    C: Clock,
    M: RawMutex,
{
    let mut ticker = Ticker::every(period);
    #[cfg(feature = "defmt")]
    defmt::info!("BUTTON_TASK: polling every {}", period);
    loop {
        if let Err(e) = publish_events(button, &events) {
            #[cfg(feature = "defmt")]
            defmt::error!("BUTTON_TASK: input pin failed, stopping");
            return e;
        }
        ticker.next().await;
    }
}
