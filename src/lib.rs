#![cfg_attr(not(test), no_std)]

pub mod button;
pub mod drivers;
pub mod error;
pub mod tasks;

use embassy_time::Duration;

pub use button::{ButtonConfig, ButtonEvent, ButtonState};
pub use drivers::{
    clock::{Clock, SystemClock},
    input::{DigitalInput, HalInput, Pull},
};
pub use error::Error;
pub use tasks::{ButtonChannel, publish_events, run_button};

/// How long a raw level must stay put before it is accepted
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(10);

/// The longest gap between two releases that still counts as a double click
pub const DEFAULT_DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// How long a press must last before the button reports a hold
pub const DEFAULT_HOLD_DELAY: Duration = Duration::from_millis(1500);

/// The maximum number of events a single sample can produce
pub const MAX_EVENTS_PER_SAMPLE: usize = 4;

/// Returns the version of the library
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
