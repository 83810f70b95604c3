pub mod button;

pub use button::{ButtonChannel, publish_events, run_button};
