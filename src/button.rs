//! Debounced button state tracking.
//!
//! [`ButtonState`] turns the raw level of one noisy input into a stable pressed/released state
//! plus the events derived from it:
//! - press, release and change edges that are only visible on the tick they happened
//! - toggle latches that flip once per press or release
//! - hold detection after a press has been sustained
//! - double clicks from two releases close together
//! - nth press/release checks on the edge counters
//!
//! The host drives it by calling [`ButtonState::sample`] once per loop iteration and reading the
//! queries afterwards. Queries never sample on their own.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::{
    DEFAULT_DEBOUNCE_DELAY, DEFAULT_DOUBLE_CLICK_WINDOW, DEFAULT_HOLD_DELAY, MAX_EVENTS_PER_SAMPLE,
    drivers::{
        clock::Clock,
        input::{DigitalInput, Pull},
    },
    error::Error,
};

/// Number of `ButtonEvent` variants, each fires at most once per sample
const EVENT_KINDS: usize = 4;
const _: () = assert!(MAX_EVENTS_PER_SAMPLE >= EVENT_KINDS);

/// Events a single sample can produce, see [`ButtonState::events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// The debounced level became the active level
    Press,
    /// The debounced level left the active level
    Release,
    /// A release arrived within the double click window of the previous one
    DoubleClick,
    /// The current press has just outlasted the hold delay
    Hold,
}

/// Everything needed to set up a [`ButtonState`] in one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Raw level that means pressed, `true` for active high
    pub active_level: bool,
    /// Pull resistor applied to the input when the button is built
    pub pull: Pull,
    /// Minimum time a raw level must be stable before it is accepted
    pub debounce_delay: Duration,
    /// Longest gap between two releases that still counts as a double click
    pub double_click_window: Duration,
    /// Minimum press duration before the button reports a hold
    pub hold_delay: Duration,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            active_level: true,
            pull: Pull::None,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            double_click_window: DEFAULT_DOUBLE_CLICK_WINDOW,
            hold_delay: DEFAULT_HOLD_DELAY,
        }
    }
}

/// Debounce filter and edge tracker for one polled input.
pub struct ButtonState<I, C> {
    input: I,
    clock: C,

    active_level: bool,
    debounce_delay: Duration,
    double_click_window: Duration,
    hold_delay: Duration,

    raw_level_prev: bool,
    raw_level_curr: bool,
    debounce_anchor_time: Instant,
    is_settled: bool,
    debounced_prev: bool,
    debounced_curr: bool,

    is_pressed: bool,
    is_released: bool,
    changed: bool,
    just_pressed: bool,
    just_released: bool,
    just_held: bool,
    hold_reported: bool,
    press_count: u32,
    release_count: u32,

    last_press_time: Option<Instant>,
    curr_press_time: Option<Instant>,
    last_release_time: Option<Instant>,
    curr_release_time: Option<Instant>,

    press_toggle: bool,
    release_toggle: bool,
}

impl<I, C> ButtonState<I, C>
where
    I: DigitalInput,
    C: Clock,
{
    /// Create a button with the default delays.
    ///
    /// # Parameters
    /// * `input` - The line the button is wired to
    /// * `clock` - Time source used for debouncing, holds and double clicks
    /// * `active_level` - Raw level that means pressed, `true` for active high
    /// * `pull` - Pull resistor to configure on the input
    pub fn new(input: I, clock: C, active_level: bool, pull: Pull) -> Result<Self, Error<I::Error>> {
        Self::with_config(
            input,
            clock,
            ButtonConfig {
                active_level,
                pull,
                ..ButtonConfig::default()
            },
        )
    }

    /// Create a button from a full [`ButtonConfig`].
    ///
    /// The button starts out released, with both the raw and debounced history at the inactive
    /// level so an idle active-low input does not report a spurious release on its first sample.
    pub fn with_config(
        mut input: I,
        clock: C,
        config: ButtonConfig,
    ) -> Result<Self, Error<I::Error>> {
        input.configure(config.pull).map_err(Error::Pin)?;
        let idle = !config.active_level;
        let now = clock.now();

        Ok(Self {
            input,
            clock,
            active_level: config.active_level,
            debounce_delay: config.debounce_delay,
            double_click_window: config.double_click_window,
            hold_delay: config.hold_delay,
            raw_level_prev: idle,
            raw_level_curr: idle,
            debounce_anchor_time: now,
            is_settled: true,
            debounced_prev: idle,
            debounced_curr: idle,
            is_pressed: false,
            is_released: true,
            changed: false,
            just_pressed: false,
            just_released: false,
            just_held: false,
            hold_reported: false,
            press_count: 0,
            release_count: 0,
            last_press_time: None,
            curr_press_time: None,
            last_release_time: None,
            curr_release_time: None,
            press_toggle: false,
            release_toggle: false,
        })
    }

    /// Read the input and the clock, then advance the state machine by one tick.
    ///
    /// Call this once per loop iteration. Edge flags only describe the latest call, so sampling
    /// more than once per iteration silently drops the intermediate edges. On a pin error the
    /// state is left untouched.
    pub fn sample(&mut self) -> Result<(), Error<I::Error>> {
        let now = self.clock.now();
        let raw = self.input.read().map_err(Error::Pin)?;
        self.update(raw, now);
        Ok(())
    }

    /// Returns `true` if the pressed state is being held past the hold delay, measured against
    /// the clock right now.
    pub fn is_hold(&self) -> bool {
        self.held_at(self.clock.now())
    }

    /// Give back the input and the clock
    pub fn release(self) -> (I, C) {
        (self.input, self.clock)
    }
}

impl<I, C> ButtonState<I, C> {
    /// Advance the state machine with a raw level the caller already read.
    ///
    /// # Parameters
    /// * `raw` - The raw input level, `true` meaning high
    /// * `now` - When `raw` was read
    pub fn update(&mut self, raw: bool, now: Instant) {
        if raw != self.raw_level_curr {
            self.is_settled = false;
            self.debounce_anchor_time = now;
            #[cfg(feature = "defmt")]
            defmt::trace!("BUTTON: raw level {} at {}, debounce restarted", raw, now);
        } else if now.saturating_duration_since(self.debounce_anchor_time) > self.debounce_delay {
            self.is_settled = true;
        }

        // History shifts every tick so a held edge is only reported once.
        self.debounced_prev = self.debounced_curr;
        if self.is_settled {
            self.debounced_curr = raw;
        }

        self.is_pressed = self.debounced_curr == self.active_level;
        self.is_released = !self.is_pressed;

        self.changed = self.debounced_prev != self.debounced_curr;
        if !self.changed {
            self.just_pressed = false;
            self.just_released = false;
        } else if self.is_pressed {
            self.just_pressed = true;
            self.just_released = false;
            self.press_count = self.press_count.wrapping_add(1);
            self.last_press_time = self.curr_press_time;
            self.curr_press_time = Some(now);
            self.press_toggle = !self.press_toggle;
            self.hold_reported = false;
            #[cfg(feature = "defmt")]
            defmt::debug!("BUTTON: press #{} at {}", self.press_count, now);
        } else {
            self.just_pressed = false;
            self.just_released = true;
            self.release_count = self.release_count.wrapping_add(1);
            self.last_release_time = self.curr_release_time;
            self.curr_release_time = Some(now);
            self.release_toggle = !self.release_toggle;
            #[cfg(feature = "defmt")]
            defmt::debug!("BUTTON: release #{} at {}", self.release_count, now);
        }

        self.just_held = false;
        if !self.hold_reported && self.held_at(now) {
            self.just_held = true;
            self.hold_reported = true;
            #[cfg(feature = "defmt")]
            defmt::debug!("BUTTON: hold at {}", now);
        }

        self.raw_level_prev = self.raw_level_curr;
        self.raw_level_curr = raw;
    }

    fn held_at(&self, now: Instant) -> bool {
        match self.curr_press_time {
            Some(pressed_at) if self.is_pressed => {
                now.saturating_duration_since(pressed_at) > self.hold_delay
            }
            _ => false,
        }
    }

    /// The raw level read by the latest sample, before debouncing
    pub fn raw_level(&self) -> bool {
        self.raw_level_curr
    }

    /// Returns `true` if the raw level moved on the latest sample. Useful to watch bounce.
    pub fn on_raw_change(&self) -> bool {
        self.raw_level_prev != self.raw_level_curr
    }

    /// Returns `true` once the raw level has been stable for longer than the debounce delay
    pub fn is_settled(&self) -> bool {
        self.is_settled
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    pub fn is_released(&self) -> bool {
        self.is_released
    }

    /// Returns `true` on the tick the debounced level changed
    pub fn on_change(&self) -> bool {
        self.changed
    }

    /// Returns `true` on the tick of a press edge
    pub fn on_press(&self) -> bool {
        self.just_pressed
    }

    /// Returns `true` on the tick of a release edge
    pub fn on_release(&self) -> bool {
        self.just_released
    }

    /// A level that flips on every press edge, starting `false`
    pub fn on_press_as_toggle(&self) -> bool {
        self.press_toggle
    }

    /// A level that flips on every release edge, starting `false`
    pub fn on_release_as_toggle(&self) -> bool {
        self.release_toggle
    }

    /// Returns `true` on the one tick where the current press first counts as a hold
    pub fn on_hold(&self) -> bool {
        self.just_held
    }

    /// Returns `true` on the tick of a release that follows the previous release within the
    /// double click window. The very first release is never a double click.
    pub fn on_double_click(&self) -> bool {
        match (self.last_release_time, self.curr_release_time) {
            (Some(last), Some(curr)) if self.just_released => {
                curr.saturating_duration_since(last) <= self.double_click_window
            }
            _ => false,
        }
    }

    /// Time between the two most recent press edges, `None` until there have been two
    pub fn press_interval(&self) -> Option<Duration> {
        match (self.last_press_time, self.curr_press_time) {
            (Some(last), Some(curr)) => Some(curr.saturating_duration_since(last)),
            _ => None,
        }
    }

    /// Returns `true` if the press count is a nonzero multiple of `n`.
    ///
    /// Fails with [`Error::InvalidArgument`] when `n` is zero.
    pub fn is_nth_press(&self, n: u32) -> Result<bool, Error> {
        nth(self.press_count, n)
    }

    /// Returns `true` if the release count is a nonzero multiple of `n`.
    ///
    /// Fails with [`Error::InvalidArgument`] when `n` is zero.
    pub fn is_nth_release(&self, n: u32) -> Result<bool, Error> {
        nth(self.release_count, n)
    }

    /// Collect the events produced by the latest sample, in the order press, release, double
    /// click, hold.
    pub fn events(&self) -> Vec<ButtonEvent, MAX_EVENTS_PER_SAMPLE> {
        let mut events = Vec::new();
        let pending: [(bool, ButtonEvent); EVENT_KINDS] = [
            (self.just_pressed, ButtonEvent::Press),
            (self.just_released, ButtonEvent::Release),
            (self.on_double_click(), ButtonEvent::DoubleClick),
            (self.just_held, ButtonEvent::Hold),
        ];
        for (_, event) in pending.into_iter().filter(|(fired, _)| *fired) {
            // Cannot fail, see the assertion on EVENT_KINDS.
            let _ = events.push(event);
        }
        events
    }

    pub fn active_level(&self) -> bool {
        self.active_level
    }

    pub fn debounce_delay(&self) -> Duration {
        self.debounce_delay
    }

    pub fn set_debounce_delay(&mut self, delay: Duration) {
        self.debounce_delay = delay;
    }

    /// Set the debounce delay to zero. A new level is accepted by the first later sample that
    /// still reads it.
    pub fn clear_debounce_delay(&mut self) {
        self.set_debounce_delay(Duration::from_ticks(0));
    }

    pub fn double_click_window(&self) -> Duration {
        self.double_click_window
    }

    pub fn set_double_click_window(&mut self, window: Duration) {
        self.double_click_window = window;
    }

    pub fn hold_delay(&self) -> Duration {
        self.hold_delay
    }

    pub fn set_hold_delay(&mut self, delay: Duration) {
        self.hold_delay = delay;
    }

    /// Press edges seen so far. Wraps back to 0 after `u32::MAX`.
    pub fn press_count(&self) -> u32 {
        self.press_count
    }

    pub fn clear_press_count(&mut self) {
        self.press_count = 0;
    }

    /// Release edges seen so far. Wraps back to 0 after `u32::MAX`.
    pub fn release_count(&self) -> u32 {
        self.release_count
    }

    pub fn clear_release_count(&mut self) {
        self.release_count = 0;
    }
}

fn nth(count: u32, n: u32) -> Result<bool, Error> {
    if n == 0 {
        return Err(Error::InvalidArgument("modulus must be nonzero"));
    }
    Ok(count != 0 && count % n == 0)
}
