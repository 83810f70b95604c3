use core::fmt::Debug;

use embedded_hal::digital::InputPin;

/// Internal resistor configuration for a button input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating input, the board provides the bias resistor
    #[default]
    None,
    /// Internal pull-up enabled, idle level is high
    Up,
}

/// A single digital input line that a button can be sampled from.
pub trait DigitalInput {
    type Error: Debug;

    /// Prepare the line for input with the requested pull resistor.
    fn configure(&mut self, pull: Pull) -> Result<(), Self::Error>;

    /// Read the raw level, `true` meaning high.
    fn read(&mut self) -> Result<bool, Self::Error>;
}

/// Adapts any [`embedded_hal`] input pin into a [`DigitalInput`].
///
/// HALs set the pull resistor when the pin is built (for `esp-hal` that is
/// `InputConfig::with_pull`), so [`DigitalInput::configure`] only records the request. Check it
/// with [`HalInput::pull`] if the board setup needs to agree with the button polarity.
#[derive(Debug)]
pub struct HalInput<P> {
    pin: P,
    pull: Pull,
}

impl<P: InputPin> HalInput<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            pull: Pull::None,
        }
    }

    /// The pull mode last requested through [`DigitalInput::configure`]
    pub fn pull(&self) -> Pull {
        self.pull
    }

    /// Give the pin back
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> DigitalInput for HalInput<P> {
    type Error = P::Error;

    fn configure(&mut self, pull: Pull) -> Result<(), Self::Error> {
        self.pull = pull;
        Ok(())
    }

    fn read(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}
