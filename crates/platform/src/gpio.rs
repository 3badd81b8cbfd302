//! Logical GPIO lines on top of `embedded-hal` output pins
//!
//! Device trees describe a reset line together with its polarity. Drivers
//! think in terms of *asserted* / *deasserted*; [`GpioLine`] translates that
//! to the physical level of the underlying [`OutputPin`].

use embedded_hal::digital::{OutputPin, PinState};

/// Electrical polarity of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Asserted = high.
    #[default]
    ActiveHigh,
    /// Asserted = low.
    ActiveLow,
}

impl Polarity {
    /// Physical level that represents the logical `asserted` value.
    pub const fn level(self, asserted: bool) -> PinState {
        match (self, asserted) {
            (Self::ActiveHigh, true) | (Self::ActiveLow, false) => PinState::High,
            (Self::ActiveHigh, false) | (Self::ActiveLow, true) => PinState::Low,
        }
    }
}

/// GPIO errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Driving the pin failed.
    Write,
}

impl GpioError {
    /// Negative errno-style code.
    pub const fn code(self) -> i32 {
        -5
    }
}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Write => write!(f, "GPIO write failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GpioError {}

/// An output pin addressed by logical value.
pub struct GpioLine<P> {
    pin: P,
    polarity: Polarity,
    asserted: bool,
}

impl<P: OutputPin> GpioLine<P> {
    /// Take ownership of `pin` and drive it to the logical `asserted` value.
    pub fn request(pin: P, polarity: Polarity, asserted: bool) -> Result<Self, GpioError> {
        let mut line = Self {
            pin,
            polarity,
            asserted,
        };
        line.set(asserted)?;
        Ok(line)
    }

    /// Drive the line to its logical value.
    pub fn set(&mut self, asserted: bool) -> Result<(), GpioError> {
        self.pin
            .set_state(self.polarity.level(asserted))
            .map_err(|_| GpioError::Write)?;
        self.asserted = asserted;
        Ok(())
    }

    /// Assert the line.
    pub fn assert(&mut self) -> Result<(), GpioError> {
        self.set(true)
    }

    /// Deassert the line.
    pub fn deassert(&mut self) -> Result<(), GpioError> {
        self.set(false)
    }

    /// Last logical value successfully driven.
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Line polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Release the underlying pin.
    pub fn release(self) -> P {
        self.pin
    }
}
