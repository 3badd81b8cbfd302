//! Backlight provider abstraction
//!
//! Panels that do not own their backlight delegate brightness to a provider
//! resolved from the device tree. The panel only switches it on and off
//! around the display being visible.

/// A backlight device.
pub trait Backlight {
    /// Light the panel at the current brightness.
    fn enable(&mut self) -> Result<(), BacklightError>;

    /// Switch the backlight off.
    fn disable(&mut self) -> Result<(), BacklightError>;
}

/// Backlight errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightError {
    /// The provider rejected the update with the given host code.
    Update(i32),
}

impl BacklightError {
    /// Negative errno-style code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Update(code) => code,
        }
    }
}

impl core::fmt::Display for BacklightError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Update(code) => write!(f, "backlight update failed ({code})"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BacklightError {}
