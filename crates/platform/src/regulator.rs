//! Supply regulator abstraction
//!
//! Consumers enable a rail before talking to a device and disable it when
//! done. Enable/disable calls are reference-counted by the host; a consumer
//! must balance its own calls.

/// A consumer handle on one supply rail.
pub trait Regulator {
    /// Turn the rail on (or take another reference on it).
    fn enable(&mut self) -> Result<(), RegulatorError>;

    /// Drop this consumer's reference on the rail.
    fn disable(&mut self) -> Result<(), RegulatorError>;

    /// Whether this consumer currently holds the rail enabled.
    fn is_enabled(&self) -> bool;
}

/// Regulator errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegulatorError {
    /// The rail failed to come up (or go down) with the given host code.
    Failed(i32),
    /// Disable called without a matching enable.
    Unbalanced,
}

impl RegulatorError {
    /// Negative errno-style code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Failed(code) => code,
            Self::Unbalanced => -5,
        }
    }
}

impl core::fmt::Display for RegulatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Failed(code) => write!(f, "regulator operation failed ({code})"),
            Self::Unbalanced => write!(f, "unbalanced regulator disable"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegulatorError {}
