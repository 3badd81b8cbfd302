//! Driver error type

use platform::{DscError, DsiError, GpioError, RegulatorError, ResourceError};

/// Errors reported by the NT36532E driver.
///
/// Every variant maps to the negative errno-style code the failing layer
/// reported, see [`PanelError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// A DSI transaction failed.
    Dsi(DsiError),
    /// The `vddio` supply could not be switched.
    Regulator(RegulatorError),
    /// The reset line could not be driven.
    Gpio(GpioError),
    /// The DSC configuration does not fit the panel geometry.
    Dsc(DscError),
    /// A device-tree resource lookup failed.
    Resource(ResourceError),
    /// No descriptor matches the node, or the sibling link is not described.
    NoDevice,
    /// The sibling DSI host has not registered yet; retry probe later.
    Deferred,
    /// The connector cannot hold another mode.
    OutOfMemory,
}

impl PanelError {
    /// Negative errno-style code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Dsi(e) => e.code(),
            Self::Regulator(e) => e.code(),
            Self::Gpio(e) => e.code(),
            Self::Dsc(e) => e.code(),
            Self::Resource(e) => e.code(),
            Self::NoDevice => -19,
            Self::Deferred => -517,
            Self::OutOfMemory => -12,
        }
    }

    /// True when probe should be retried once other devices have bound.
    pub const fn is_deferred(self) -> bool {
        matches!(self, Self::Deferred | Self::Resource(ResourceError::Deferred))
    }
}

impl From<DsiError> for PanelError {
    fn from(e: DsiError) -> Self {
        Self::Dsi(e)
    }
}

impl From<RegulatorError> for PanelError {
    fn from(e: RegulatorError) -> Self {
        Self::Regulator(e)
    }
}

impl From<GpioError> for PanelError {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

impl From<DscError> for PanelError {
    fn from(e: DscError) -> Self {
        Self::Dsc(e)
    }
}

impl From<ResourceError> for PanelError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

impl core::fmt::Display for PanelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dsi(e) => write!(f, "DSI: {e}"),
            Self::Regulator(e) => write!(f, "vddio: {e}"),
            Self::Gpio(e) => write!(f, "reset line: {e}"),
            Self::Dsc(e) => write!(f, "DSC: {e}"),
            Self::Resource(e) => write!(f, "device tree: {e}"),
            Self::NoDevice => write!(f, "no matching panel description"),
            Self::Deferred => write!(f, "sibling DSI host not ready"),
            Self::OutOfMemory => write!(f, "connector mode list full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PanelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        assert_eq!(PanelError::Dsi(DsiError::Transfer(-5)).code(), -5);
        assert_eq!(PanelError::Regulator(RegulatorError::Failed(-16)).code(), -16);
        assert_eq!(PanelError::NoDevice.code(), -19);
        assert_eq!(PanelError::OutOfMemory.code(), -12);
    }

    #[test]
    fn test_deferred_detection() {
        assert!(PanelError::Deferred.is_deferred());
        assert!(PanelError::Resource(ResourceError::Deferred).is_deferred());
        assert!(!PanelError::Resource(ResourceError::Missing).is_deferred());
        assert_eq!(PanelError::Deferred.code(), -517);
    }
}
