//! Device-tree node abstraction
//!
//! Everything a panel driver needs from its firmware node at probe time:
//! match string, supplies, GPIOs, orientation, backlight and the graph link
//! to a sibling DSI host.

use embedded_hal::digital::OutputPin;

use crate::backlight::Backlight;
use crate::dsi::DsiHost;
use crate::gpio::Polarity;
use crate::panel::Orientation;
use crate::regulator::Regulator;

/// Resource lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// The node does not describe the resource.
    Missing,
    /// The resource provider has not probed yet; retry later.
    Deferred,
    /// The property exists but is malformed.
    Invalid,
}

impl ResourceError {
    /// Negative errno-style code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Missing => -19,
            Self::Deferred => -517,
            Self::Invalid => -22,
        }
    }
}

impl core::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Missing => write!(f, "resource not described"),
            Self::Deferred => write!(f, "resource provider not ready"),
            Self::Invalid => write!(f, "malformed resource property"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ResourceError {}

/// Result of following a graph endpoint to a remote DSI host.
#[derive(Debug)]
pub enum RemoteHost<H> {
    /// No remote node on that port.
    NoNode,
    /// The remote node exists but its host driver has not registered yet.
    NotRegistered,
    /// The host is available.
    Ready(H),
}

/// Firmware node of a DSI panel.
pub trait DeviceNode {
    /// Supply handle.
    type Regulator: Regulator;
    /// GPIO pin handle.
    type Pin: OutputPin;
    /// Backlight handle.
    type Backlight: Backlight;
    /// DSI host reachable through the graph.
    type Host: DsiHost;

    /// The node's `compatible` string.
    fn compatible(&self) -> &str;

    /// Look up the `<supply>-supply` regulator.
    fn regulator(&mut self, supply: &str) -> Result<Self::Regulator, ResourceError>;

    /// Look up the `<con_id>-gpios` line and its polarity.
    fn gpio(&mut self, con_id: &str) -> Result<(Self::Pin, Polarity), ResourceError>;

    /// Mounting orientation; [`Orientation::Unknown`] when not described.
    fn orientation(&self) -> Result<Orientation, ResourceError>;

    /// The `backlight` phandle target, if any.
    fn backlight(&mut self) -> Result<Option<Self::Backlight>, ResourceError>;

    /// Follow graph `port` to the remote DSI host.
    fn remote_dsi_host(&mut self, port: u32) -> RemoteHost<Self::Host>;
}
