//! Panel abstraction layer
//!
//! The display pipeline drives every panel through the same lifecycle:
//!
//! ```text
//! prepare ─▶ enable ─▶ disable ─▶ unprepare
//! ```
//!
//! `prepare` powers the panel and brings the controller up; `enable` makes the
//! picture visible; `disable` and `unprepare` undo those steps and are
//! best-effort: they cannot fail.

use crate::mode::Connector;

/// Panel driver trait.
pub trait Panel {
    /// Error type for panel operations.
    type Error: core::fmt::Debug;

    /// Power up and initialise the panel controller.
    async fn prepare(&mut self) -> Result<(), Self::Error>;

    /// Make the picture visible.
    async fn enable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Blank the panel. Never fails; problems are logged by the driver.
    async fn disable(&mut self);

    /// Power the panel down. Never fails; problems are logged by the driver.
    async fn unprepare(&mut self);

    /// Publish the panel's modes into `connector`, returning how many were added.
    fn get_modes(&self, connector: &mut Connector) -> Result<usize, Self::Error>;

    /// Physical mounting orientation.
    fn orientation(&self) -> Orientation;
}

/// Panel mounting orientation relative to the device's natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// No orientation information.
    #[default]
    Unknown,
    /// Top of the panel is the top of the device.
    Normal,
    /// Panel is upside down.
    BottomUp,
    /// Panel top faces the device's left edge.
    LeftUp,
    /// Panel top faces the device's right edge.
    RightUp,
}

impl Orientation {
    /// Map a device-tree `rotation` property (degrees) to an orientation.
    pub const fn from_rotation(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Normal),
            90 => Some(Self::RightUp),
            180 => Some(Self::BottomUp),
            270 => Some(Self::LeftUp),
            _ => None,
        }
    }
}

/// Connector type a panel is published as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectorType {
    /// MIPI-DSI.
    Dsi,
    /// Parallel RGB / DPI.
    Dpi,
    /// Embedded DisplayPort.
    Edp,
}

/// What a driver publishes when it adds a panel to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelEntry {
    /// Driver / panel name.
    pub name: &'static str,
    /// Connector type.
    pub connector_type: ConnectorType,
    /// The upstream bridge must be prepared before this panel.
    pub prepare_prev_first: bool,
}

/// Registry of panels available to the display pipeline.
pub trait PanelRegistry {
    /// Publish a panel.
    fn add(&mut self, entry: PanelEntry);

    /// Withdraw a previously published panel.
    fn remove(&mut self, name: &'static str);
}
