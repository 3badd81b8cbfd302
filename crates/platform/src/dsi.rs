//! MIPI-DSI link abstraction
//!
//! A panel is addressed through one [`DsiDevice`] per physical link. Dual-link
//! panels get their second device by registering it on the sibling
//! [`DsiHost`] at probe time.

use bitflags::bitflags;

use crate::dsc::{DscConfig, PpsPayload};

bitflags! {
    /// Link operating mode flags, bit-compatible with the host's mode word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DsiModeFlags: u32 {
        /// Video mode (as opposed to command mode).
        const VIDEO = 1 << 0;
        /// Burst video mode.
        const VIDEO_BURST = 1 << 1;
        /// Video mode with sync pulses.
        const VIDEO_SYNC_PULSE = 1 << 2;
        /// Automatic vertical timing.
        const VIDEO_AUTO_VERT = 1 << 3;
        /// Transmit horizontal sync end packets.
        const VIDEO_HSE = 1 << 4;
        /// No horizontal front porch.
        const VIDEO_NO_HFP = 1 << 5;
        /// No horizontal back porch.
        const VIDEO_NO_HBP = 1 << 6;
        /// No horizontal sync active.
        const VIDEO_NO_HSA = 1 << 7;
        /// Flush display FIFO on vsync.
        const VSYNC_FLUSH = 1 << 8;
        /// Do not send end-of-transmission packets.
        const NO_EOT_PACKET = 1 << 9;
        /// Clock lane may stop between high-speed transfers.
        const CLOCK_NON_CONTINUOUS = 1 << 10;
        /// Send commands in low-power mode.
        const LPM = 1 << 11;
        /// Align high-speed packet ends with line ends.
        const HS_PKT_END_ALIGNED = 1 << 12;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DsiModeFlags {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "DsiModeFlags({=u32:#x})", self.bits());
    }
}

/// Pixel format on the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 24 bpp, 8 bits per component.
    Rgb888,
    /// 18 bpp, loosely packed.
    Rgb666,
    /// 18 bpp, tightly packed.
    Rgb666Packed,
    /// 16 bpp.
    Rgb565,
}

impl PixelFormat {
    /// Bits transmitted per pixel.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Rgb888 | Self::Rgb666 => 24,
            Self::Rgb666Packed => 18,
            Self::Rgb565 => 16,
        }
    }
}

/// DCS opcodes the panel lifecycle sends.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DcsCommand {
    /// Enter sleep mode.
    EnterSleepMode = 0x10,
    /// Exit sleep mode.
    ExitSleepMode = 0x11,
    /// Blank the display.
    SetDisplayOff = 0x28,
    /// Show the frame memory.
    SetDisplayOn = 0x29,
}

impl DcsCommand {
    /// Raw opcode byte.
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

/// Identity of a DSI peripheral registered on a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DsiDeviceInfo {
    /// Device type name, used by the host for matching.
    pub type_name: &'static str,
    /// Virtual channel (0..=3).
    pub channel: u8,
}

/// Electrical and protocol parameters a panel requests when attaching a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig<'a> {
    /// Number of data lanes.
    pub lanes: u8,
    /// Pixel format.
    pub format: PixelFormat,
    /// Mode flags.
    pub mode_flags: DsiModeFlags,
    /// Compression parameters, if the stream is DSC-compressed.
    pub dsc: Option<&'a DscConfig>,
    /// DSC slices carried in one packet.
    pub dsc_slice_per_pkt: u8,
}

/// DSI transaction and host errors.
///
/// Every variant maps to a negative errno-style code via [`DsiError::code`],
/// which is what panel drivers report upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DsiError {
    /// The transfer failed with the given host error code.
    Transfer(i32),
    /// The host did not complete the transfer in time.
    Timeout,
    /// The link is not attached to a host.
    NotAttached,
    /// The host refused the requested configuration.
    InvalidConfig,
    /// The host could not allocate a device.
    NoMemory,
}

impl DsiError {
    /// Negative errno-style code for this error.
    pub const fn code(self) -> i32 {
        match self {
            Self::Transfer(code) => code,
            Self::Timeout => -110,
            Self::NotAttached => -19,
            Self::InvalidConfig => -22,
            Self::NoMemory => -12,
        }
    }
}

impl core::fmt::Display for DsiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transfer(code) => write!(f, "DSI transfer failed ({code})"),
            Self::Timeout => write!(f, "DSI transfer timed out"),
            Self::NotAttached => write!(f, "DSI link not attached"),
            Self::InvalidConfig => write!(f, "DSI host rejected link configuration"),
            Self::NoMemory => write!(f, "DSI host out of memory"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DsiError {}

/// One DSI link as seen by a peripheral driver.
pub trait DsiDevice {
    /// Attach to the host with the given link parameters.
    async fn attach(&mut self, config: &LinkConfig<'_>) -> Result<(), DsiError>;

    /// Detach from the host.
    async fn detach(&mut self) -> Result<(), DsiError>;

    /// DCS write: `cmd` followed by `params`, as one short/long write packet.
    async fn dcs_write(&mut self, cmd: u8, params: &[u8]) -> Result<(), DsiError>;

    /// Send a DSC picture parameter set.
    async fn picture_parameter_set(&mut self, pps: &PpsPayload) -> Result<(), DsiError>;

    /// Enable or disable compressed-stream signalling.
    async fn compression_mode(&mut self, enable: bool) -> Result<(), DsiError>;

    /// DCS `exit_sleep_mode` (0x11).
    async fn exit_sleep_mode(&mut self) -> Result<(), DsiError> {
        self.dcs_write(DcsCommand::ExitSleepMode.opcode(), &[]).await
    }

    /// DCS `enter_sleep_mode` (0x10).
    async fn enter_sleep_mode(&mut self) -> Result<(), DsiError> {
        self.dcs_write(DcsCommand::EnterSleepMode.opcode(), &[]).await
    }

    /// DCS `set_display_on` (0x29).
    async fn set_display_on(&mut self) -> Result<(), DsiError> {
        self.dcs_write(DcsCommand::SetDisplayOn.opcode(), &[]).await
    }

    /// DCS `set_display_off` (0x28).
    async fn set_display_off(&mut self) -> Result<(), DsiError> {
        self.dcs_write(DcsCommand::SetDisplayOff.opcode(), &[]).await
    }
}

/// A DSI host controller that peripheral drivers can register devices on.
pub trait DsiHost {
    /// Device handle type produced by this host.
    type Device: DsiDevice;

    /// Create and register a peripheral on this host.
    fn register_device(&mut self, info: &DsiDeviceInfo) -> Result<Self::Device, DsiError>;

    /// Unregister a peripheral previously created by [`DsiHost::register_device`].
    fn unregister_device(&mut self, device: Self::Device);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flag_bits_match_host_word() {
        let flags = DsiModeFlags::VIDEO
            | DsiModeFlags::VIDEO_BURST
            | DsiModeFlags::CLOCK_NON_CONTINUOUS
            | DsiModeFlags::LPM;
        assert_eq!(flags.bits(), 0b1100_0000_0011);
    }

    #[test]
    fn test_dcs_opcodes() {
        assert_eq!(DcsCommand::EnterSleepMode.opcode(), 0x10);
        assert_eq!(DcsCommand::ExitSleepMode.opcode(), 0x11);
        assert_eq!(DcsCommand::SetDisplayOff.opcode(), 0x28);
        assert_eq!(DcsCommand::SetDisplayOn.opcode(), 0x29);
    }

    #[test]
    fn test_error_codes_are_negative() {
        for err in [
            DsiError::Transfer(-5),
            DsiError::Timeout,
            DsiError::NotAttached,
            DsiError::InvalidConfig,
            DsiError::NoMemory,
        ] {
            assert!(err.code() < 0, "{err} must map to a negative code");
        }
        assert_eq!(DsiError::Transfer(-121).code(), -121);
    }

    #[test]
    fn test_pixel_format_width() {
        assert_eq!(PixelFormat::Rgb888.bits_per_pixel(), 24);
        assert_eq!(PixelFormat::Rgb666Packed.bits_per_pixel(), 18);
        assert_eq!(PixelFormat::Rgb565.bits_per_pixel(), 16);
    }
}
