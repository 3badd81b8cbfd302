//! Display modes and the connector they are published on

use bitflags::bitflags;
use core::fmt::Write as _;

/// Capacity of a connector's probed-mode list.
pub const MAX_CONNECTOR_MODES: usize = 8;

/// Longest mode name ("65535x65535" plus slack).
pub const MODE_NAME_LEN: usize = 24;

bitflags! {
    /// Mode type flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModeType: u32 {
        /// The pipeline should pick this mode by default.
        const PREFERRED = 1 << 3;
        /// Mode supplied by the panel driver.
        const DRIVER = 1 << 6;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ModeType {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "ModeType({=u32:#x})", self.bits());
    }
}

/// Display timing.
///
/// `clock` is the pixel clock in kHz. Horizontal and vertical positions are
/// absolute (sync start = active + front porch, and so on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMode {
    /// Pixel clock, kHz.
    pub clock: u32,
    /// Active pixels per line.
    pub hdisplay: u16,
    /// Start of horizontal sync.
    pub hsync_start: u16,
    /// End of horizontal sync.
    pub hsync_end: u16,
    /// Total pixels per line.
    pub htotal: u16,
    /// Active lines.
    pub vdisplay: u16,
    /// Start of vertical sync.
    pub vsync_start: u16,
    /// End of vertical sync.
    pub vsync_end: u16,
    /// Total lines per frame.
    pub vtotal: u16,
    /// Type flags; empty in static tables, set when copied to a connector.
    pub mode_type: ModeType,
    /// Human-readable name; empty in static tables.
    pub name: heapless::String<MODE_NAME_LEN>,
}

impl DisplayMode {
    /// Build a mode from active size, porches and sync widths at `refresh_hz`.
    ///
    /// The pixel clock is `htotal * vtotal * refresh_hz / 1000` kHz.
    // Inputs are panel timing constants; totals stay well inside u16/u32.
    #[allow(clippy::arithmetic_side_effects, clippy::too_many_arguments)]
    pub const fn from_timings(
        hdisplay: u16,
        hfront_porch: u16,
        hsync_len: u16,
        hback_porch: u16,
        vdisplay: u16,
        vfront_porch: u16,
        vsync_len: u16,
        vback_porch: u16,
        refresh_hz: u32,
    ) -> Self {
        let hsync_start = hdisplay + hfront_porch;
        let hsync_end = hsync_start + hsync_len;
        let htotal = hsync_end + hback_porch;
        let vsync_start = vdisplay + vfront_porch;
        let vsync_end = vsync_start + vsync_len;
        let vtotal = vsync_end + vback_porch;
        Self {
            clock: (htotal as u32) * (vtotal as u32) * refresh_hz / 1000,
            hdisplay,
            hsync_start,
            hsync_end,
            htotal,
            vdisplay,
            vsync_start,
            vsync_end,
            vtotal,
            mode_type: ModeType::empty(),
            name: heapless::String::new(),
        }
    }

    /// Vertical refresh rate in Hz, rounded to nearest.
    pub fn vrefresh(&self) -> u32 {
        let pixels_per_frame = u64::from(self.htotal) * u64::from(self.vtotal);
        if pixels_per_frame == 0 {
            return 0;
        }
        let hz = (u64::from(self.clock) * 1000 + pixels_per_frame / 2) / pixels_per_frame;
        u32::try_from(hz).unwrap_or(u32::MAX)
    }

    /// Set `name` to `"<hdisplay>x<vdisplay>"`.
    pub fn set_name(&mut self) {
        self.name.clear();
        // 11 characters at most; cannot exceed MODE_NAME_LEN.
        let _ = write!(self.name, "{}x{}", self.hdisplay, self.vdisplay);
    }

    /// Same timings, ignoring type flags and name.
    pub fn timings_eq(&self, other: &Self) -> bool {
        self.clock == other.clock
            && self.hdisplay == other.hdisplay
            && self.hsync_start == other.hsync_start
            && self.hsync_end == other.hsync_end
            && self.htotal == other.htotal
            && self.vdisplay == other.vdisplay
            && self.vsync_start == other.vsync_start
            && self.vsync_end == other.vsync_end
            && self.vtotal == other.vtotal
    }
}

/// Physical properties reported alongside the modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectorDisplayInfo {
    /// Active area width, mm.
    pub width_mm: u32,
    /// Active area height, mm.
    pub height_mm: u32,
    /// Bits per color component.
    pub bpc: u8,
}

/// Connector-side sink the panel publishes its modes into.
#[derive(Debug, Default)]
pub struct Connector {
    modes: heapless::Vec<DisplayMode, MAX_CONNECTOR_MODES>,
    /// Physical display properties.
    pub display_info: ConnectorDisplayInfo,
}

impl Connector {
    /// Empty connector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a probed mode. Hands the mode back if the list is full.
    pub fn add_probed_mode(&mut self, mode: DisplayMode) -> Result<(), DisplayMode> {
        self.modes.push(mode)
    }

    /// Modes probed so far.
    pub fn modes(&self) -> &[DisplayMode] {
        &self.modes
    }

    /// The mode flagged preferred, if any.
    pub fn preferred_mode(&self) -> Option<&DisplayMode> {
        self.modes
            .iter()
            .find(|m| m.mode_type.contains(ModeType::PREFERRED))
    }

    /// Drop every probed mode.
    pub fn clear(&mut self) {
        self.modes.clear();
    }
}
