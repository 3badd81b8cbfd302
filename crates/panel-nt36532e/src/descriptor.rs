//! Panel descriptors and the device-tree match table
//!
//! A descriptor carries everything model-specific: geometry, link setup,
//! timings, the vendor command table and the optional DSC configuration.
//! Descriptors are `'static` and shared by every instance bound to them.

use platform::{DisplayMode, DscConfig, DscError, DsiDeviceInfo, DsiModeFlags, PixelFormat};

use crate::config::DSI_NUM_MIN;
use crate::init_sequence::{CommandPage, SHENG_TIANMA_DSC, SHENG_TIANMA_VIDEO};

/// Static description of one panel model/variant.
#[derive(Debug)]
pub struct PanelDescriptor {
    /// Active area width, mm.
    pub width_mm: u32,
    /// Active area height, mm.
    pub height_mm: u32,
    /// Bits per color component.
    pub bpc: u8,
    /// Data lanes per link.
    pub lanes: u8,
    /// DSI mode flags applied to every link.
    pub mode_flags: DsiModeFlags,
    /// Pixel format on the wire.
    pub format: PixelFormat,
    /// Supported timings; the first entry is preferred.
    pub modes: &'static [DisplayMode],
    /// Identity used when registering the secondary link.
    pub dsi_info: DsiDeviceInfo,
    /// Vendor command table sent during prepare.
    pub init_sequence: &'static [CommandPage],
    /// The panel is fed by two DSI links side by side.
    pub is_dual_dsi: bool,
    /// Compression parameters; `None` for an uncompressed stream.
    pub dsc: Option<DscConfig>,
}

impl PanelDescriptor {
    /// Number of DSI links this panel is driven through.
    pub const fn link_count(&self) -> usize {
        if self.is_dual_dsi {
            DSI_NUM_MIN.saturating_add(1)
        } else {
            DSI_NUM_MIN
        }
    }

    /// The preferred (first) timing.
    pub fn preferred_mode(&self) -> Option<&'static DisplayMode> {
        self.modes.first()
    }

    /// DSC configuration for the picture one link carries.
    ///
    /// Each link carries `hdisplay / link_count` columns of the preferred
    /// mode; the rate-control parameters are derived for that picture.
    /// Returns `Ok(None)` for uncompressed descriptors.
    pub fn link_dsc(&self) -> Result<Option<DscConfig>, DscError> {
        let Some(dsc) = &self.dsc else {
            return Ok(None);
        };
        let mode = self.preferred_mode().ok_or(DscError::SliceGeometry)?;
        let links = u16::try_from(self.link_count()).map_err(|_| DscError::SliceGeometry)?;
        let pic_width = mode
            .hdisplay
            .checked_div(links)
            .ok_or(DscError::SliceGeometry)?;
        dsc.for_picture(pic_width, mode.vdisplay).map(Some)
    }
}

// ---------------------------------------------------------------------------
// Xiaomi Pad 6S Pro ("sheng"), Tianma glass
// ---------------------------------------------------------------------------

const SHENG_MODE_FLAGS: DsiModeFlags = DsiModeFlags::VIDEO
    .union(DsiModeFlags::VIDEO_BURST)
    .union(DsiModeFlags::CLOCK_NON_CONTINUOUS)
    .union(DsiModeFlags::LPM);

const SHENG_DSI_INFO: DsiDeviceInfo = DsiDeviceInfo {
    type_name: "TIANMA-sheng",
    channel: 0,
};

static SHENG_TIANMA_DSC_MODES: [DisplayMode; 1] =
    [DisplayMode::from_timings(3048, 142, 4, 92, 2032, 26, 2, 138, 144)];

static SHENG_TIANMA_VIDEO_MODES: [DisplayMode; 1] =
    [DisplayMode::from_timings(3048, 392, 4, 92, 2032, 26, 2, 138, 60)];

/// DSC 1.1, two 762x16 slices per line, 8 bpc in, 8 bpp out.
const SHENG_DSC: DscConfig = DscConfig::new((1, 1), 762, 16, 2, 8, 8 << 4, true);

/// Sheng panel, DSC-compressed 144 Hz stream.
pub static SHENG_TIANMA_DSC_DESC: PanelDescriptor = PanelDescriptor {
    width_mm: 2632,
    height_mm: 1754,
    bpc: 8,
    lanes: 4,
    mode_flags: SHENG_MODE_FLAGS,
    format: PixelFormat::Rgb888,
    modes: &SHENG_TIANMA_DSC_MODES,
    dsi_info: SHENG_DSI_INFO,
    init_sequence: &SHENG_TIANMA_DSC,
    is_dual_dsi: true,
    dsc: Some(SHENG_DSC),
};

/// Sheng panel, uncompressed 60 Hz stream.
pub static SHENG_TIANMA_VIDEO_DESC: PanelDescriptor = PanelDescriptor {
    width_mm: 2632,
    height_mm: 1754,
    bpc: 8,
    lanes: 4,
    mode_flags: SHENG_MODE_FLAGS,
    format: PixelFormat::Rgb888,
    modes: &SHENG_TIANMA_VIDEO_MODES,
    dsi_info: SHENG_DSI_INFO,
    init_sequence: &SHENG_TIANMA_VIDEO,
    is_dual_dsi: true,
    dsc: None,
};

// ---------------------------------------------------------------------------
// Match table
// ---------------------------------------------------------------------------

/// `compatible` strings this driver binds to.
pub static OF_MATCH: [(&str, &PanelDescriptor); 2] = [
    ("xiaomi,sheng-nt36532e", &SHENG_TIANMA_DSC_DESC),
    ("xiaomi,sheng-nt36532e-video", &SHENG_TIANMA_VIDEO_DESC),
];

/// Look up the descriptor for a node's `compatible` string.
pub fn resolve(compatible: &str) -> Option<&'static PanelDescriptor> {
    OF_MATCH
        .iter()
        .find(|(c, _)| *c == compatible)
        .map(|(_, desc)| *desc)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let d = resolve("xiaomi,sheng-nt36532e").unwrap();
        assert!(d.dsc.is_some());
        let d = resolve("xiaomi,sheng-nt36532e-video").unwrap();
        assert!(d.dsc.is_none());
        assert!(resolve("xiaomi,sheng").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_sheng_timings() {
        let m = SHENG_TIANMA_DSC_DESC.preferred_mode().unwrap();
        assert_eq!((m.hdisplay, m.vdisplay), (3048, 2032));
        assert_eq!((m.htotal, m.vtotal), (3286, 2198));
        assert_eq!(m.clock, 3286 * 2198 * 144 / 1000);
        assert_eq!(m.vrefresh(), 144);

        let m = SHENG_TIANMA_VIDEO_DESC.preferred_mode().unwrap();
        assert_eq!(m.hsync_start, 3048 + 392);
        assert_eq!(m.htotal, 3536);
        assert_eq!(m.vrefresh(), 60);
    }

    #[test]
    fn test_link_dsc_splits_picture() {
        let dsc = SHENG_TIANMA_DSC_DESC.link_dsc().unwrap().unwrap();
        assert_eq!(dsc.pic_width, 1524);
        assert_eq!(dsc.pic_height, 2032);
        assert_eq!(dsc.slice_chunk_size, 762);
        assert_eq!(SHENG_TIANMA_VIDEO_DESC.link_dsc(), Ok(None));
    }

    #[test]
    fn test_link_count() {
        assert_eq!(SHENG_TIANMA_DSC_DESC.link_count(), 2);
        let single = PanelDescriptor {
            is_dual_dsi: false,
            dsc: None,
            ..SHENG_TIANMA_VIDEO_DESC
        };
        assert_eq!(single.link_count(), 1);
    }
}
