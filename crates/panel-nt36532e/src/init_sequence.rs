//! NT36532E vendor command tables
//!
//! The controller exposes its extended registers through pages. A page is
//! selected by writing its number to [`PAGE_SELECT`], then [`RELOAD_CTRL`]
//! is written with [`RELOAD_DISABLE`] so the values written afterwards are not
//! overwritten from MTP. Register payloads are opaque vendor values.
//!
//! Control traffic is only accepted on DSI0, so these tables are always sent
//! over the primary link.

// ---------------------------------------------------------------------------
// Page protocol
// ---------------------------------------------------------------------------

/// Command page select register.
pub const PAGE_SELECT: u8 = 0xFF;

/// MTP reload control register.
pub const RELOAD_CTRL: u8 = 0xFB;

/// Keep written values instead of reloading defaults from MTP.
pub const RELOAD_DISABLE: u8 = 0x01;

/// One vendor register write: `addr` followed by `data` in a single DCS packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    /// Register address (sent as the DCS command byte).
    pub addr: u8,
    /// Payload bytes.
    pub data: &'static [u8],
}

/// A command page and the writes applied inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPage {
    /// Page number written to [`PAGE_SELECT`].
    pub page: u8,
    /// Human-readable page name for logs.
    pub name: &'static str,
    /// Writes applied after the page is selected.
    pub writes: &'static [RegisterWrite],
}

impl CommandPage {
    /// DCS packets this page expands to, including the page-select and
    /// reload-control preamble.
    pub const fn packet_count(&self) -> usize {
        self.writes.len().saturating_add(2)
    }
}

const fn reg(addr: u8, data: &'static [u8]) -> RegisterWrite {
    RegisterWrite { addr, data }
}

// ---------------------------------------------------------------------------
// Timing pages
// ---------------------------------------------------------------------------

const TIMING_PAGE_3: CommandPage = CommandPage {
    page: 0x26,
    name: "timings 3",
    writes: &[reg(0xCD, &[0x3A, 0x46]), reg(0xCE, &[0x39, 0x46])],
};

const TIMING_PAGE_2: CommandPage = CommandPage {
    page: 0x25,
    name: "timings 2",
    writes: &[reg(0x05, &[0x00])],
};

const TIMING_PAGE_4: CommandPage = CommandPage {
    page: 0x27,
    name: "timings 4",
    writes: &[
        reg(0xD0, &[0x31]),
        reg(0xD1, &[0x20]),
        reg(0xD2, &[0x38]),
        reg(0xDE, &[0x43]),
        reg(0xDF, &[0x02]),
        reg(0x13, &[0x00]),
        reg(0x14, &[0x11]),
    ],
};

// ---------------------------------------------------------------------------
// CABC
// ---------------------------------------------------------------------------

const CABC_PAGE: CommandPage = CommandPage {
    page: 0x23,
    name: "cabc",
    writes: &[
        reg(0x00, &[0x80]),
        reg(0x01, &[0x84]),
        reg(0x05, &[0xF6]),
        reg(0x06, &[0x02]),
        reg(0x11, &[0x03]),
        reg(0x12, &[0xC7]),
        reg(0x15, &[0xAE]),
        reg(0x16, &[0x16]),
        // UI curve
        reg(0x29, &[0x0A]),
        reg(0x30, &[0xFF]),
        reg(0x31, &[0xFE]),
        reg(0x32, &[0xFD]),
        reg(0x33, &[0xFB]),
        reg(0x34, &[0xF8]),
        reg(0x35, &[0xF5]),
        reg(0x36, &[0xF3]),
        reg(0x37, &[0xF2]),
        reg(0x38, &[0xF2]),
        reg(0x39, &[0xF2]),
        reg(0x3A, &[0xEF]),
        reg(0x3B, &[0xEC]),
        reg(0x3D, &[0xE9]),
        reg(0x3F, &[0xE5]),
        reg(0x40, &[0xE5]),
        reg(0x41, &[0xE5]),
        // STILL curve
        reg(0x2A, &[0x13]),
        reg(0x45, &[0xFF]),
        reg(0x46, &[0xF4]),
        reg(0x47, &[0xE7]),
        reg(0x48, &[0xDA]),
        reg(0x49, &[0xCD]),
        reg(0x4A, &[0xC0]),
        reg(0x4B, &[0xB3]),
        reg(0x4C, &[0xB1]),
        reg(0x4D, &[0xB1]),
        reg(0x4E, &[0xB1]),
        reg(0x4F, &[0x95]),
        reg(0x50, &[0x79]),
        reg(0x51, &[0x5C]),
        reg(0x52, &[0x58]),
        reg(0x53, &[0x58]),
        reg(0x54, &[0x58]),
        // MOVING curve
        reg(0x2B, &[0x0E]),
        reg(0x58, &[0xFF]),
        reg(0x59, &[0xFB]),
        reg(0x5A, &[0xF7]),
        reg(0x5B, &[0xF3]),
        reg(0x5C, &[0xEF]),
        reg(0x5D, &[0xE3]),
        reg(0x5E, &[0xD8]),
        reg(0x5F, &[0xD6]),
        reg(0x60, &[0xD6]),
        reg(0x61, &[0xD6]),
        reg(0x62, &[0xC8]),
        reg(0x63, &[0xB7]),
        reg(0x64, &[0xAA]),
        reg(0x65, &[0xA8]),
        reg(0x66, &[0xA8]),
        reg(0x67, &[0xA8]),
    ],
};

// ---------------------------------------------------------------------------
// IC transfer
// ---------------------------------------------------------------------------

const IC_TRANSFER_PAGE: CommandPage = CommandPage {
    page: 0xF0,
    name: "ic transfer",
    writes: &[reg(0xFA, &[0x05]), reg(0x76, &[0x16])],
};

// ---------------------------------------------------------------------------
// User settings
// ---------------------------------------------------------------------------

/// User page with on-panel DSC decoding enabled.
const USER_PAGE_DSC: CommandPage = CommandPage {
    page: 0x10,
    name: "user (dsc)",
    writes: &[
        reg(0x35, &[0x00]), // tear on
        reg(0x3B, &[0x03, 0x8C, 0x1A, 0x04, 0x04, 0x00]),
        reg(0x51, &[0x0F, 0xFF]), // brightness
        reg(0x53, &[0x24]),       // backlight on, no dimming
        reg(0x90, &[0x03]),       // DSC on
        reg(
            0x91,
            &[
                0x89, 0x28, 0x00, 0x10, 0xD2, 0x00, 0x02, 0x9D, 0x01, 0xB1, 0x00, 0x0A, 0x06,
                0xEF, 0x04, 0x82,
            ],
        ),
        reg(0x92, &[0x10, 0xF0]),
        reg(0x9D, &[0x01]),
        reg(0xB2, &[0x00]), // frame rate ctrl
        reg(0xB3, &[0x00]),
    ],
};

/// User page for an uncompressed stream.
const USER_PAGE_VIDEO: CommandPage = CommandPage {
    page: 0x10,
    name: "user (video)",
    writes: &[
        reg(0x35, &[0x00]),
        reg(0x3B, &[0x03, 0x8C, 0x1A, 0x04, 0x04, 0x00]),
        reg(0x51, &[0x0F, 0xFF]),
        reg(0x53, &[0x24]),
        reg(0x90, &[0x00]),
        reg(0x92, &[0x10, 0xF0]),
        reg(0x9D, &[0x01]),
        reg(0xB2, &[0x91]),
        reg(0xB3, &[0x40]),
    ],
};

// ---------------------------------------------------------------------------
// Full sequences
// ---------------------------------------------------------------------------

/// Tianma "sheng" glass, DSC stream.
pub static SHENG_TIANMA_DSC: [CommandPage; 6] = [
    TIMING_PAGE_3,
    TIMING_PAGE_2,
    TIMING_PAGE_4,
    CABC_PAGE,
    IC_TRANSFER_PAGE,
    USER_PAGE_DSC,
];

/// Tianma "sheng" glass, uncompressed stream.
pub static SHENG_TIANMA_VIDEO: [CommandPage; 6] = [
    TIMING_PAGE_3,
    TIMING_PAGE_2,
    TIMING_PAGE_4,
    CABC_PAGE,
    IC_TRANSFER_PAGE,
    USER_PAGE_VIDEO,
];
