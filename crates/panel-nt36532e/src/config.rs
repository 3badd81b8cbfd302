//! Compile-time driver configuration
//!
//! Names the driver publishes, device-tree lookups it performs and every
//! settle time in the power and sleep sequences. Runtime configuration comes
//! from the device tree through [`platform::DeviceNode`].

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Name the panel is registered under.
pub const DRIVER_NAME: &str = "panel-novatek-nt36532e";

/// Supply rail feeding the panel's I/O.
pub const VDDIO_SUPPLY: &str = "vddio";

/// Reset line connection id.
pub const RESET_GPIO: &str = "reset";

/// Graph port carrying the link to the sibling DSI host.
pub const SECONDARY_PORT: u32 = 1;

// ---------------------------------------------------------------------------
// Link parameters
// ---------------------------------------------------------------------------

/// Links driven by a single-DSI descriptor.
pub const DSI_NUM_MIN: usize = 1;

/// Compressed slices carried per DSI packet.
pub const DSC_SLICE_PER_PKT: u8 = 2;

// ---------------------------------------------------------------------------
// Timing (milliseconds, all minima)
// ---------------------------------------------------------------------------

/// Reset pulse train: `(asserted, hold_ms)` applied in order.
pub const RESET_SEQUENCE: [(bool, u32); 4] = [(true, 10), (false, 3), (true, 3), (false, 15)];

/// Exit-sleep to display-on.
pub const SLEEP_OUT_DELAY_MS: u32 = 120;

/// Display-off to enter-sleep.
pub const DISPLAY_OFF_DELAY_MS: u32 = 50;

/// Enter-sleep settle before the rails may drop.
pub const SLEEP_IN_DELAY_MS: u32 = 120;
