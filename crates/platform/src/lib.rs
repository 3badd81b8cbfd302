//! Hardware Abstraction Layer for MIPI-DSI panel drivers
//!
//! This crate provides the trait seams a panel driver is written against, so
//! the same driver runs on the real display subsystem and against the
//! in-process mocks used by the test suites.
//!
//! # Architecture Layers
//!
//! ```text
//! Display pipeline (owns the panel, calls prepare/enable/disable/unprepare)
//!         ↓
//! Panel driver (panel-nt36532e)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Host bus layer (DSI host controller, GPIO, regulators, device tree)
//! ```
//!
//! # Abstraction Levels
//!
//! ## Pipeline-facing
//! - [`Panel`] - Panel lifecycle as seen by the display pipeline
//! - [`PanelRegistry`] - Where probed panels are published
//! - [`DisplayMode`] / [`Connector`] - Mode list handed to the pipeline
//!
//! ## Bus-facing
//! - [`dsi`] - DSI device/host traits and the DCS command set
//! - [`dsc`] - DSC configuration and PPS packing
//! - [`regulator`] - Supply rails
//! - [`gpio`] - Polarity-aware reset line on top of `embedded-hal` pins
//! - [`backlight`] - Brightness provider
//! - [`of`] - Device-tree node lookups performed at probe time
//!
//! # Features
//!
//! - `std`: `std::error::Error` impls and the journaling [`mocks`]
//! - `defmt`: Enable `defmt::Format` on all platform types
//!
//! # Example
//!
//! ```no_run
//! use platform::Panel;
//!
//! async fn power_cycle<P: Panel>(panel: &mut P) -> Result<(), P::Error> {
//!     panel.prepare().await?;
//!     panel.enable().await?;
//!     panel.disable().await;
//!     panel.unprepare().await;
//!     Ok(())
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // single-threaded pipeline, Send bounds not needed

#[cfg(feature = "std")]
extern crate std;

pub mod backlight;
pub mod dsc;
pub mod dsi;
pub mod gpio;
pub mod mode;
pub mod of;
pub mod panel;
pub mod regulator;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export pipeline-facing types
pub use mode::{Connector, ConnectorDisplayInfo, DisplayMode, ModeType, MAX_CONNECTOR_MODES};
pub use panel::{ConnectorType, Orientation, Panel, PanelEntry, PanelRegistry};

// Re-export bus-facing types
pub use backlight::{Backlight, BacklightError};
pub use dsc::{DscConfig, DscError, PpsPayload, DSC_PPS_SIZE};
pub use dsi::{
    DcsCommand, DsiDevice, DsiDeviceInfo, DsiError, DsiHost, DsiModeFlags, LinkConfig,
    PixelFormat,
};
pub use gpio::{GpioError, GpioLine, Polarity};
pub use of::{DeviceNode, RemoteHost, ResourceError};
pub use regulator::{Regulator, RegulatorError};
