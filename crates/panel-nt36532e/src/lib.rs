//! Novatek NT36532E dual-DSI panel driver
//!
//! Drives the Tianma panel of the Xiaomi Pad 6S Pro ("sheng"): 3048x2032,
//! fed by two DSI links side by side, each carrying one half of the picture.
//! The controller only accepts commands on DSI0.
//!
//! # Layers
//!
//! ```text
//! Nt36532e (panel)        lifecycle, probe/remove, dual-link attach
//!     ├── sequencer        vendor command table, sleep out, display on
//!     ├── power            vddio + reset pulse train
//!     └── descriptor       per-variant timings, DSC, match table
//! ```
//!
//! # Variants
//!
//! | compatible                      | stream            | refresh |
//! |---------------------------------|-------------------|---------|
//! | `xiaomi,sheng-nt36532e`         | DSC 1.1, 8 bpp    | 144 Hz  |
//! | `xiaomi,sheng-nt36532e-video`   | RGB888            | 60 Hz   |
//!
//! # Features
//!
//! - `std`: `std::error::Error` for [`PanelError`]
//! - `defmt`: log through `defmt` (hardware)
//! - `tracing`: log through `tracing` (host)
//!
//! # Example
//!
//! ```ignore
//! let mut panel = Nt36532e::probe(&mut node, dsi0, delay, &mut registry).await?;
//! panel.prepare().await?;
//! panel.enable().await?;
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the log macros are visible to every module below.
mod fmt;

pub mod config;
pub mod descriptor;
pub mod error;
pub mod init_sequence;
pub mod panel;
pub mod power;
pub mod sequencer;

pub use descriptor::{resolve, PanelDescriptor, OF_MATCH};
pub use error::PanelError;
pub use panel::{Nt36532e, PanelState};
pub use power::PowerSequencer;
