// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # ThermoCam Core
//!
//! Hardware-independent core of the ThermoCam pan/tilt thermal scanner: an MLX90614 IR
//! thermometer swept across the scene by two hobby servos, streaming samples to a host over a
//! serial link.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hal`] | Contracts the board must provide (host link, two-wire bus, tick source) |
//! | [`drivers`] | Device-level drivers (MLX90614) |
//! | [`motors`] | Pan/tilt servo pair with range enforcement |
//! | [`control`] | Boustrophedon raster scan state machine |
//! | [`protocol`] | Host command framing, parsing and response formatting |
//! | [`camera`] | The owned context tying it all together |
//!
//! The board support lives in the `thermocam_fw` crate.
//!
//! ## Getting Started
//!
//! Run the host-side tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod camera;
pub mod control;
pub mod drivers;
pub mod hal;
pub mod motors;
pub mod protocol;

pub use camera::{CameraConfig, ThermalCamera};
