// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Scan Control
//!
//! ## Modules
//!
//! - [`scan_controller`] - Boustrophedon raster scan state machine.

pub mod scan_controller;

pub use scan_controller::{ScanConfig, ScanController, ScanError, ScanEvent, ScanPhase};
