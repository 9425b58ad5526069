// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! ## Modules
//!
//! - [`servo_axes`] - Pan/tilt hobby servo pair driven by timer compare values.

pub mod servo_axes;

pub use servo_axes::{Axis, RangeError, ServoAxes, SERVO_CENTER, SERVO_MAX, SERVO_MIN};
