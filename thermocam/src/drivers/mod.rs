// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Drivers sit on top of the bus contracts in [`crate::hal`] and below the scan and protocol
//! logic.
//!
//! ## Existing drivers
//!
//! - [`mlx90614`] – Melexis MLX90614 single-pixel IR thermometer (SMBus)

pub mod mlx90614;

pub use mlx90614::{Mlx90614, SensorReading};

use crate::hal::BusError;

/// Temperature channel of the IR sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Temperature of the object in the field of view.
    Object,
    /// Temperature of the sensor die.
    Ambient,
}

/// A sensor that can take one temperature sample on demand.
pub trait TemperatureSensor {
    fn read_channel(&mut self, channel: Channel) -> Result<SensorReading, BusError>;
}
