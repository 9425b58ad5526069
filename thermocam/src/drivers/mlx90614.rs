// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Melexis MLX90614 non-contact infrared thermometer over SMBus.
//!
//! A read is one combined transaction:
//!
//! ```text
//! S | SA W | A | cmd | A | Sr | SA R | A | LSB | A | MSB | A | PEC | NA | P
//! ```
//!
//! The MSB carries an error flag in bit 7; the remaining 15 bits are the raw temperature in units
//! of 0.02 K.

use crate::drivers::{Channel, TemperatureSensor};
use crate::hal::{BusError, BusMode, TwoWireBus};

/// Factory default SMBus address.
pub const DEFAULT_ADDRESS: u8 = 0x5A;

// RAM register addresses
pub mod reg {
    pub const T_AMBIENT: u8 = 0x06;
    pub const T_OBJECT1: u8 = 0x07;
}

/// Smallest raw value the sensor reports (-70.01 °C).
pub const MIN_READING: u16 = 0x27AD;
/// Largest raw value the sensor reports (382.19 °C).
pub const MAX_READING: u16 = 0x7FFF;

/// One raw sample as received from the sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SensorReading {
    raw: u16,
    error_flag: bool,
    pec: u8,
    // Bytes the PEC is computed over, kept for `pec_matches`.
    crc_input: [u8; 5],
}

impl SensorReading {
    /// Assemble a reading from the two data bytes and the trailing PEC byte.
    pub fn from_bytes(address: u8, register: u8, low: u8, high: u8, pec: u8) -> Self {
        Self {
            raw: (((high & 0x7F) as u16) << 8) | low as u16,
            error_flag: (high & 0x80) != 0,
            pec,
            crc_input: [address << 1, register, (address << 1) | 1, low, high],
        }
    }

    /// 15-bit raw temperature with the error flag masked off.
    #[inline]
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Sensor reported an error condition for this sample.
    #[inline]
    pub fn error_flag(&self) -> bool {
        self.error_flag
    }

    /// PEC byte as received.
    #[inline]
    pub fn pec(&self) -> u8 {
        self.pec
    }

    /// Whether the received PEC matches the SMBus CRC-8 of the transaction.
    pub fn pec_matches(&self) -> bool {
        crc8(&self.crc_input) == self.pec
    }

    /// Raw value lies inside the range the sensor can report.
    #[inline]
    pub fn in_range(&self) -> bool {
        (MIN_READING..=MAX_READING).contains(&self.raw)
    }

    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        self.raw as f32 / 50.0 - 273.15
    }
}

/// SMBus packet error code: CRC-8, polynomial x^8 + x^2 + x + 1, initial value 0.
pub fn crc8(bytes: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &b in bytes {
        crc ^= b;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// MLX90614 attached to a two-wire bus.
pub struct Mlx90614<B> {
    bus: B,
    address: u8,
}

impl<B: TwoWireBus> Mlx90614<B> {
    /// Create a driver for the sensor at the factory address.
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DEFAULT_ADDRESS)
    }

    pub fn with_address(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    #[inline]
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Access the underlying bus.
    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn free(self) -> B {
        self.bus
    }

    /// Read one RAM register.
    ///
    /// The bus is always released with a stop condition before returning, on success and on
    /// failure alike.
    pub fn read_register(&mut self, register: u8) -> Result<SensorReading, BusError> {
        let result = self.transaction(register);
        self.bus.stop();
        result
    }

    fn transaction(&mut self, register: u8) -> Result<SensorReading, BusError> {
        self.bus.start(self.address, BusMode::Write)?;
        self.bus.send_byte(register)?;
        self.bus.start(self.address, BusMode::Read)?;

        let low = self.bus.receive_byte(true)?;
        let high = self.bus.receive_byte(true)?;
        let pec = self.bus.receive_byte(false)?;

        let reading = SensorReading::from_bytes(self.address, register, low, high, pec);
        if !reading.pec_matches() {
            log::warn!(
                "mlx90614: PEC mismatch on reg 0x{:02X} (got 0x{:02X})",
                register,
                pec
            );
        }
        Ok(reading)
    }
}

impl<B: TwoWireBus> TemperatureSensor for Mlx90614<B> {
    fn read_channel(&mut self, channel: Channel) -> Result<SensorReading, BusError> {
        let register = match channel {
            Channel::Object => reg::T_OBJECT1,
            Channel::Ambient => reg::T_AMBIENT,
        };
        self.read_register(register)
    }
}
