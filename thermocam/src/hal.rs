// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Capability contracts the core needs from the board.
//!
//! The firmware crate implements these on top of the MCU peripherals; tests implement them with
//! in-memory fakes. Servo outputs use [`embedded_hal::PwmPin`] directly and are not repeated here.

use thiserror::Error;

/// Byte-oriented duplex link to the host (USB CDC, UART, ...).
pub trait Transport {
    /// Non-blocking read. Returns `None` when no byte is currently available.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue `bytes` for transmission.
    fn write(&mut self, bytes: &[u8]);
}

/// Direction of a two-wire bus transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BusMode {
    Write,
    Read,
}

/// Failure of a single two-wire bus step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BusError {
    /// Addressed device did not acknowledge its address.
    #[error("address 0x{0:02X} not acknowledged")]
    AddressNack(u8),
    /// Device did not acknowledge a data byte.
    #[error("data byte not acknowledged")]
    DataNack,
    /// Arbitration lost or bus fault while transferring.
    #[error("bus fault")]
    Bus,
    /// Peripheral did not finish the step.
    #[error("bus timeout")]
    Timeout,
}

/// Request/response primitives of a two-wire (I2C/SMBus) master.
///
/// Every step either completes or fails immediately; there is no internal retry. Callers must
/// issue [`stop`](Self::stop) after a transaction, including failed ones, to release the bus.
pub trait TwoWireBus {
    /// Issue a (repeated) start condition and the 7-bit `address` with the `mode` bit.
    fn start(&mut self, address: u8, mode: BusMode) -> Result<(), BusError>;

    /// Send one byte in a write transaction.
    fn send_byte(&mut self, byte: u8) -> Result<(), BusError>;

    /// Receive one byte in a read transaction.
    ///
    /// `ack` is false for the final byte of the transaction, which the master does not
    /// acknowledge.
    fn receive_byte(&mut self, ack: bool) -> Result<u8, BusError>;

    /// Issue a stop condition.
    fn stop(&mut self);
}

impl<T: TwoWireBus + ?Sized> TwoWireBus for &mut T {
    fn start(&mut self, address: u8, mode: BusMode) -> Result<(), BusError> {
        (**self).start(address, mode)
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), BusError> {
        (**self).send_byte(byte)
    }

    fn receive_byte(&mut self, ack: bool) -> Result<u8, BusError> {
        (**self).receive_byte(ack)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Monotonic wrapping tick counter used to pace the scan.
///
/// `period` is expressed in the units of the caller's tick source (milliseconds on the firmware).
#[derive(Copy, Clone, Debug)]
pub struct Interval {
    period: u32,
    last: u32,
}

impl Interval {
    pub fn new(period: u32, now: u32) -> Self {
        Self { period, last: now }
    }

    /// Returns true once per elapsed `period`, tolerating counter wrap-around.
    pub fn elapsed(&mut self, now: u32) -> bool {
        if now.wrapping_sub(self.last) >= self.period {
            self.last = now;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_once_per_period() {
        let mut iv = Interval::new(20, 0);
        assert!(!iv.elapsed(19));
        assert!(iv.elapsed(20));
        assert!(!iv.elapsed(39));
        assert!(iv.elapsed(45));
        assert!(!iv.elapsed(64));
        assert!(iv.elapsed(65));
    }

    #[test]
    fn interval_survives_counter_wrap() {
        let mut iv = Interval::new(10, u32::MAX - 4);
        assert!(!iv.elapsed(u32::MAX));
        assert!(iv.elapsed(5));
    }
}
