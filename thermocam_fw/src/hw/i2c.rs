// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte-wise I2C master on I2C1 using direct PAC register access.
//!
//! The STM32F7 I2C peripheral sends the slave address together with the first data byte, so
//! [`I2cBus::start`] only latches the address and direction. An address NACK therefore surfaces
//! from the first [`send_byte`](TwoWireBus::send_byte) or
//! [`receive_byte`](TwoWireBus::receive_byte) after it.
//!
//! Reads use NBYTES = 1 with RELOAD set while more bytes are wanted, so the peripheral ACKs every
//! byte but the one requested with `ack = false`. Write transactions carry a single data byte,
//! which is all the SMBus read-word protocol needs.

use stm32f7xx_hal::{pac, rcc::Clocks};

use thermocam::hal::{BusError, BusMode, TwoWireBus};

use super::pins::I2c1Pins;

/// 100 kHz standard mode from a 16 MHz I2CCLK (PRESC 3, SCLDEL 4, SDADEL 2, SCLH 0x0F, SCLL 0x13).
const TIMING_100KHZ_16MHZ: u32 = 0x3042_0F13;
const EXPECTED_PCLK1: u32 = 16_000_000;

/// Polls of ISR before a step is abandoned.
const SPIN_LIMIT: u32 = 100_000;

mod cr2 {
    pub const RD_WRN: u32 = 1 << 10;
    pub const START: u32 = 1 << 13;
    pub const STOP: u32 = 1 << 14;
    pub const NBYTES_SHIFT: u32 = 16;
    pub const NBYTES_MASK: u32 = 0xFF << NBYTES_SHIFT;
    pub const RELOAD: u32 = 1 << 24;
}

mod isr {
    pub const TXIS: u32 = 1 << 1;
    pub const RXNE: u32 = 1 << 2;
    pub const NACKF: u32 = 1 << 4;
    pub const STOPF: u32 = 1 << 5;
    pub const TC: u32 = 1 << 6;
    pub const TCR: u32 = 1 << 7;
    pub const BERR: u32 = 1 << 8;
    pub const ARLO: u32 = 1 << 9;
    pub const BUSY: u32 = 1 << 15;
}

// ICR clear bits sit at the same positions as their ISR flags.
const CLEAR_ALL: u32 = isr::NACKF | isr::STOPF | isr::BERR | isr::ARLO;

pub struct I2cBus {
    i2c: pac::I2C1,
    /// Address and direction latched by `start`, sent with the next byte.
    pending: Option<(u8, BusMode)>,
}

impl I2cBus {
    /// Create and enable I2C1 at 100 kHz.
    pub fn i2c1(i2c1: pac::I2C1, _pins: I2c1Pins, clocks: &Clocks) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.i2c1en().set_bit());

        if clocks.pclk1().raw() != EXPECTED_PCLK1 {
            log::warn!(
                "i2c: PCLK1 is {} Hz, timing assumes {} Hz",
                clocks.pclk1().raw(),
                EXPECTED_PCLK1
            );
        }

        // Timing may only be changed with the peripheral disabled.
        i2c1.cr1.modify(|_, w| w.pe().clear_bit());
        i2c1.timingr.write(|w| unsafe { w.bits(TIMING_100KHZ_16MHZ) });
        i2c1.cr1.modify(|_, w| w.pe().set_bit());

        Self {
            i2c: i2c1,
            pending: None,
        }
    }

    /// Spin until any flag in `mask` is set.
    ///
    /// A NACK is reported as [`BusError::DataNack`]; callers in the address phase remap it.
    fn wait_for(&self, mask: u32) -> Result<(), BusError> {
        for _ in 0..SPIN_LIMIT {
            let flags = self.i2c.isr.read().bits();
            if flags & mask != 0 {
                return Ok(());
            }
            if flags & isr::NACKF != 0 {
                return Err(BusError::DataNack);
            }
            if flags & (isr::BERR | isr::ARLO) != 0 {
                return Err(BusError::Bus);
            }
        }
        Err(BusError::Timeout)
    }

    /// Issue (repeated) START with the address and a one-byte transfer.
    fn begin(&mut self, address: u8, mode: BusMode, reload: bool) {
        let mut bits = ((address as u32) << 1) | (1 << cr2::NBYTES_SHIFT) | cr2::START;
        if mode == BusMode::Read {
            bits |= cr2::RD_WRN;
        }
        if reload {
            bits |= cr2::RELOAD;
        }
        self.i2c.cr2.write(|w| unsafe { w.bits(bits) });
    }

    /// Request one more byte in a reloaded transfer.
    fn reload(&mut self, more: bool) {
        self.i2c.cr2.modify(|r, w| {
            let mut bits = r.bits() & !(cr2::NBYTES_MASK | cr2::RELOAD | cr2::START | cr2::STOP);
            bits |= 1 << cr2::NBYTES_SHIFT;
            if more {
                bits |= cr2::RELOAD;
            }
            unsafe { w.bits(bits) }
        });
    }
}

fn address_phase(address: u8) -> impl Fn(BusError) -> BusError {
    move |e| match e {
        BusError::DataNack => BusError::AddressNack(address),
        other => other,
    }
}

impl TwoWireBus for I2cBus {
    fn start(&mut self, address: u8, mode: BusMode) -> Result<(), BusError> {
        self.pending = Some((address, mode));
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), BusError> {
        match self.pending.take() {
            Some((address, BusMode::Write)) => {
                self.begin(address, BusMode::Write, false);
                self.wait_for(isr::TXIS).map_err(address_phase(address))?;
            }
            // Read transaction, or a second byte in one write.
            _ => return Err(BusError::Bus),
        }

        self.i2c.txdr.write(|w| unsafe { w.bits(byte as u32) });
        self.wait_for(isr::TC)
    }

    fn receive_byte(&mut self, ack: bool) -> Result<u8, BusError> {
        match self.pending.take() {
            Some((address, BusMode::Read)) => {
                self.begin(address, BusMode::Read, ack);
                self.wait_for(isr::RXNE).map_err(address_phase(address))?;
            }
            Some((_, BusMode::Write)) => return Err(BusError::Bus),
            None => {
                self.wait_for(isr::TCR)?;
                self.reload(ack);
                self.wait_for(isr::RXNE)?;
            }
        }
        Ok(self.i2c.rxdr.read().bits() as u8)
    }

    fn stop(&mut self) {
        self.pending = None;

        let flags = self.i2c.isr.read().bits();
        if flags & isr::BUSY != 0 {
            // After a NACK the peripheral generates STOP on its own.
            if flags & (isr::NACKF | isr::STOPF) == 0 {
                self.i2c.cr2.modify(|r, w| unsafe { w.bits(r.bits() | cr2::STOP) });
            }
            let stopped = (0..SPIN_LIMIT).any(|_| self.i2c.isr.read().bits() & isr::STOPF != 0);
            if !stopped {
                log::warn!("i2c: bus still busy after STOP");
            }
        }
        self.i2c.icr.write(|w| unsafe { w.bits(CLEAR_ALL) });
    }
}
