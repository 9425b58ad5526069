// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hobby servo PWM on TIM4 using direct PAC register access.
//!
//! The timer counts at 250 kHz (4 µs per count) and wraps every 5000 counts, giving the 50 Hz
//! servo frame. Compare values are therefore pulse widths in units of 4 µs, which is the unit
//! `thermocam::motors` works in.
//!
//! Example:
//! ```ignore
//! let (a, b) = ServoTimer::tim4(dp.TIM4, pins.servo, &clocks);
//! let axes = ServoAxes::new(a, b);
//! ```

use core::ops::Deref;

use embedded_hal::PwmPin;
use stm32f7xx_hal::{pac, rcc::Clocks};

use super::pins::ServoPins;

/// Timer count rate.
const TICK_HZ: u32 = 250_000;
/// Counts per 20 ms frame.
const PERIOD: u32 = 5_000;

// CCMR1: OCxM = PWM mode 1, OCxPE = preload enable, for CH1 and CH2.
const CCMR1_PWM1_CH1_CH2: u32 = (0b110 << 4) | (1 << 3) | (0b110 << 12) | (1 << 11);

pub struct ServoTimer;

impl ServoTimer {
    /// Configure TIM4 CH1/CH2 for servo PWM and return the two channels, outputs disabled.
    pub fn tim4(tim4: pac::TIM4, _pins: ServoPins, clocks: &Clocks) -> (ServoPwm<1>, ServoPwm<2>) {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        let tim = tim4;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        let prescaler = clocks.timclk1().raw() / TICK_HZ - 1;
        tim.psc.write(|w| unsafe { w.bits(prescaler) });
        tim.arr.write(|w| unsafe { w.bits(PERIOD - 1) });

        tim.ccmr1_output()
            .modify(|r, w| unsafe { w.bits(r.bits() | CCMR1_PWM1_CH1_CH2) });
        tim.ccr1.write(|w| unsafe { w.bits(0) });
        tim.ccr2.write(|w| unsafe { w.bits(0) });

        // Latch prescaler and period, then run with auto-reload preload.
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.arpe().set_bit().cen().set_bit());

        log::debug!("servo: TIM4 psc {} arr {}", prescaler, PERIOD - 1);

        (ServoPwm { _private: () }, ServoPwm { _private: () })
    }
}

/// One TIM4 compare channel.
pub struct ServoPwm<const CH: u8> {
    _private: (),
}

impl<const CH: u8> ServoPwm<CH> {
    #[inline]
    fn regs() -> &'static <pac::TIM4 as Deref>::Target {
        // Each channel only touches its own CCRx and CCER enable bit.
        unsafe { &*pac::TIM4::ptr() }
    }

    #[inline]
    fn enable_bit() -> u32 {
        1 << ((CH as u32 - 1) * 4)
    }
}

impl<const CH: u8> PwmPin for ServoPwm<CH> {
    type Duty = u16;

    fn disable(&mut self) {
        Self::regs()
            .ccer
            .modify(|r, w| unsafe { w.bits(r.bits() & !Self::enable_bit()) });
    }

    fn enable(&mut self) {
        Self::regs()
            .ccer
            .modify(|r, w| unsafe { w.bits(r.bits() | Self::enable_bit()) });
    }

    fn get_duty(&self) -> u16 {
        let tim = Self::regs();
        let ccr = match CH {
            1 => tim.ccr1.read().bits(),
            _ => tim.ccr2.read().bits(),
        };
        ccr as u16
    }

    fn get_max_duty(&self) -> u16 {
        Self::regs().arr.read().bits() as u16
    }

    fn set_duty(&mut self, duty: u16) {
        let tim = Self::regs();
        match CH {
            1 => tim.ccr1.write(|w| unsafe { w.bits(duty as u32) }),
            _ => tim.ccr2.write(|w| unsafe { w.bits(duty as u32) }),
        }
    }
}
