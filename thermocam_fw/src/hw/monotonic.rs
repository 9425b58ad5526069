// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond tick counter driven by SysTick.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use cortex_m_rt::exception;
use stm32f7xx_hal::rcc::Clocks;

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Start SysTick at 1 kHz from the core clock.
pub fn start(mut syst: SYST, clocks: &Clocks) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(clocks.sysclk().raw() / 1_000 - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Milliseconds since [`start`], wrapping after ~49 days.
#[inline]
pub fn now_ms() -> u32 {
    MILLIS.load(Ordering::Relaxed)
}

#[exception]
fn SysTick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}
