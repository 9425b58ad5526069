// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

use embedded_hal::digital::v2::OutputPin;

/// Active-high LED that remembers its last known state.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Create an LED wrapper, initializing it to OFF.
    pub fn active_high(mut pin: PIN) -> Self {
        pin.set_low().ok();
        Self { pin, is_on: false }
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        if on {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.is_on = on;
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }
}
