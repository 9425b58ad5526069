// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board support for the STM32F767ZI Nucleo.

pub mod i2c;
pub mod led;
pub mod logger;
pub mod monotonic;
pub mod pins;
pub mod servo_pwm;
pub mod usart;

pub use i2c::I2cBus;
pub use led::Led;
pub use servo_pwm::{ServoPwm, ServoTimer};
pub use usart::Usart;
