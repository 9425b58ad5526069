// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767ZI Nucleo carrying the ThermoCam.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, Alternate, OpenDrain, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub led: gpiob::PB0<Output<PushPull>>, // LD1 (green)
    pub usart1: Usart1Pins,
    pub usart3: Usart3Pins,
    pub servo: ServoPins,
    pub i2c1: I2c1Pins,
}

/// Debug log
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Host link (ST-LINK virtual COM port)
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// Servo signal outputs
pub struct ServoPins {
    pub a: gpiod::PD12<Alternate<2>>, // TIM4_CH1
    pub b: gpiod::PD13<Alternate<2>>, // TIM4_CH2
}

/// MLX90614 SMBus
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            led: gpiob.pb0.into_push_pull_output(),

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            servo: ServoPins {
                a: gpiod.pd12.into_alternate::<2>(),
                b: gpiod.pd13.into_alternate::<2>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>().internal_pull_up(true),
                sda: gpiob.pb9.into_alternate_open_drain::<4>().internal_pull_up(true),
            },
        }
    }
}
