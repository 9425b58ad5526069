// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ThermoCam firmware for the STM32F767ZI Nucleo.
//!
//! Brings up the board, then runs the scanner from the main loop. Host commands arrive on the
//! ST-LINK virtual COM port; log output goes to USART1.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use thermocam::drivers::Mlx90614;
use thermocam::hal::Interval;
use thermocam::motors::ServoAxes;
use thermocam::{CameraConfig, ThermalCamera};

mod hw;
use hw::{logger, monotonic, pins::BoardPins, I2cBus, Led, ServoTimer, Usart};

const BAUD_RATE: u32 = 115_200;
const HEARTBEAT_MS: u32 = 500;

fn serial_config() -> Config {
    Config {
        baud_rate: BAUD_RATE.bps(),
        ..Default::default()
    }
}

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);

    // USART1 (DBG)
    let debug = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        serial_config(),
    );
    logger::init(Usart::new(debug), log::LevelFilter::Debug);

    // USART3 (host)
    let host = Serial::new(
        dp.USART3,
        (pins.usart3.tx, pins.usart3.rx),
        &clocks,
        serial_config(),
    );
    let mut link = Usart::new(host);

    // TIM4 servos
    let (servo_a, servo_b) = ServoTimer::tim4(dp.TIM4, pins.servo, &clocks);
    let axes = ServoAxes::new(servo_a, servo_b);

    // I2C1 sensor
    let bus = I2cBus::i2c1(dp.I2C1, pins.i2c1, &clocks);
    let sensor = Mlx90614::new(bus);

    monotonic::start(cp.SYST, &clocks);
    let now = monotonic::now_ms();

    let mut camera = ThermalCamera::new(sensor, axes, CameraConfig::default(), now);
    let mut led = Led::active_high(pins.led);
    let mut heartbeat = Interval::new(HEARTBEAT_MS, now);

    log::info!(
        "thermocam: ready, sysclk {} Hz, heartbeat every {} ms",
        clocks.sysclk().raw(),
        heartbeat.period()
    );

    loop {
        let now = monotonic::now_ms();
        camera.poll(now, &mut link);

        if heartbeat.elapsed(now) {
            led.toggle();
        }
    }
}
