// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! In-memory stand-ins for the board.

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal::PwmPin;
use thermocam::drivers::mlx90614::{crc8, reg};
use thermocam::drivers::Mlx90614;
use thermocam::hal::{BusError, BusMode, Transport, TwoWireBus};
use thermocam::motors::ServoAxes;
use thermocam::{CameraConfig, ThermalCamera};

/// Host link backed by two byte queues.
#[derive(Default)]
pub struct FakeLink {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl FakeLink {
    /// Queue bytes as if the host had sent them.
    pub fn host_sends(&mut self, text: &str) {
        self.rx.extend(text.bytes());
    }

    /// Everything written since the last call.
    pub fn take_output(&mut self) -> String {
        String::from_utf8(std::mem::take(&mut self.tx)).expect("responses are ASCII")
    }

    /// Output split into messages, line endings removed.
    pub fn take_lines(&mut self) -> Vec<String> {
        self.take_output()
            .split_terminator("\r\n")
            .map(str::to_owned)
            .collect()
    }
}

impl Transport for FakeLink {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.tx.extend_from_slice(bytes);
    }
}

#[derive(Default)]
pub struct FakePwm {
    pub duty: u16,
    pub enabled: bool,
}

impl PwmPin for FakePwm {
    type Duty = u16;

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn get_duty(&self) -> u16 {
        self.duty
    }

    fn get_max_duty(&self) -> u16 {
        4999
    }

    fn set_duty(&mut self, duty: u16) {
        self.duty = duty;
    }
}

/// Simulated MLX90614 behind a two-wire bus.
///
/// Transactions are counted from 1 at each write-mode start; the ones listed in `fail_on` are not
/// acknowledged.
pub struct FakeBus {
    pub object: u16,
    pub ambient: u16,
    pub error_flag: bool,
    pub fail_on: Vec<u32>,
    pub transactions: u32,
    pub stops: u32,
    register: u8,
    pending: VecDeque<u8>,
}

impl FakeBus {
    pub fn new(object: u16, ambient: u16) -> Self {
        Self {
            object,
            ambient,
            error_flag: false,
            fail_on: Vec::new(),
            transactions: 0,
            stops: 0,
            register: 0,
            pending: VecDeque::new(),
        }
    }
}

impl TwoWireBus for FakeBus {
    fn start(&mut self, address: u8, mode: BusMode) -> Result<(), BusError> {
        match mode {
            BusMode::Write => {
                self.transactions += 1;
                if self.fail_on.contains(&self.transactions) {
                    return Err(BusError::AddressNack(address));
                }
            }
            BusMode::Read => {
                let raw = match self.register {
                    reg::T_OBJECT1 => self.object,
                    reg::T_AMBIENT => self.ambient,
                    _ => return Err(BusError::DataNack),
                };
                let low = raw as u8;
                let high = ((raw >> 8) as u8 & 0x7F) | if self.error_flag { 0x80 } else { 0 };
                let pec = crc8(&[address << 1, self.register, (address << 1) | 1, low, high]);
                self.pending = VecDeque::from([low, high, pec]);
            }
        }
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), BusError> {
        self.register = byte;
        Ok(())
    }

    fn receive_byte(&mut self, _ack: bool) -> Result<u8, BusError> {
        self.pending.pop_front().ok_or(BusError::Timeout)
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.pending.clear();
    }
}

pub const OBJECT_RAW: u16 = 15058;
pub const AMBIENT_RAW: u16 = 14900;

pub type TestCamera = ThermalCamera<Mlx90614<FakeBus>, FakePwm, FakePwm>;

pub fn camera_with(bus: FakeBus, config: CameraConfig) -> TestCamera {
    let axes = ServoAxes::new(FakePwm::default(), FakePwm::default());
    ThermalCamera::new(Mlx90614::new(bus), axes, config, 0)
}

pub fn camera() -> TestCamera {
    camera_with(FakeBus::new(OBJECT_RAW, AMBIENT_RAW), CameraConfig::default())
}

/// Send `text` from the host and return what the camera answered.
pub fn exchange(camera: &mut TestCamera, link: &mut FakeLink, text: &str) -> String {
    link.host_sends(text);
    camera.receive(link);
    link.take_output()
}
