// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The scanner as one owned context.
//!
//! [`ThermalCamera`] owns the sensor, both servo axes, the scan state machine and the inbound
//! framer. The firmware main loop calls [`ThermalCamera::poll`] as often as it can:
//!
//! ```ignore
//! let mut camera = ThermalCamera::new(sensor, axes, CameraConfig::default(), now_ms());
//!
//! loop {
//!     camera.poll(now_ms(), &mut host_link);
//! }
//! ```

use embedded_hal::PwmPin;

use crate::control::{ScanConfig, ScanController, ScanEvent, ScanPhase};
use crate::drivers::{Channel, SensorReading, TemperatureSensor};
use crate::hal::{Interval, Transport};
use crate::motors::{Axis, ServoAxes};
use crate::protocol::{Command, CommandError, Framer, Response};

const ERROR_BIT_WARNING: &str = "Temp sensor errorbit high";

/// Runtime configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CameraConfig {
    pub scan: ScanConfig,
    /// Scan tick period in units of the tick source passed to [`ThermalCamera::poll`].
    pub tick_period: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            tick_period: 20,
        }
    }
}

impl CameraConfig {
    pub fn with_scan(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_tick_period(mut self, tick_period: u32) -> Self {
        self.tick_period = tick_period;
        self
    }
}

/// Pan/tilt thermal scanner.
pub struct ThermalCamera<S, PA, PB> {
    sensor: S,
    axes: ServoAxes<PA, PB>,
    scan: ScanController,
    framer: Framer,
    interval: Interval,
}

impl<S, PA, PB> ThermalCamera<S, PA, PB>
where
    S: TemperatureSensor,
    PA: PwmPin<Duty = u16>,
    PB: PwmPin<Duty = u16>,
{
    /// `now` is the current value of the tick source.
    pub fn new(sensor: S, axes: ServoAxes<PA, PB>, config: CameraConfig, now: u32) -> Self {
        Self {
            sensor,
            axes,
            scan: ScanController::new(config.scan),
            framer: Framer::new(),
            interval: Interval::new(config.tick_period, now),
        }
    }

    #[inline]
    pub fn axes(&self) -> &ServoAxes<PA, PB> {
        &self.axes
    }

    #[inline]
    pub fn scan(&self) -> &ScanController {
        &self.scan
    }

    #[inline]
    pub fn scan_phase(&self) -> ScanPhase {
        self.scan.phase()
    }

    pub fn sensor(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// One iteration of the main loop: advance the scan if a tick is due, then drain and execute
    /// everything the host has sent.
    pub fn poll<T: Transport>(&mut self, now: u32, link: &mut T) {
        let due = self.interval.elapsed(now);
        if due && self.scan.is_active() {
            self.tick(link);
        }
        self.receive(link);
    }

    /// Advance the scan by exactly one tick.
    pub fn tick<T: Transport>(&mut self, link: &mut T) {
        self.scan
            .tick(&mut self.sensor, &mut self.axes, |ev| report(ev, link));
    }

    /// Drain all currently available bytes from `link`.
    pub fn receive<T: Transport>(&mut self, link: &mut T) {
        while let Some(byte) = link.read_byte() {
            self.handle_byte(byte, link);
        }
    }

    /// Feed one inbound byte, executing a command when it completes a frame.
    pub fn handle_byte<T: Transport>(&mut self, byte: u8, link: &mut T) {
        match self.framer.push(byte) {
            Ok(Some(frame)) => self.execute(&frame, link),
            Ok(None) => {}
            Err(e) => {
                log::debug!("framer: {}", e);
                Response::Warning(&e).send(link);
            }
        }
    }

    /// Parse and run the payload of one frame.
    pub fn execute<T: Transport>(&mut self, frame: &[u8], link: &mut T) {
        let result = Command::parse(frame).and_then(|cmd| self.dispatch(cmd, link));
        if let Err(e) = result {
            log::debug!("command {:?}: {}", frame, e);
            Response::Warning(&e).send(link);
        }
    }

    /// Run one command. Range and scan-state problems are reported to the host directly; only a
    /// command that could not be carried out at all returns an error.
    pub fn dispatch<T: Transport>(
        &mut self,
        cmd: Command,
        link: &mut T,
    ) -> Result<(), CommandError> {
        match cmd {
            Command::Info => Response::Info.send(link),

            Command::QueryAbsolute => {
                let (a, b) = self.axes.positions();
                Response::AbsolutePosition(a, b).send(link);
            }

            Command::SetAbsolute { a, b } => {
                self.move_axis(link, Axis::A, a, false);
                self.move_axis(link, Axis::B, b, false);
            }

            Command::SetRelative { da, db } => {
                self.move_axis(link, Axis::A, da, true);
                self.move_axis(link, Axis::B, db, true);
            }

            Command::QueryAxis(axis) => Response::AxisPosition(self.axes.get(axis)).send(link),

            Command::SetAxis(axis, value) => self.move_axis(link, axis, value, false),

            Command::StartScan => {
                if let Err(e) = self.scan.start(&mut self.axes, |ev| report(ev, link)) {
                    Response::Warning(&e).send(link);
                }
            }

            Command::ReadTemperature(channel) => {
                let reading = self.sensor.read_channel(channel).map_err(|e| {
                    log::warn!("sensor: {:?} read failed: {}", channel, e);
                    CommandError::Malformed(cmd.opcode())
                })?;
                warn_on_error_bit(&reading, link);
                match channel {
                    Channel::Object => Response::Object(reading.raw()).send(link),
                    Channel::Ambient => Response::Ambient(reading.raw()).send(link),
                }
            }
        }
        Ok(())
    }

    fn move_axis<T: Transport>(&mut self, link: &mut T, axis: Axis, value: i32, relative: bool) {
        let result = if relative {
            self.axes.offset(axis, value)
        } else {
            self.axes.set(axis, value)
        };
        if let Err(e) = result {
            Response::Warning(&e).send(link);
        }
    }
}

fn warn_on_error_bit<T: Transport>(reading: &SensorReading, link: &mut T) {
    if reading.error_flag() {
        log::warn!("sensor: error bit set (raw {})", reading.raw());
        Response::Warning(&ERROR_BIT_WARNING).send(link);
    }
}

/// Translate a scan event into host messages.
fn report<T: Transport>(ev: ScanEvent, link: &mut T) {
    match ev {
        ScanEvent::Started => Response::Debug(&"Scan started").send(link),
        ScanEvent::Settled => Response::Debug(&"Scan settled").send(link),
        ScanEvent::Sample { x, y, reading } => {
            warn_on_error_bit(&reading, link);
            Response::ScanPoint {
                x,
                y,
                raw: reading.raw(),
            }
            .send(link);
        }
        ScanEvent::SampleFailed { .. } => Response::ScanFailed.send(link),
        ScanEvent::MoveRejected(e) => Response::Warning(&e).send(link),
        ScanEvent::Complete => Response::Debug(&"Scan complete").send(link),
    }
}
