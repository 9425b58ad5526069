// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Raster scan over a square grid.
//!
//! The controller walks a `resolution × resolution` grid in boustrophedon order: axis B sweeps a
//! full column, axis A steps one column over, and axis B sweeps back. One grid cell is sampled per
//! call to [`ScanController::tick`].
//!
//! ```ignore
//! scan.start(&mut axes, |ev| report(ev))?;
//!
//! loop {
//!     if interval.elapsed(now()) {
//!         scan.tick(&mut sensor, &mut axes, |ev| report(ev));
//!     }
//! }
//! ```

use embedded_hal::PwmPin;
use thiserror::Error;

use crate::drivers::{Channel, SensorReading, TemperatureSensor};
use crate::hal::BusError;
use crate::motors::{Axis, RangeError, ServoAxes, SERVO_MAX, SERVO_MIN};

/// Scan geometry and timing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Grid cells per side.
    pub resolution: u16,
    /// Compare-value pitch between neighbouring cells.
    pub step_size: u16,
    /// Ticks to wait at the origin before the first sample.
    pub settle_ticks: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            step_size: 3,
            settle_ticks: 25,
        }
    }
}

impl ScanConfig {
    pub fn with_resolution(mut self, resolution: u16) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_step_size(mut self, step_size: u16) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_settle_ticks(mut self, settle_ticks: u32) -> Self {
        self.settle_ticks = settle_ticks;
        self
    }

    /// Unused servo travel on each side of the scanned range.
    ///
    /// Negative when the grid is wider than the servo travel.
    pub fn padding(&self) -> i32 {
        clamp_i32(self.padding_wide())
    }

    fn padding_wide(&self) -> i64 {
        ((SERVO_MAX - SERVO_MIN) as i64 - self.resolution as i64 * self.step_size as i64) / 2
    }

    /// Compare values `(A, B)` for grid cell `(x, y)`, centred in the servo travel.
    ///
    /// Axis B is flipped so that row 0 is at the top of the image. Targets outside `i32` are
    /// clamped; they are out of servo range either way.
    pub fn servo_targets(&self, x: u16, y: u16) -> (i32, i32) {
        let padding = self.padding_wide();
        let step = self.step_size as i64;
        let a = SERVO_MIN as i64 + padding + x as i64 * step;
        let b = SERVO_MAX as i64 - padding - y as i64 * step;
        (clamp_i32(a), clamp_i32(b))
    }
}

#[inline]
fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Lifecycle of a scan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    /// Waiting for the servos to reach the origin.
    Initializing { elapsed: u32 },
    Stepping,
}

/// Something the host should hear about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanEvent {
    Started,
    /// Settle delay expired; sampling begins on the next tick.
    Settled,
    Sample {
        x: u16,
        y: u16,
        reading: SensorReading,
    },
    SampleFailed {
        x: u16,
        y: u16,
        error: BusError,
    },
    /// A computed target was outside the servo range and was not applied.
    MoveRejected(RangeError),
    Complete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Scan already running.")]
    AlreadyRunning,
    #[error("Scan resolution must be at least 1.")]
    EmptyGrid,
}

/// Boustrophedon scan state machine.
pub struct ScanController {
    config: ScanConfig,
    phase: ScanPhase,
    x: u16,
    y: u16,
    direction: i8,
}

impl ScanController {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            phase: ScanPhase::Idle,
            x: 0,
            y: 0,
            direction: 1,
        }
    }

    #[inline]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase != ScanPhase::Idle
    }

    /// Current grid cell `(x, y)`.
    #[inline]
    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// Sweep direction of axis B, `+1` or `-1`.
    #[inline]
    pub fn direction(&self) -> i8 {
        self.direction
    }

    /// Begin a new scan: reset to cell `(0, 0)` and command the servos there.
    pub fn start<PA, PB>(
        &mut self,
        axes: &mut ServoAxes<PA, PB>,
        mut emit: impl FnMut(ScanEvent),
    ) -> Result<(), ScanError>
    where
        PA: PwmPin<Duty = u16>,
        PB: PwmPin<Duty = u16>,
    {
        if self.is_active() {
            return Err(ScanError::AlreadyRunning);
        }
        if self.config.resolution == 0 {
            return Err(ScanError::EmptyGrid);
        }

        self.x = 0;
        self.y = 0;
        self.direction = 1;
        self.phase = ScanPhase::Initializing { elapsed: 0 };
        log::debug!(
            "scan: start {0}x{0}, step {1}, padding {2}",
            self.config.resolution,
            self.config.step_size,
            self.config.padding()
        );

        emit(ScanEvent::Started);
        self.move_servos(axes, &mut emit);
        Ok(())
    }

    /// Advance the scan by one tick. Does nothing while idle.
    pub fn tick<S, PA, PB>(
        &mut self,
        sensor: &mut S,
        axes: &mut ServoAxes<PA, PB>,
        mut emit: impl FnMut(ScanEvent),
    ) where
        S: TemperatureSensor,
        PA: PwmPin<Duty = u16>,
        PB: PwmPin<Duty = u16>,
    {
        match self.phase {
            ScanPhase::Idle => {}

            ScanPhase::Initializing { elapsed } => {
                let elapsed = elapsed + 1;
                if elapsed >= self.config.settle_ticks {
                    self.phase = ScanPhase::Stepping;
                    log::debug!("scan: settled after {} ticks", elapsed);
                    emit(ScanEvent::Settled);
                } else {
                    self.phase = ScanPhase::Initializing { elapsed };
                }
            }

            ScanPhase::Stepping => {
                let (x, y) = (self.x, self.y);
                match sensor.read_channel(Channel::Object) {
                    Ok(reading) => emit(ScanEvent::Sample { x, y, reading }),
                    Err(error) => {
                        log::warn!("scan: sample ({}, {}) failed: {}", x, y, error);
                        emit(ScanEvent::SampleFailed { x, y, error });
                    }
                }

                self.advance();

                if self.x >= self.config.resolution {
                    self.phase = ScanPhase::Idle;
                    log::debug!("scan: complete");
                    emit(ScanEvent::Complete);
                    return;
                }

                self.move_servos(axes, &mut emit);
            }
        }
    }

    /// Step to the next cell in serpentine order.
    fn advance(&mut self) {
        let last_row = self.config.resolution - 1;
        if self.direction == 1 && self.y >= last_row {
            self.y = last_row;
            self.x += 1;
            self.direction = -1;
        } else if self.direction == -1 && self.y == 0 {
            self.x += 1;
            self.direction = 1;
        } else if self.direction == 1 {
            self.y += 1;
        } else {
            self.y -= 1;
        }
    }

    fn move_servos<PA, PB>(&self, axes: &mut ServoAxes<PA, PB>, emit: &mut impl FnMut(ScanEvent))
    where
        PA: PwmPin<Duty = u16>,
        PB: PwmPin<Duty = u16>,
    {
        let (a, b) = self.config.servo_targets(self.x, self.y);
        for (axis, target) in [(Axis::A, a), (Axis::B, b)] {
            if let Err(e) = axes.set(axis, target) {
                log::warn!("scan: {}", e);
                emit(ScanEvent::MoveRejected(e));
            }
        }
    }
}
