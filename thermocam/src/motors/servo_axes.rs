// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pan/tilt servo pair.
//!
//! Positions are raw timer compare values. With a 50 Hz frame and a 4 µs timer tick, the valid
//! range `SERVO_MIN..=SERVO_MAX` corresponds to pulse widths of 0.70 ms to 2.43 ms.

use embedded_hal::PwmPin;
use thiserror::Error;

/// Smallest compare value (minimal servo angle).
pub const SERVO_MIN: u16 = 175;
/// Largest compare value (maximal servo angle).
pub const SERVO_MAX: u16 = 608;
/// Position both axes are parked at on power-up.
pub const SERVO_CENTER: u16 = (SERVO_MIN + SERVO_MAX) / 2;

/// One of the two servo axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal sweep (scan column, `x`).
    A,
    /// Vertical sweep (scan row, `y`).
    B,
}

impl Axis {
    #[inline]
    fn index(self) -> usize {
        match self {
            Axis::A => 0,
            Axis::B => 1,
        }
    }
}

/// Requested compare value outside the mechanical range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("Servo position value has to be between {min} and {max}. ({attempted} was set)")]
pub struct RangeError {
    pub axis: Axis,
    pub attempted: i32,
    pub min: u16,
    pub max: u16,
}

/// Two servos on PWM compare channels.
///
/// The last accepted position of each axis is remembered; rejected writes leave it and the
/// hardware untouched.
pub struct ServoAxes<PA, PB> {
    a: PA,
    b: PB,
    positions: [u16; 2],
}

impl<PA, PB> ServoAxes<PA, PB>
where
    PA: PwmPin<Duty = u16>,
    PB: PwmPin<Duty = u16>,
{
    /// Take ownership of both PWM channels, park them at [`SERVO_CENTER`] and enable output.
    pub fn new(mut a: PA, mut b: PB) -> Self {
        a.set_duty(SERVO_CENTER);
        b.set_duty(SERVO_CENTER);
        a.enable();
        b.enable();

        Self {
            a,
            b,
            positions: [SERVO_CENTER; 2],
        }
    }

    /// Current compare value of `axis`.
    #[inline]
    pub fn get(&self, axis: Axis) -> u16 {
        self.positions[axis.index()]
    }

    /// Current `(A, B)` compare values.
    #[inline]
    pub fn positions(&self) -> (u16, u16) {
        (self.positions[0], self.positions[1])
    }

    /// Move `axis` to `value`.
    ///
    /// `value` is signed so that relative moves and negative host input report the value that
    /// was actually requested.
    pub fn set(&mut self, axis: Axis, value: i32) -> Result<(), RangeError> {
        let duty = Self::validate(axis, value)?;
        match axis {
            Axis::A => self.a.set_duty(duty),
            Axis::B => self.b.set_duty(duty),
        }
        self.positions[axis.index()] = duty;
        Ok(())
    }

    /// Move `axis` by `delta` from its current position.
    pub fn offset(&mut self, axis: Axis, delta: i32) -> Result<(), RangeError> {
        let target = (self.get(axis) as i32).saturating_add(delta);
        self.set(axis, target)
    }

    fn validate(axis: Axis, value: i32) -> Result<u16, RangeError> {
        if (SERVO_MIN as i32..=SERVO_MAX as i32).contains(&value) {
            Ok(value as u16)
        } else {
            Err(RangeError {
                axis,
                attempted: value,
                min: SERVO_MIN,
                max: SERVO_MAX,
            })
        }
    }

    pub fn free(self) -> (PA, PB) {
        (self.a, self.b)
    }
}
