// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame extraction for the host command protocol.
//!
//! A command is everything between a `<` and the next `>`. The framer is fed one byte at a time and
//! hands out the payload of each complete frame.

use heapless::Vec;
use thiserror::Error;

/// Start-of-frame delimiter.
pub const START_BYTE: u8 = b'<';
/// End-of-frame delimiter.
pub const END_BYTE: u8 = b'>';
/// Longest accepted frame payload, delimiters excluded.
pub const MAX_FRAME_LEN: usize = 32;

/// Payload of one received frame.
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// Framing problems. All are recoverable; the host is warned and input resynchronises on the
/// next start delimiter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Start delimiter inside an open frame. The frame restarts.
    #[error("Command already started!")]
    AlreadyStarted,
    /// Frame exceeded [`MAX_FRAME_LEN`]. It is dropped.
    #[error("Input buffer overflow - command ignored")]
    Overflow,
    /// Byte received outside of a frame.
    #[error("Command has not started! - ignoring..")]
    NotStarted,
}

#[derive(Copy, Clone)]
enum State {
    WaitStart,
    InFrame,
    /// Dropping the rest of an overflowed frame.
    Discard,
}

pub struct Framer {
    state: State,
    buf: Frame,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    pub fn new() -> Self {
        Self {
            state: State::WaitStart,
            buf: Vec::new(),
        }
    }

    /// Process a single incoming byte.
    ///
    /// Returns `Ok(Some(frame))` when `byte` completes a frame, `Err` when the host should be
    /// warned.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, ProtocolError> {
        match (self.state, byte) {
            (State::InFrame, START_BYTE) => {
                self.buf.clear();
                Err(ProtocolError::AlreadyStarted)
            }
            (_, START_BYTE) => {
                self.buf.clear();
                self.state = State::InFrame;
                Ok(None)
            }
            (State::InFrame, END_BYTE) => {
                self.state = State::WaitStart;
                Ok(Some(core::mem::take(&mut self.buf)))
            }
            (State::InFrame, _) => {
                if self.buf.push(byte).is_err() {
                    self.buf.clear();
                    self.state = State::Discard;
                    return Err(ProtocolError::Overflow);
                }
                Ok(None)
            }
            (State::Discard, _) => Ok(None),
            (State::WaitStart, _) => Err(ProtocolError::NotStarted),
        }
    }
}
