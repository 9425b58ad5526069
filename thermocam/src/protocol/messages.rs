// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host commands and their text encoding.
//!
//! The first byte of a frame is the opcode; the rest are its arguments.
//!
//! | Frame | Command |
//! | ----- | ------- |
//! | `i?` | [`Command::Info`] |
//! | `a?` | [`Command::QueryAbsolute`] |
//! | `a=X,Y` | [`Command::SetAbsolute`] |
//! | `r=DX,DY` | [`Command::SetRelative`] |
//! | `A?`, `B?` | [`Command::QueryAxis`] |
//! | `A=V`, `B=V` | [`Command::SetAxis`] |
//! | `s` | [`Command::StartScan`] |
//! | `to?`, `ta?` | [`Command::ReadTemperature`] |

use thiserror::Error;

use crate::drivers::Channel;
use crate::motors::Axis;
use crate::protocol::csv::{parse_csv, parse_int};

// Opcodes
pub const OP_INFO: u8 = b'i';
pub const OP_ABSOLUTE: u8 = b'a';
pub const OP_RELATIVE: u8 = b'r';
pub const OP_AXIS_A: u8 = b'A';
pub const OP_AXIS_B: u8 = b'B';
pub const OP_SCAN: u8 = b's';
pub const OP_TEMPERATURE: u8 = b't';

const QUERY: u8 = b'?';
const ASSIGN: u8 = b'=';

/// A parsed host command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Info,
    QueryAbsolute,
    SetAbsolute { a: i32, b: i32 },
    SetRelative { da: i32, db: i32 },
    QueryAxis(Axis),
    SetAxis(Axis, i32),
    StartScan,
    ReadTemperature(Channel),
}

/// Why a frame did not yield a [`Command`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    /// First byte is not a known opcode (or the frame is empty).
    #[error("Unknown command.")]
    Unknown(u8),
    /// Opcode recognised but its arguments are malformed, or the command failed.
    #[error("Command could not be parsed.")]
    Malformed(u8),
}

type ArgParser = fn(&[u8]) -> Option<Command>;

/// Opcode to argument parser.
const PARSERS: [(u8, ArgParser); 7] = [
    (OP_INFO, parse_info),
    (OP_ABSOLUTE, parse_absolute),
    (OP_RELATIVE, parse_relative),
    (OP_AXIS_A, parse_axis_a),
    (OP_AXIS_B, parse_axis_b),
    (OP_SCAN, parse_scan),
    (OP_TEMPERATURE, parse_temperature),
];

impl Command {
    /// Parse the payload of one frame.
    pub fn parse(frame: &[u8]) -> Result<Self, CommandError> {
        let (&opcode, args) = frame.split_first().ok_or(CommandError::Unknown(0))?;
        let parser = PARSERS
            .iter()
            .find(|(op, _)| *op == opcode)
            .map(|(_, parser)| parser)
            .ok_or(CommandError::Unknown(opcode))?;
        parser(args).ok_or(CommandError::Malformed(opcode))
    }

    /// Opcode this command is sent with.
    pub fn opcode(&self) -> u8 {
        match self {
            Command::Info => OP_INFO,
            Command::QueryAbsolute | Command::SetAbsolute { .. } => OP_ABSOLUTE,
            Command::SetRelative { .. } => OP_RELATIVE,
            Command::QueryAxis(Axis::A) | Command::SetAxis(Axis::A, _) => OP_AXIS_A,
            Command::QueryAxis(Axis::B) | Command::SetAxis(Axis::B, _) => OP_AXIS_B,
            Command::StartScan => OP_SCAN,
            Command::ReadTemperature(_) => OP_TEMPERATURE,
        }
    }
}

fn parse_info(args: &[u8]) -> Option<Command> {
    match args.first() {
        Some(&QUERY) => Some(Command::Info),
        _ => None,
    }
}

fn parse_absolute(args: &[u8]) -> Option<Command> {
    match args.split_first() {
        Some((&QUERY, _)) => Some(Command::QueryAbsolute),
        Some((&ASSIGN, values)) => {
            let [a, b] = parse_csv::<2>(values).ok()?;
            Some(Command::SetAbsolute { a, b })
        }
        _ => None,
    }
}

fn parse_relative(args: &[u8]) -> Option<Command> {
    match args.split_first() {
        Some((&ASSIGN, values)) => {
            let [da, db] = parse_csv::<2>(values).ok()?;
            Some(Command::SetRelative { da, db })
        }
        _ => None,
    }
}

fn parse_axis_a(args: &[u8]) -> Option<Command> {
    parse_axis(Axis::A, args)
}

fn parse_axis_b(args: &[u8]) -> Option<Command> {
    parse_axis(Axis::B, args)
}

fn parse_axis(axis: Axis, args: &[u8]) -> Option<Command> {
    match args.split_first() {
        Some((&QUERY, _)) => Some(Command::QueryAxis(axis)),
        Some((&ASSIGN, value)) => Some(Command::SetAxis(axis, parse_int(value))),
        _ => None,
    }
}

// Trailing bytes are ignored.
fn parse_scan(_args: &[u8]) -> Option<Command> {
    Some(Command::StartScan)
}

fn parse_temperature(args: &[u8]) -> Option<Command> {
    // Accept both `to?` and `t o?`.
    let args = match args {
        [b' ', rest @ ..] => rest,
        _ => args,
    };
    match args {
        [b'o', QUERY, ..] => Some(Command::ReadTemperature(Channel::Object)),
        [b'a', QUERY, ..] => Some(Command::ReadTemperature(Channel::Ambient)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_queries() {
        assert_eq!(Command::parse(b"i?"), Ok(Command::Info));
        assert_eq!(Command::parse(b"a?"), Ok(Command::QueryAbsolute));
        assert_eq!(Command::parse(b"A?"), Ok(Command::QueryAxis(Axis::A)));
        assert_eq!(Command::parse(b"B?"), Ok(Command::QueryAxis(Axis::B)));
    }

    #[test]
    fn parses_moves() {
        assert_eq!(
            Command::parse(b"a=300,400"),
            Ok(Command::SetAbsolute { a: 300, b: 400 })
        );
        assert_eq!(
            Command::parse(b"r=10,-10"),
            Ok(Command::SetRelative { da: 10, db: -10 })
        );
        assert_eq!(Command::parse(b"B=512"), Ok(Command::SetAxis(Axis::B, 512)));
    }

    #[test]
    fn parses_scan_and_temperature() {
        assert_eq!(Command::parse(b"s"), Ok(Command::StartScan));
        assert_eq!(
            Command::parse(b"to?"),
            Ok(Command::ReadTemperature(Channel::Object))
        );
        assert_eq!(
            Command::parse(b"t a?"),
            Ok(Command::ReadTemperature(Channel::Ambient))
        );
    }

    #[test]
    fn unknown_opcode() {
        assert_eq!(Command::parse(b"x?"), Err(CommandError::Unknown(b'x')));
        assert_eq!(Command::parse(b""), Err(CommandError::Unknown(0)));
    }

    #[test]
    fn malformed_arguments() {
        for frame in [&b"i"[..], b"i!", b"a=300", b"a", b"r?", b"r=5", b"A", b"tx?", b"to"] {
            let err = Command::parse(frame).unwrap_err();
            assert_eq!(err, CommandError::Malformed(frame[0]), "{:?}", frame);
        }
    }

    #[test]
    fn opcode_round_trips_through_table() {
        for frame in [&b"i?"[..], b"a?", b"r=1,2", b"A=200", b"B?", b"s", b"ta?"] {
            assert_eq!(Command::parse(frame).unwrap().opcode(), frame[0]);
        }
    }
}
