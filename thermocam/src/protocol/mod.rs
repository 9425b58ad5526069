// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Text command protocol spoken with the host.

pub mod csv;
pub mod framer;
pub mod messages;
pub mod response;

pub use framer::{Frame, Framer, ProtocolError};
pub use messages::{Command, CommandError};
pub use response::Response;
