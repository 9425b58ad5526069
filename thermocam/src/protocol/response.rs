// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Outbound messages.
//!
//! Every message is sent as `<TAG:payload>` followed by CRLF, using the same delimiters as inbound
//! commands.

use core::fmt::{self, Write};

use heapless::String;

use crate::hal::Transport;
use crate::protocol::framer::{END_BYTE, START_BYTE};

/// Capacity of one encoded response, delimiters and line ending included.
pub const MAX_RESPONSE_LEN: usize = 96;

/// Device identification returned by the info query.
pub const DEVICE_INFO: &str = "dev=ThermalCamera";

/// One encoded response.
pub type ResponseBuf = String<MAX_RESPONSE_LEN>;

/// A message to the host.
#[derive(Copy, Clone)]
pub enum Response<'a> {
    /// Device identification.
    Info,
    /// Both axis positions `(A, B)`.
    AbsolutePosition(u16, u16),
    /// One axis position.
    AxisPosition(u16),
    /// Raw object temperature.
    Object(u16),
    /// Raw ambient temperature.
    Ambient(u16),
    /// Sample taken during a scan.
    ScanPoint { x: u16, y: u16, raw: u16 },
    /// Sample during a scan could not be read.
    ScanFailed,
    Warning(&'a dyn fmt::Display),
    Error(&'a dyn fmt::Display),
    /// Diagnostic; only sent with the `debug-messages` feature.
    Debug(&'a dyn fmt::Display),
}

impl Response<'_> {
    pub fn tag(&self) -> &'static str {
        match self {
            Response::Info => "INFO",
            Response::AbsolutePosition(..) => "ABSPOS",
            // Both axes answer with the same tag.
            Response::AxisPosition(_) => "OCRA",
            Response::Object(_) => "OBJECT",
            Response::Ambient(_) => "AMBIENT",
            Response::ScanPoint { .. } | Response::ScanFailed => "Scan",
            Response::Warning(_) => "WARNING",
            Response::Error(_) => "ERROR",
            Response::Debug(_) => "DEBUG",
        }
    }

    /// Whether this build sends the message at all.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Response::Debug(_)) || cfg!(feature = "debug-messages")
    }

    fn write_payload<W: Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            Response::Info => w.write_str(DEVICE_INFO),
            Response::AbsolutePosition(a, b) => write!(w, "{a},{b}"),
            Response::AxisPosition(v) | Response::Object(v) | Response::Ambient(v) => {
                write!(w, "{v}")
            }
            Response::ScanPoint { x, y, raw } => write!(w, "{x}:{y}:{raw}"),
            Response::ScanFailed => w.write_str("0"),
            Response::Warning(msg) | Response::Error(msg) | Response::Debug(msg) => {
                write!(w, "{msg}")
            }
        }
    }

    /// Write the framed message, line ending included.
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_char(START_BYTE as char)?;
        w.write_str(self.tag())?;
        w.write_char(':')?;
        self.write_payload(w)?;
        w.write_char(END_BYTE as char)?;
        w.write_str("\r\n")
    }

    /// Encode into a fixed buffer. A message that does not fit is replaced by an error notice.
    pub fn encode(&self) -> ResponseBuf {
        let mut buf = ResponseBuf::new();
        if self.write_to(&mut buf).is_err() {
            buf.clear();
            // Always fits.
            let _ = Response::Error(&"Response truncated").write_to(&mut buf);
        }
        buf
    }

    /// Encode and send over `link`, unless disabled in this build.
    pub fn send<T: Transport + ?Sized>(&self, link: &mut T) {
        if self.is_enabled() {
            link.write(self.encode().as_bytes());
        }
    }
}

impl fmt::Debug for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}
