// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Integer argument parsing for command payloads.
//!
//! Numbers are parsed leniently, the way C `atoi` does: leading spaces are skipped, an optional
//! sign is accepted, digits are consumed until the first non-digit and an empty or non-numeric
//! field reads as `0`. Out-of-range magnitudes saturate.

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum CsvError {
    /// No separator was found before value `index` (0-based).
    #[error("missing value {index}")]
    MissingValue { index: usize },
}

/// Parse a leading decimal integer from `bytes`.
pub fn parse_int(bytes: &[u8]) -> i32 {
    let mut rest = bytes;
    while let [b' ' | b'\t', tail @ ..] = rest {
        rest = tail;
    }

    let negative = match rest {
        [b'-', tail @ ..] => {
            rest = tail;
            true
        }
        [b'+', tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for &b in rest.iter().take_while(|b| b.is_ascii_digit()) {
        value = (value * 10 + (b - b'0') as i64).min(i32::MAX as i64 + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Parse `N` comma-separated integers from `bytes`.
///
/// The first value is read from the start of `bytes`; each further value follows the next comma.
/// Fails if fewer than `N - 1` commas are present, in which case nothing is returned.
pub fn parse_csv<const N: usize>(bytes: &[u8]) -> Result<[i32; N], CsvError> {
    let mut values = [0i32; N];
    if N == 0 {
        return Ok(values);
    }

    values[0] = parse_int(bytes);
    let mut pos = 0;
    for (index, value) in values.iter_mut().enumerate().skip(1) {
        let comma = bytes[pos..]
            .iter()
            .position(|&b| b == b',')
            .ok_or(CsvError::MissingValue { index })?;
        pos += comma + 1;
        *value = parse_int(&bytes[pos..]);
    }
    Ok(values)
}
