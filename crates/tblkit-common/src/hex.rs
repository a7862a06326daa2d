//! Hex text for byte blocks the table format does not interpret.
//!
//! The text form is upper-case digit pairs separated by single spaces
//! (`"0A FF 00"`). Parsing ignores whitespace and accepts either case.

use std::fmt::Write;

use crate::{Error, Result};

/// Format bytes as space-separated upper-case hex pairs.
///
/// ```
/// assert_eq!(tblkit_common::hex::bytes_to_hex(&[0x0A, 0xFF]), "0A FF");
/// ```
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Parse hex text produced by [`bytes_to_hex`] back into bytes.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>> {
    let mut digits = Vec::with_capacity(text.len());
    for (position, c) in text.char_indices() {
        if c.is_whitespace() {
            continue;
        }
        let value = c
            .to_digit(16)
            .ok_or(Error::InvalidHexDigit { position, found: c })?;
        digits.push(value as u8);
    }

    if digits.len() % 2 != 0 {
        return Err(Error::OddLengthHex(digits.len()));
    }

    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}
