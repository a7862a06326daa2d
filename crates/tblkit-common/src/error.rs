//! Error types for tblkit-common.

use thiserror::Error;

/// Common error type for tblkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A C string ran to the end of the buffer without a null terminator.
    #[error("malformed string: no null terminator before end of buffer (started at offset {offset})")]
    MalformedString { offset: usize },

    /// Hex text with an odd number of digits.
    #[error("hex string has an odd number of digits ({0})")]
    OddLengthHex(usize),

    /// A character in hex text that is neither a hex digit nor whitespace.
    #[error("invalid hex digit {found:?} at position {position}")]
    InvalidHexDigit { position: usize, found: char },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
