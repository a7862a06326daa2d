//! Error types for table conversion.

use thiserror::Error;

/// Errors that can occur when converting table files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (short reads, malformed strings, bad hex).
    #[error("{0}")]
    Common(#[from] tblkit_common::Error),

    /// CSV reader or writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record declared more bytes than the file still holds.
    #[error("truncated stream: record '{key}' declares {declared} bytes but only {available} remain")]
    TruncatedStream {
        key: String,
        declared: i16,
        available: usize,
    },

    /// A typed record decoded without consuming its whole body.
    #[error("record '{key}' has {remaining} undecoded trailing bytes")]
    TrailingBytes { key: String, remaining: usize },

    /// A CSV field could not be converted to its column's type.
    #[error("record '{key}', column {column}: {reason}")]
    RecordDecode {
        key: String,
        column: usize,
        reason: String,
    },

    /// An encoded record body does not fit its 16-bit length prefix.
    #[error("record body of {size} bytes does not fit a 16-bit length prefix")]
    RecordTooLarge { size: usize },

    /// The record or key count does not fit the 16-bit header fields.
    #[error("too many entries for a table header: {0}")]
    TooManyRecords(usize),

    /// The input path has an extension with no conversion.
    #[error("this file type is not supported: {0:?}")]
    UnrecognizedExtension(String),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, Error>;
