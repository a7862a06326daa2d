//! Common utilities for tblkit.
//!
//! This crate provides the scalar codec primitives shared by the table crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`BinaryWriterExt`] - Little-endian writes on any `std::io::Write`
//! - [`hex`] - Hex text for uninterpreted byte blocks

mod error;
mod reader;
mod writer;

pub mod hex;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriterExt;

/// Re-export memchr for byte searching
pub use memchr;
