//! tblkit - conversion between game `.tbl` tables and editable CSV.
//!
//! This crate gathers the tblkit library crates behind one dependency.
//!
//! # Crates
//!
//! - [`tblkit_common`] - Scalar codec primitives (binary reading, writing, hex)
//! - [`tblkit_table`] - Record layouts, the `.tbl` container and its CSV form
//!
//! # Example
//!
//! ```no_run
//! use tblkit::prelude::*;
//!
//! let path = std::path::Path::new("t_magic.tbl");
//! let table = match TableFormat::from_path(path)? {
//!     TableFormat::Tbl => TblFile::from_tbl(path)?,
//!     TableFormat::Csv => TblFile::from_csv(path)?,
//! };
//! println!("{} records under {} keys", table.object_count(), table.key_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use tblkit_common as common;
pub use tblkit_table as table;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tblkit_common::{hex, BinaryReader, BinaryWriterExt};
    pub use tblkit_table::{
        DirectoryEntry, EffectValue, HelpData, Item, Magic, Opaque, QuartzExtension, Record,
        RecordKind, TableFormat, TblFile,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
