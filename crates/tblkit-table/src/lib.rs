//! Codec for key-tagged `.tbl` table files.
//!
//! A `.tbl` file stores records under short string keys (`item`, `magic`,
//! `ItemHelpData`, ...). This crate decodes the binary container into a
//! [`TblFile`], converts it to an editable CSV form, and encodes either form
//! back. Keys without a known layout are kept as raw bytes, so unknown tables
//! survive both conversions unchanged.
//!
//! # Example
//!
//! ```no_run
//! use tblkit_table::TblFile;
//!
//! let table = TblFile::from_tbl("t_item.tbl")?;
//! for entry in table.directory() {
//!     println!("{} ({}): {}", entry.key, entry.kind.name(), entry.count);
//! }
//! table.write_to_csv("t_item.csv")?;
//!
//! let edited = TblFile::from_csv("t_item.csv")?;
//! edited.write_to_tbl("t_item.tbl")?;
//! # Ok::<(), tblkit_table::Error>(())
//! ```

mod effect;
mod error;
mod file;
mod header;
mod tabular;

pub mod records;
pub mod text;

pub use effect::{EffectValue, EFFECT_PARAMS, EFFECT_SIZE, EFFECT_SLOTS};
pub use error::{Error, Result};
pub use file::{DirectoryEntry, TblFile};
pub use header::TblHeader;
pub use records::{HelpData, Item, Magic, Opaque, QuartzExtension, Record, RecordKind};
pub use tabular::TableFormat;
