//! Pass-through records for keys without a dedicated layout.

use crate::text::{FieldCursor, RowWriter};
use crate::Result;

/// A record kept as raw body bytes.
///
/// The container writes the length prefix for these; the bytes themselves
/// are never reinterpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opaque {
    data: Vec<u8>,
}

impl Opaque {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// The raw body bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Leading short of the body, which is the record id in every known layout.
    pub fn id(&self) -> Option<i16> {
        match self.data.as_slice() {
            [lo, hi, ..] => Some(i16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }

    pub fn from_fields(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(Self::new(cursor.next_hex()?))
    }

    pub fn write_fields(&self, row: &mut RowWriter) {
        row.push_hex(&self.data);
    }
}
