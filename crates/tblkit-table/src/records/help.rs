//! Help text records (`ItemHelpData`, `CompHelpData`).

use std::io::Write;

use tblkit_common::{BinaryReader, BinaryWriterExt};

use super::frame;
use crate::text::{FieldCursor, RowWriter};
use crate::Result;

/// Length of the uninterpreted tail of a help entry.
pub const HELP_TAIL_LEN: usize = 9;

/// A help text entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HelpData {
    pub id: i16,
    pub description: String,
    pub unknown_tail: [u8; HELP_TAIL_LEN],
}

impl HelpData {
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            id: reader.read_i16()?,
            description: reader.read_cstring()?.to_string(),
            unknown_tail: reader.read_array()?,
        })
    }

    /// Encode the entry with its 16-bit length prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(2 + self.description.len() + 1 + HELP_TAIL_LEN);
        payload.write_i16_le(self.id)?;
        payload.write_cstring(&self.description)?;
        payload.write_all(&self.unknown_tail)?;
        frame(payload)
    }

    pub fn from_fields(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(Self {
            id: cursor.next_value()?,
            description: cursor.next_string()?,
            unknown_tail: cursor.next_hex_array()?,
        })
    }

    pub fn write_fields(&self, row: &mut RowWriter) {
        row.push(self.id);
        row.push_string(&self.description);
        row.push_hex(&self.unknown_tail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_byte_entry() {
        let help = HelpData {
            id: 3,
            description: "Potion".to_string(),
            unknown_tail: [0, 1, 2, 3, 4, 5, 6, 7, 8],
        };
        let bytes = help.to_bytes().unwrap();

        assert_eq!(bytes.len(), 20);
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 18);
        assert_eq!(&bytes[2..4], &[3, 0]);
        assert_eq!(&bytes[4..11], b"Potion\0");

        let mut reader = BinaryReader::new(&bytes[2..]);
        assert_eq!(HelpData::read(&mut reader).unwrap(), help);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_missing_tail() {
        let data = [3, 0, b'A', 0, 1, 2];
        let mut reader = BinaryReader::new(&data);

        assert!(HelpData::read(&mut reader).is_err());
    }

    #[test]
    fn test_text_columns() {
        let help = HelpData {
            id: -7,
            description: "Line 1\nLine, 2".to_string(),
            unknown_tail: [0xFF; HELP_TAIL_LEN],
        };
        let mut row = RowWriter::new("CompHelpData");
        help.write_fields(&mut row);

        assert_eq!(
            row.fields(),
            [
                "CompHelpData",
                "-7",
                "Line 1\\nLine, 2",
                "FF FF FF FF FF FF FF FF FF"
            ]
        );

        let record = csv::StringRecord::from(row.fields().to_vec());
        let mut cursor = FieldCursor::new(&record, "CompHelpData");
        assert_eq!(HelpData::from_fields(&mut cursor).unwrap(), help);
    }
}
