//! Table file header structure.

use tblkit_common::BinaryReader;
use zerocopy::byteorder::{LittleEndian, I16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Result;

/// The fixed 6-byte header at the start of every `.tbl` file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct TblHeader {
    /// Total number of records in the file.
    pub object_count: I16<LittleEndian>,
    /// Number of key directory entries.
    pub key_count: I16<LittleEndian>,
    /// Always zero.
    pub reserved: I16<LittleEndian>,
}

impl TblHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a header with a zero reserved field.
    pub fn new(object_count: i16, key_count: i16) -> Self {
        Self {
            object_count: I16::new(object_count),
            key_count: I16::new(key_count),
            reserved: I16::new(0),
        }
    }

    /// Read the header from the start of a reader.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let bytes = reader.read_bytes(Self::SIZE)?;
        Self::read_from_bytes(bytes).map_err(|_| {
            tblkit_common::Error::UnexpectedEof {
                needed: Self::SIZE,
                available: bytes.len(),
            }
            .into()
        })
    }

    /// Number of records, with negative values read as zero.
    pub fn object_count(&self) -> usize {
        self.object_count.get().max(0) as usize
    }

    /// Number of directory entries, with negative values read as zero.
    pub fn key_count(&self) -> usize {
        self.key_count.get().max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = TblHeader::new(0x0102, 3);

        assert_eq!(TblHeader::SIZE, 6);
        assert_eq!(header.as_bytes(), &[0x02, 0x01, 0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_header_read() {
        let data = [0x05, 0x00, 0x02, 0x00, 0x00, 0x00, 0xAA];
        let mut reader = BinaryReader::new(&data);
        let header = TblHeader::read(&mut reader).unwrap();

        assert_eq!(header.object_count(), 5);
        assert_eq!(header.key_count(), 2);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_negative_counts() {
        let data = [0xFF, 0xFF, 0x00, 0x80, 0x00, 0x00];
        let mut reader = BinaryReader::new(&data);
        let header = TblHeader::read(&mut reader).unwrap();

        assert_eq!(header.object_count(), 0);
        assert_eq!(header.key_count(), 0);
    }

    #[test]
    fn test_short_header() {
        let data = [0x01, 0x00];
        let mut reader = BinaryReader::new(&data);

        assert!(TblHeader::read(&mut reader).is_err());
    }
}
