//! Little-endian writing helpers.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

/// Extension trait adding `.tbl` scalar writes to any [`Write`].
///
/// Every method mirrors a read on [`BinaryReader`](crate::BinaryReader).
pub trait BinaryWriterExt: Write {
    #[inline]
    fn write_u8_le(&mut self, value: u8) -> io::Result<()> {
        self.write_u8(value)
    }

    #[inline]
    fn write_i16_le(&mut self, value: i16) -> io::Result<()> {
        self.write_i16::<LittleEndian>(value)
    }

    #[inline]
    fn write_i32_le(&mut self, value: i32) -> io::Result<()> {
        self.write_i32::<LittleEndian>(value)
    }

    #[inline]
    fn write_f32_le(&mut self, value: f32) -> io::Result<()> {
        self.write_f32::<LittleEndian>(value)
    }

    /// Write the UTF-8 bytes of `value` followed by a single `0x00`.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] if `value` already holds a
    /// NUL byte, which would end the string early on read.
    fn write_cstring(&mut self, value: &str) -> io::Result<()> {
        if memchr::memchr(0, value.as_bytes()).is_some() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "string contains a NUL byte",
            ));
        }
        self.write_all(value.as_bytes())?;
        self.write_u8(0)
    }
}

impl<W: Write + ?Sized> BinaryWriterExt for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_write_scalars() {
        let mut buf = Vec::new();
        buf.write_i16_le(-1).unwrap();
        buf.write_i32_le(0x01020304).unwrap();
        buf.write_f32_le(2.0).unwrap();
        buf.write_u8_le(7).unwrap();

        assert_eq!(
            buf,
            [0xFF, 0xFF, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x00, 0x40, 0x07]
        );
    }

    #[test]
    fn test_write_cstring_reads_back() {
        let mut buf = Vec::new();
        buf.write_cstring("Tear Balm").unwrap();
        buf.write_cstring("").unwrap();

        assert_eq!(buf.len(), 11);

        let mut reader = BinaryReader::new(&buf);
        assert_eq!(reader.read_cstring().unwrap(), "Tear Balm");
        assert_eq!(reader.read_cstring().unwrap(), "");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_write_cstring_rejects_nul() {
        let mut buf = Vec::new();
        let err = buf.write_cstring("Heal\0s").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(buf.is_empty());
    }
}
