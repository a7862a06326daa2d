//! Table file container.
//!
//! A `.tbl` file is laid out as:
//!
//! ```text
//! i16 object_count | i16 key_count | i16 0
//! key_count    x (cstring key | i16 count | i16 0)
//! object_count x (cstring key | i16 length | length bytes of body)
//! ```
//!
//! All counts are derived from the stored buckets when writing, so the header
//! and directory always agree with the records that follow them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use tblkit_common::{BinaryReader, BinaryWriterExt};
use zerocopy::IntoBytes;

use crate::header::TblHeader;
use crate::records::{Record, RecordKind};
use crate::{Error, Result};

/// A parsed table: records grouped by key, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TblFile {
    tables: IndexMap<String, Vec<Record>>,
}

/// One key directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DirectoryEntry<'a> {
    pub key: &'a str,
    pub kind: RecordKind,
    pub count: usize,
}

impl TblFile {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a `.tbl` file from disk.
    pub fn from_tbl<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse a table from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header = TblHeader::read(&mut reader)?;

        let mut file = Self::new();
        let mut declared = Vec::with_capacity(header.key_count());

        // Key directory
        for _ in 0..header.key_count() {
            let key = reader.read_cstring()?;
            let count = reader.read_i16()?;
            let _reserved = reader.read_i16()?;

            if file.tables.contains_key(key) {
                tracing::warn!(key, "duplicate key in directory");
            } else {
                file.insert_key(key);
            }
            declared.push((key, count));
        }

        // Records
        for index in 0..header.object_count() {
            let key = reader.read_cstring()?;
            let declared_len = reader.read_i16()?;
            let available = reader.remaining();

            let length = usize::try_from(declared_len)
                .ok()
                .filter(|&length| length <= available)
                .ok_or_else(|| Error::TruncatedStream {
                    key: key.to_string(),
                    declared: declared_len,
                    available,
                })?;
            let body = reader.read_bytes(length)?;

            let kind = RecordKind::from_key(key);
            tracing::debug!(index, key, kind = kind.name(), length, "decoding record");
            let record = kind.decode(key, body)?;

            if !file.tables.contains_key(key) {
                tracing::warn!(key, index, "record key missing from directory");
            }
            file.push(key, record);
        }

        for (key, count) in declared {
            let actual = file.tables.get(key).map_or(0, Vec::len);
            if usize::try_from(count).ok() != Some(actual) {
                tracing::warn!(key, declared = count, actual, "directory count mismatch");
            }
        }

        if reader.has_remaining_bytes() {
            tracing::warn!(
                remaining = reader.remaining(),
                "ignoring bytes after the last record"
            );
        }

        Ok(file)
    }

    /// Total number of records.
    pub fn object_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.tables.len()
    }

    /// Check whether the table holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate over the key directory in file order.
    pub fn directory(&self) -> impl Iterator<Item = DirectoryEntry<'_>> {
        self.tables.iter().map(|(key, records)| DirectoryEntry {
            key,
            kind: RecordKind::from_key(key),
            count: records.len(),
        })
    }

    /// Iterate over the keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Get the records stored under a key.
    pub fn records(&self, key: &str) -> Option<&[Record]> {
        self.tables.get(key).map(Vec::as_slice)
    }

    /// Iterate over every record with its key, in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.tables
            .iter()
            .flat_map(|(key, records)| records.iter().map(move |r| (key.as_str(), r)))
    }

    /// Add a key with no records, if it is not present yet.
    pub fn insert_key(&mut self, key: &str) {
        if !self.tables.contains_key(key) {
            self.tables.insert(key.to_string(), Vec::new());
        }
    }

    /// Append a record under a key, creating the key on first use.
    pub fn push(&mut self, key: &str, record: Record) {
        match self.tables.get_mut(key) {
            Some(records) => records.push(record),
            None => {
                self.tables.insert(key.to_string(), vec![record]);
            }
        }
    }

    /// Build the header from the current contents.
    pub fn header(&self) -> Result<TblHeader> {
        let object_count = self.object_count();
        let objects =
            i16::try_from(object_count).map_err(|_| Error::TooManyRecords(object_count))?;
        let keys = i16::try_from(self.key_count())
            .map_err(|_| Error::TooManyRecords(self.key_count()))?;
        Ok(TblHeader::new(objects, keys))
    }

    /// Write the table in binary form.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.header()?.as_bytes())?;

        for (key, records) in &self.tables {
            writer.write_cstring(key)?;
            // Bounded by the object count checked in header().
            writer.write_i16_le(records.len() as i16)?;
            writer.write_i16_le(0)?;
        }

        for (key, records) in &self.tables {
            for record in records {
                writer.write_cstring(key)?;
                record.write_framed(writer)?;
            }
        }

        Ok(())
    }

    /// Encode the table to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Write the table to a `.tbl` file.
    pub fn write_to_tbl<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
