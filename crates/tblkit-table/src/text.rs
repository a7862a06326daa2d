//! Column-level helpers shared by the record transcoders.
//!
//! A CSV row is read with a [`FieldCursor`] that walks the columns in the
//! record's fixed order, and written with a [`RowWriter`]. Column 0 always
//! holds the record key.

use std::fmt::Display;
use std::str::FromStr;

use csv::StringRecord;
use tblkit_common::hex;

use crate::{Error, Result};

/// Escape literal newlines as the two characters `\n`.
pub fn escape_newlines(value: &str) -> String {
    value.replace('\n', "\\n")
}

/// Turn `\n` sequences back into newlines.
pub fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

/// Sequential reader over the data columns of one CSV row.
#[derive(Debug)]
pub struct FieldCursor<'a> {
    record: &'a StringRecord,
    key: &'a str,
    column: usize,
}

impl<'a> FieldCursor<'a> {
    /// Start reading at column 1, just after the key.
    pub fn new(record: &'a StringRecord, key: &'a str) -> Self {
        Self {
            record,
            key,
            column: 1,
        }
    }

    /// The record key from column 0.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Index of the next column to be read.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of columns not yet read.
    pub fn remaining(&self) -> usize {
        self.record.len().saturating_sub(self.column)
    }

    fn error(&self, column: usize, reason: impl Into<String>) -> Error {
        Error::RecordDecode {
            key: self.key.to_string(),
            column,
            reason: reason.into(),
        }
    }

    /// Read the next column verbatim.
    pub fn next_raw(&mut self) -> Result<&'a str> {
        let column = self.column;
        let value = self
            .record
            .get(column)
            .ok_or_else(|| self.error(column, "missing column"))?;
        self.column += 1;
        Ok(value)
    }

    /// Read a free-text column, restoring escaped newlines.
    ///
    /// NUL bytes are rejected, since the binary form terminates strings with one.
    pub fn next_string(&mut self) -> Result<String> {
        let column = self.column;
        let raw = self.next_raw()?;
        if raw.contains('\0') {
            return Err(self.error(column, "NUL byte in text"));
        }
        Ok(unescape_newlines(raw))
    }

    /// Parse the next column as a number.
    pub fn next_value<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let column = self.column;
        let raw = self.next_raw()?;
        raw.trim()
            .parse()
            .map_err(|e| self.error(column, format!("{:?}: {}", raw, e)))
    }

    /// Parse the next column if the row has one and it is not blank.
    pub fn next_optional_value<T>(&mut self) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.record.get(self.column) {
            Some(raw) if !raw.trim().is_empty() => self.next_value().map(Some),
            Some(_) => {
                self.column += 1;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Parse the next column as hex bytes of any length.
    pub fn next_hex(&mut self) -> Result<Vec<u8>> {
        let column = self.column;
        let raw = self.next_raw()?;
        hex::hex_to_bytes(raw).map_err(|e| self.error(column, e.to_string()))
    }

    /// Parse the next column as exactly `N` hex bytes.
    pub fn next_hex_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let column = self.column;
        let bytes = self.next_hex()?;
        <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
            self.error(
                column,
                format!("expected {} hex bytes, got {}", N, bytes.len()),
            )
        })
    }
}

/// Builder for one output CSV row.
#[derive(Debug, Clone)]
pub struct RowWriter {
    fields: Vec<String>,
}

impl RowWriter {
    /// Start a row with the record key in column 0.
    pub fn new(key: &str) -> Self {
        Self {
            fields: vec![key.to_string()],
        }
    }

    /// Append a numeric column.
    pub fn push(&mut self, value: impl Display) {
        self.fields.push(value.to_string());
    }

    /// Append a free-text column with newlines escaped.
    pub fn push_string(&mut self, value: &str) {
        self.fields.push(escape_newlines(value));
    }

    /// Append a hex column.
    pub fn push_hex(&mut self, bytes: &[u8]) {
        self.fields.push(hex::bytes_to_hex(bytes));
    }

    /// The columns written so far, key included.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}
