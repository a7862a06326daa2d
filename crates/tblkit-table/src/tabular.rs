//! CSV form of a table.
//!
//! Records are written one per row, key first, grouped under a header row
//! for their layout:
//!
//! ```text
//! Type,ID,Desc,Unknown
//! ItemHelpData,1,Tear Balm,00 00 00 00 00 00 00 00 00
//! Type,Data
//! status,01 00 FF
//! ```
//!
//! When reading, the first row is always taken as the header. Later rows
//! keyed `Type` are group headers and rows starting with `#` are comments.
//! A row that cannot be decoded, or whose quoting is broken, is logged and
//! skipped.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};

use crate::file::TblFile;
use crate::records::{Record, RecordKind, HEADER_KEY};
use crate::text::{FieldCursor, RowWriter};
use crate::{Error, Result};

/// On-disk form of a table, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Binary `.tbl` container.
    Tbl,
    /// Comma-separated text.
    Csv,
}

impl TableFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or_default();

        match ext.to_ascii_lowercase().as_str() {
            "tbl" => Ok(Self::Tbl),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::UnrecognizedExtension(ext.to_string())),
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Tbl => "tbl",
            Self::Csv => "csv",
        }
    }

    /// The format this one converts into.
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Tbl => Self::Csv,
            Self::Csv => Self::Tbl,
        }
    }

    /// Output path for converting `input` into `output_dir`.
    pub fn output_path(self, input: &Path, output_dir: &Path) -> PathBuf {
        let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
        name.push(".");
        name.push(self.counterpart().extension());
        output_dir.join(name)
    }
}

fn decode_row(row: &StringRecord) -> Result<(&str, Record)> {
    let key = row.get(0).unwrap_or_default();
    let mut cursor = FieldCursor::new(row, key);
    let record = RecordKind::from_key(key).from_fields(&mut cursor)?;
    Ok((key, record))
}

/// Check one physical line for quoting errors.
///
/// Quotes may only open a field, close it, or appear doubled inside it.
fn check_quoting(line: &[u8]) -> std::result::Result<(), &'static str> {
    #[derive(Clone, Copy)]
    enum State {
        FieldStart,
        Unquoted,
        Quoted,
        QuoteInQuoted,
    }

    let mut state = State::FieldStart;
    for &byte in line {
        state = match (state, byte) {
            (State::FieldStart, b'"') => State::Quoted,
            (State::FieldStart, b',') => State::FieldStart,
            (State::FieldStart, _) => State::Unquoted,
            (State::Unquoted, b',') => State::FieldStart,
            (State::Unquoted, b'"') => return Err("quote inside an unquoted field"),
            (State::Unquoted, _) => State::Unquoted,
            (State::Quoted, b'"') => State::QuoteInQuoted,
            (State::Quoted, _) => State::Quoted,
            (State::QuoteInQuoted, b'"') => State::Quoted,
            (State::QuoteInQuoted, b',') => State::FieldStart,
            (State::QuoteInQuoted, _) => return Err("text after a closing quote"),
        };
    }

    match state {
        State::Quoted => Err("unterminated quoted field"),
        _ => Ok(()),
    }
}

impl TblFile {
    /// Read a table from CSV text.
    ///
    /// Every row is one physical line, since newlines inside fields are
    /// escaped. Each line is checked and parsed on its own, so a broken row
    /// never takes its neighbours with it.
    pub fn from_csv_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let mut builder = ReaderBuilder::new();
        builder.has_headers(false).flexible(true);

        let mut file = Self::new();
        let mut row = StringRecord::new();
        let mut header_seen = false;

        for (index, line) in data.split(|&b| b == b'\n').enumerate() {
            let line_no = index + 1;
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            if line.iter().all(u8::is_ascii_whitespace) || line.starts_with(b"#") {
                continue;
            }
            if !header_seen {
                header_seen = true;
                continue;
            }

            if let Err(reason) = check_quoting(line) {
                tracing::warn!(line = line_no, reason, "skipping row with malformed quoting");
                continue;
            }

            match builder.from_reader(line).read_record(&mut row) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(line = line_no, error = %e, "skipping unreadable row");
                    continue;
                }
            }

            if row.get(0) == Some(HEADER_KEY) {
                continue;
            }

            match decode_row(&row) {
                Ok((key, record)) => file.push(key, record),
                Err(e) => tracing::warn!(line = line_no, error = %e, "skipping row"),
            }
        }

        Ok(file)
    }

    /// Read a `.csv` file from disk.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_csv_reader(data.as_slice())
    }

    /// Write the table as CSV text.
    ///
    /// Keys without records produce no rows.
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(writer);

        let mut group = None;
        for entry in self.directory() {
            let Some(records) = self.records(entry.key).filter(|r| !r.is_empty()) else {
                continue;
            };

            if group != Some(entry.kind) {
                writer.write_record(entry.kind.csv_header())?;
                group = Some(entry.kind);
            }

            for record in records {
                let mut row = RowWriter::new(entry.key);
                record.write_fields(&mut row);
                writer.write_record(row.fields())?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut out = Vec::new();
        self.to_csv_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| tblkit_common::Error::from(e.utf8_error()).into())
    }

    /// Write the table to a `.csv` file.
    pub fn write_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_csv_writer(BufWriter::new(file))
    }
}
