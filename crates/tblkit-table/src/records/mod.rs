//! Table records and key dispatch.
//!
//! Every record in a table is stored under a short string key. The key
//! selects the record layout through [`RecordKind::from_key`]:
//!
//! | Key | Kind |
//! |---|---|
//! | `item`, `item_q` | [`Item`] |
//! | `magic` | [`Magic`] |
//! | `ItemHelpData`, `CompHelpData` | [`HelpData`] |
//! | anything else | [`Opaque`] |
//!
//! Typed records frame themselves as `i16 length | payload`, where the
//! length counts the payload only (total framed size minus two).

mod help;
mod item;
mod magic;
mod opaque;

use std::io::Write;

use tblkit_common::{BinaryReader, BinaryWriterExt};

use crate::text::{FieldCursor, RowWriter};
use crate::{Error, Result};

pub use help::{HelpData, HELP_TAIL_LEN};
pub use item::{
    Item, QuartzExtension, DEFAULT_RANK_PADDING, ITEM_COLUMNS, QUARTZ_EXTENSION_LEN, STAT_COUNT,
};
pub use magic::Magic;
pub use opaque::Opaque;

/// Column 0 of every header row.
pub const HEADER_KEY: &str = "Type";

#[rustfmt::skip]
const ITEM_HEADER: &[&str] = &[
    HEADER_KEY, "ID", "Name", "Desc", "Category", "Price", "MaxQty",
    "Effect1", "E1 Param1", "E1 Param2", "E1 Param3",
    "Effect2", "E2 Param1", "E2 Param2", "E2 Param3",
    "Effect3", "E3 Param1", "E3 Param2", "E3 Param3",
    "Effect4", "E4 Param1", "E4 Param2", "E4 Param3",
    "Effect5", "E5 Param1", "E5 Param2", "E5 Param3",
    "STR", "DEF", "ATS", "ADF", "ACC", "EVA", "SPD", "MOV", "HP", "EP",
    "Rank", "Element", "WeaponSwitch", "WeaponSlash", "WeaponPierce",
    "WeaponThrust", "WeaponStrike", "T.Type", "T.Range", "T.Size",
    "Char", "Flags", "Unknown", "Unknown12", "Unknown8",
    "Quartz1", "Quartz2", "Quartz3", "Quartz4", "Quartz5", "Quartz6",
];

#[rustfmt::skip]
const MAGIC_HEADER: &[&str] = &[
    HEADER_KEY, "ID", "Char", "Flags", "Category", "Kind", "Element",
    "WeaponSwitch", "T.Type", "T.Range", "T.Size",
    "Unknown1", "Unknown2", "UnknownF1", "UnknownF2",
    "Effect1", "E1 Param1", "E1 Param2", "E1 Param3",
    "Effect2", "E2 Param1", "E2 Param2", "E2 Param3",
    "Effect3", "E3 Param1", "E3 Param2", "E3 Param3",
    "Effect4", "E4 Param1", "E4 Param2", "E4 Param3",
    "Effect5", "E5 Param1", "E5 Param2", "E5 Param3",
    "Cast", "Delay", "Cost", "Unbalance", "Break", "Level", "Order",
    "Unknown3", "Animation", "Name", "Desc",
];

const HELP_HEADER: &[&str] = &[HEADER_KEY, "ID", "Desc", "Unknown"];

const OPAQUE_HEADER: &[&str] = &[HEADER_KEY, "Data"];

/// Record layout selected by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordKind {
    Item,
    Magic,
    HelpData,
    Opaque,
}

impl RecordKind {
    /// Resolve the layout for a key. Unknown keys fall back to [`RecordKind::Opaque`].
    pub fn from_key(key: &str) -> Self {
        match key {
            "item" | "item_q" => Self::Item,
            "magic" => Self::Magic,
            "ItemHelpData" | "CompHelpData" => Self::HelpData,
            _ => Self::Opaque,
        }
    }

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Magic => "magic",
            Self::HelpData => "help",
            Self::Opaque => "opaque",
        }
    }

    /// Column names of this kind's CSV header row.
    pub const fn csv_header(self) -> &'static [&'static str] {
        match self {
            Self::Item => ITEM_HEADER,
            Self::Magic => MAGIC_HEADER,
            Self::HelpData => HELP_HEADER,
            Self::Opaque => OPAQUE_HEADER,
        }
    }

    /// Decode a record body that was stored under `key`.
    ///
    /// Typed layouts must consume the whole body.
    pub fn decode(self, key: &str, body: &[u8]) -> Result<Record> {
        let mut reader = BinaryReader::new(body);
        let record = match self {
            Self::Item => Record::Item(Item::read(&mut reader)?),
            Self::Magic => Record::Magic(Magic::read(&mut reader)?),
            Self::HelpData => Record::HelpData(HelpData::read(&mut reader)?),
            Self::Opaque => return Ok(Record::Opaque(Opaque::new(body.to_vec()))),
        };

        if reader.has_remaining_bytes() {
            return Err(Error::TrailingBytes {
                key: key.to_string(),
                remaining: reader.remaining(),
            });
        }
        Ok(record)
    }

    /// Decode a record from the data columns of a CSV row.
    pub fn from_fields(self, cursor: &mut FieldCursor<'_>) -> Result<Record> {
        Ok(match self {
            Self::Item => Record::Item(Item::from_fields(cursor)?),
            Self::Magic => Record::Magic(Magic::from_fields(cursor)?),
            Self::HelpData => Record::HelpData(HelpData::from_fields(cursor)?),
            Self::Opaque => Record::Opaque(Opaque::from_fields(cursor)?),
        })
    }
}

/// One table record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Record {
    Item(Item),
    Magic(Magic),
    HelpData(HelpData),
    Opaque(Opaque),
}

impl Record {
    /// The layout of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Item(_) => RecordKind::Item,
            Record::Magic(_) => RecordKind::Magic,
            Record::HelpData(_) => RecordKind::HelpData,
            Record::Opaque(_) => RecordKind::Opaque,
        }
    }

    /// The record id, if it has one.
    pub fn id(&self) -> Option<i16> {
        match self {
            Record::Item(item) => Some(item.id),
            Record::Magic(magic) => Some(magic.id),
            Record::HelpData(help) => Some(help.id),
            Record::Opaque(opaque) => opaque.id(),
        }
    }

    /// Write the length-prefixed body.
    pub fn write_framed<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Record::Item(item) => writer.write_all(&item.to_bytes()?)?,
            Record::Magic(magic) => writer.write_all(&magic.to_bytes()?)?,
            Record::HelpData(help) => writer.write_all(&help.to_bytes()?)?,
            Record::Opaque(opaque) => {
                writer.write_i16_le(length_prefix(opaque.data().len())?)?;
                writer.write_all(opaque.data())?;
            }
        }
        Ok(())
    }

    /// Append this record's data columns.
    pub fn write_fields(&self, row: &mut RowWriter) {
        match self {
            Record::Item(item) => item.write_fields(row),
            Record::Magic(magic) => magic.write_fields(row),
            Record::HelpData(help) => help.write_fields(row),
            Record::Opaque(opaque) => opaque.write_fields(row),
        }
    }
}

fn length_prefix(size: usize) -> Result<i16> {
    i16::try_from(size).map_err(|_| Error::RecordTooLarge { size })
}

/// Prepend the 16-bit length to an encoded payload.
pub(crate) fn frame(payload: Vec<u8>) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(payload.len() + 2);
    bytes.write_i16_le(length_prefix(payload.len())?)?;
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_registry() {
        assert_eq!(RecordKind::from_key("item"), RecordKind::Item);
        assert_eq!(RecordKind::from_key("item_q"), RecordKind::Item);
        assert_eq!(RecordKind::from_key("magic"), RecordKind::Magic);
        assert_eq!(RecordKind::from_key("ItemHelpData"), RecordKind::HelpData);
        assert_eq!(RecordKind::from_key("CompHelpData"), RecordKind::HelpData);
        assert_eq!(RecordKind::from_key("status"), RecordKind::Opaque);
        assert_eq!(RecordKind::from_key("Item"), RecordKind::Opaque);
        assert_eq!(RecordKind::from_key(""), RecordKind::Opaque);
    }

    #[test]
    fn test_header_widths() {
        assert_eq!(RecordKind::Item.csv_header().len(), ITEM_COLUMNS + QUARTZ_EXTENSION_LEN);
        assert_eq!(RecordKind::Magic.csv_header().len(), 46);
        assert_eq!(RecordKind::HelpData.csv_header().len(), 4);
        assert_eq!(RecordKind::Opaque.csv_header().len(), 2);
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let help = HelpData {
            id: 1,
            description: "x".to_string(),
            unknown_tail: [0; HELP_TAIL_LEN],
        };
        let mut body = help.to_bytes().unwrap()[2..].to_vec();
        body.push(0xAA);

        assert!(matches!(
            RecordKind::HelpData.decode("ItemHelpData", &body),
            Err(Error::TrailingBytes { remaining: 1, .. })
        ));
    }

    #[test]
    fn test_opaque_framing() {
        let mut out = Vec::new();
        Record::Opaque(Opaque::new(vec![1, 2, 3])).write_framed(&mut out).unwrap();
        assert_eq!(out, [3, 0, 1, 2, 3]);

        let mut out = Vec::new();
        Record::Opaque(Opaque::default()).write_framed(&mut out).unwrap();
        assert_eq!(out, [0, 0]);
    }

    #[test]
    fn test_record_too_large() {
        let record = Record::Opaque(Opaque::new(vec![0; i16::MAX as usize + 1]));
        let mut out = Vec::new();

        assert!(matches!(
            record.write_framed(&mut out),
            Err(Error::RecordTooLarge { size: 32768 })
        ));
    }

    #[test]
    fn test_record_ids() {
        assert_eq!(Record::Magic(Magic { id: 9, ..Magic::default() }).id(), Some(9));
        assert_eq!(Record::Opaque(Opaque::default()).id(), None);
        assert_eq!(Record::Item(Item::default()).kind(), RecordKind::Item);
    }
}
