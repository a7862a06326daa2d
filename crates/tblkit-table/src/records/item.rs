//! Item records (`item`, `item_q`).
//!
//! Plain items and quartz items share one layout. Quartz items carry six
//! extra shorts after the trailing 8-byte block, and the block itself tells
//! whether they are present: any non-zero byte means the extension follows.
//! The wire key is not consulted.
//!
//! In CSV an item takes [`ITEM_COLUMNS`] columns, followed by the six quartz
//! columns when present. A non-default rank padding goes last.

use std::io::Write;

use tblkit_common::{BinaryReader, BinaryWriterExt};

use super::frame;
use crate::effect::{effects_from_fields, read_effects, EffectValue, EFFECT_SLOTS};
use crate::text::{FieldCursor, RowWriter};
use crate::Result;

/// Number of stat shorts on an item.
pub const STAT_COUNT: usize = 10;

/// Number of CSV columns of an item without quartz data, key included.
pub const ITEM_COLUMNS: usize = 52;

/// Value of the short after the rank in every shipped table.
pub const DEFAULT_RANK_PADDING: i16 = -1;

/// Number of shorts in the quartz extension.
pub const QUARTZ_EXTENSION_LEN: usize = 6;

/// Extra shorts stored after a quartz item.
///
/// The game usually fills the last three with `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuartzExtension(pub [i16; QUARTZ_EXTENSION_LEN]);

impl QuartzExtension {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mut values = [0i16; QUARTZ_EXTENSION_LEN];
        for value in &mut values {
            *value = reader.read_i16()?;
        }
        Ok(Self(values))
    }

    fn from_fields(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        let mut values = [0i16; QUARTZ_EXTENSION_LEN];
        for value in &mut values {
            *value = cursor.next_value()?;
        }
        Ok(Self(values))
    }
}

/// An item or quartz item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: i16,
    /// Character restriction.
    pub restriction: i16,
    pub flags: String,
    pub category: i16,
    pub unknown_short: i16,
    pub element: u8,
    pub weapon_switch: u8,
    pub weapon_slash: u8,
    pub weapon_pierce: u8,
    pub weapon_thrust: u8,
    pub weapon_strike: u8,
    pub target_type: u8,
    pub target_range: f32,
    pub target_size: u8,
    pub unknown_block: [u8; 12],
    pub effects: [EffectValue; EFFECT_SLOTS],
    pub stats: [i16; STAT_COUNT],
    pub price: i32,
    pub stack_max: u8,
    pub rank: i16,
    /// Short following the rank. Only written to CSV when it differs from
    /// [`DEFAULT_RANK_PADDING`], as the last column.
    pub rank_padding: i16,
    pub name: String,
    pub description: String,
    /// Non-zero for quartz items.
    pub trailing_block: [u8; 8],
    pub quartz: Option<QuartzExtension>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: 0,
            restriction: 0,
            flags: String::new(),
            category: 0,
            unknown_short: 0,
            element: 0,
            weapon_switch: 0,
            weapon_slash: 0,
            weapon_pierce: 0,
            weapon_thrust: 0,
            weapon_strike: 0,
            target_type: 0,
            target_range: 0.0,
            target_size: 0,
            unknown_block: [0; 12],
            effects: [EffectValue::default(); EFFECT_SLOTS],
            stats: [0; STAT_COUNT],
            price: 0,
            stack_max: 0,
            rank: 0,
            rank_padding: DEFAULT_RANK_PADDING,
            name: String::new(),
            description: String::new(),
            trailing_block: [0; 8],
            quartz: None,
        }
    }
}

impl Item {
    /// Whether the trailing block announces a quartz extension.
    pub fn has_quartz_extension(&self) -> bool {
        self.trailing_block.iter().any(|&b| b != 0)
    }

    /// The extension as it will be encoded.
    ///
    /// `None` whenever the trailing block is all zero, even if `quartz` is
    /// set; zero-filled when the block is non-zero but `quartz` is unset.
    pub fn quartz_extension(&self) -> Option<QuartzExtension> {
        if self.has_quartz_extension() {
            Some(self.quartz.unwrap_or_default())
        } else {
            None
        }
    }

    /// Read an item from its record body.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let id = reader.read_i16()?;
        let restriction = reader.read_i16()?;
        let flags = reader.read_cstring()?.to_string();
        let category = reader.read_i16()?;
        let unknown_short = reader.read_i16()?;
        let element = reader.read_u8()?;
        let weapon_switch = reader.read_u8()?;
        let weapon_slash = reader.read_u8()?;
        let weapon_pierce = reader.read_u8()?;
        let weapon_thrust = reader.read_u8()?;
        let weapon_strike = reader.read_u8()?;
        let target_type = reader.read_u8()?;
        let target_range = reader.read_f32()?;
        let target_size = reader.read_u8()?;
        let unknown_block = reader.read_array()?;
        let effects = read_effects(reader)?;

        let mut stats = [0i16; STAT_COUNT];
        for stat in &mut stats {
            *stat = reader.read_i16()?;
        }

        let price = reader.read_i32()?;
        let stack_max = reader.read_u8()?;
        let rank = reader.read_i16()?;
        let rank_padding = reader.read_i16()?;
        let name = reader.read_cstring()?.to_string();
        let description = reader.read_cstring()?.to_string();
        let trailing_block: [u8; 8] = reader.read_array()?;

        let quartz = if trailing_block.iter().any(|&b| b != 0) {
            Some(QuartzExtension::read(reader)?)
        } else {
            None
        };

        Ok(Self {
            id,
            restriction,
            flags,
            category,
            unknown_short,
            element,
            weapon_switch,
            weapon_slash,
            weapon_pierce,
            weapon_thrust,
            weapon_strike,
            target_type,
            target_range,
            target_size,
            unknown_block,
            effects,
            stats,
            price,
            stack_max,
            rank,
            rank_padding,
            name,
            description,
            trailing_block,
            quartz,
        })
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i16_le(self.id)?;
        writer.write_i16_le(self.restriction)?;
        writer.write_cstring(&self.flags)?;
        writer.write_i16_le(self.category)?;
        writer.write_i16_le(self.unknown_short)?;
        writer.write_u8_le(self.element)?;
        writer.write_u8_le(self.weapon_switch)?;
        writer.write_u8_le(self.weapon_slash)?;
        writer.write_u8_le(self.weapon_pierce)?;
        writer.write_u8_le(self.weapon_thrust)?;
        writer.write_u8_le(self.weapon_strike)?;
        writer.write_u8_le(self.target_type)?;
        writer.write_f32_le(self.target_range)?;
        writer.write_u8_le(self.target_size)?;
        writer.write_all(&self.unknown_block)?;

        for effect in &self.effects {
            effect.write(writer)?;
        }
        for stat in self.stats {
            writer.write_i16_le(stat)?;
        }

        writer.write_i32_le(self.price)?;
        writer.write_u8_le(self.stack_max)?;
        writer.write_i16_le(self.rank)?;
        writer.write_i16_le(self.rank_padding)?;
        writer.write_cstring(&self.name)?;
        writer.write_cstring(&self.description)?;
        writer.write_all(&self.trailing_block)?;

        if let Some(QuartzExtension(values)) = self.quartz_extension() {
            for value in values {
                writer.write_i16_le(value)?;
            }
        }
        Ok(())
    }

    /// Encode the item with its 16-bit length prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(192);
        self.write_payload(&mut payload)?;
        frame(payload)
    }

    /// Read an item from its CSV columns.
    pub fn from_fields(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        let id = cursor.next_value()?;
        let name = cursor.next_string()?;
        let description = cursor.next_string()?;
        let category = cursor.next_value()?;
        let price = cursor.next_value()?;
        let stack_max = cursor.next_value()?;
        let effects = effects_from_fields(cursor)?;

        let mut stats = [0i16; STAT_COUNT];
        for stat in &mut stats {
            *stat = cursor.next_value()?;
        }

        let rank = cursor.next_value()?;
        let element = cursor.next_value()?;
        let weapon_switch = cursor.next_value()?;
        let weapon_slash = cursor.next_value()?;
        let weapon_pierce = cursor.next_value()?;
        let weapon_thrust = cursor.next_value()?;
        let weapon_strike = cursor.next_value()?;
        let target_type = cursor.next_value()?;
        let target_range = cursor.next_value()?;
        let target_size = cursor.next_value()?;
        let restriction = cursor.next_value()?;
        let flags = cursor.next_string()?;
        let unknown_short = cursor.next_value()?;
        let unknown_block = cursor.next_hex_array()?;
        let trailing_block: [u8; 8] = cursor.next_hex_array()?;

        let quartz = if trailing_block.iter().any(|&b| b != 0) {
            Some(QuartzExtension::from_fields(cursor)?)
        } else {
            None
        };

        let rank_padding = cursor
            .next_optional_value()?
            .unwrap_or(DEFAULT_RANK_PADDING);

        Ok(Self {
            id,
            restriction,
            flags,
            category,
            unknown_short,
            element,
            weapon_switch,
            weapon_slash,
            weapon_pierce,
            weapon_thrust,
            weapon_strike,
            target_type,
            target_range,
            target_size,
            unknown_block,
            effects,
            stats,
            price,
            stack_max,
            rank,
            rank_padding,
            name,
            description,
            trailing_block,
            quartz,
        })
    }

    /// Append the item's CSV columns.
    pub fn write_fields(&self, row: &mut RowWriter) {
        row.push(self.id);
        row.push_string(&self.name);
        row.push_string(&self.description);
        row.push(self.category);
        row.push(self.price);
        row.push(self.stack_max);

        for effect in &self.effects {
            effect.write_fields(row);
        }
        for stat in self.stats {
            row.push(stat);
        }

        row.push(self.rank);
        row.push(self.element);
        row.push(self.weapon_switch);
        row.push(self.weapon_slash);
        row.push(self.weapon_pierce);
        row.push(self.weapon_thrust);
        row.push(self.weapon_strike);
        row.push(self.target_type);
        row.push(self.target_range);
        row.push(self.target_size);
        row.push(self.restriction);
        row.push_string(&self.flags);
        row.push(self.unknown_short);
        row.push_hex(&self.unknown_block);
        row.push_hex(&self.trailing_block);

        if let Some(QuartzExtension(values)) = self.quartz_extension() {
            for value in values {
                row.push(value);
            }
        }

        if self.rank_padding != DEFAULT_RANK_PADDING {
            row.push(self.rank_padding);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;

    fn sample() -> Item {
        Item {
            id: 1,
            restriction: -1,
            flags: "Z".to_string(),
            category: 2,
            target_range: 2.5,
            effects: [
                EffectValue::new(1, [50, 0, 0]),
                EffectValue::default(),
                EffectValue::default(),
                EffectValue::default(),
                EffectValue::default(),
            ],
            stats: [10, 5, 0, 0, 0, 0, 0, 0, 0, 0],
            price: 100,
            stack_max: 99,
            rank: 1,
            name: "Tear Balm".to_string(),
            description: "Restores 1000 HP.\nSingle target.".to_string(),
            ..Item::default()
        }
    }

    fn row_of(item: &Item, key: &str) -> StringRecord {
        let mut row = RowWriter::new(key);
        item.write_fields(&mut row);
        StringRecord::from(row.fields().to_vec())
    }

    #[test]
    fn test_plain_item_has_no_extension() {
        let item = sample();
        let bytes = item.to_bytes().unwrap();
        let payload = &bytes[2..];

        // Payload ends with the all-zero trailing block.
        assert_eq!(&payload[payload.len() - 8..], &[0u8; 8]);

        let mut reader = BinaryReader::new(payload);
        let decoded = Item::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(decoded, item);
        assert!(decoded.quartz.is_none());
    }

    #[test]
    fn test_quartz_item_writes_extension() {
        let mut item = sample();
        item.trailing_block = [1, 0, 0, 0, 0, 0, 0, 0];
        item.quartz = Some(QuartzExtension([7, 8, 9, -1, -1, -1]));

        let plain_len = sample().to_bytes().unwrap().len();
        let bytes = item.to_bytes().unwrap();
        assert_eq!(bytes.len(), plain_len + 2 * QUARTZ_EXTENSION_LEN);
        assert_eq!(&bytes[bytes.len() - 4..], &[0xFF, 0xFF, 0xFF, 0xFF]);

        let mut reader = BinaryReader::new(&bytes[2..]);
        let decoded = Item::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_extension_dropped_when_block_is_zero() {
        let mut item = sample();
        item.quartz = Some(QuartzExtension([1; QUARTZ_EXTENSION_LEN]));

        assert_eq!(item.quartz_extension(), None);
        assert_eq!(item.to_bytes().unwrap(), sample().to_bytes().unwrap());
    }

    #[test]
    fn test_length_prefix() {
        let bytes = sample().to_bytes().unwrap();
        let prefix = i16::from_le_bytes([bytes[0], bytes[1]]);

        assert_eq!(prefix as usize, bytes.len() - 2);
        assert!((150..=250).contains(&bytes.len()));
    }

    #[test]
    fn test_text_columns() {
        let row = row_of(&sample(), "item");

        assert_eq!(row.len(), ITEM_COLUMNS);
        assert_eq!(&row[0], "item");
        assert_eq!(&row[2], "Tear Balm");
        assert_eq!(&row[3], "Restores 1000 HP.\\nSingle target.");
        assert_eq!(&row[45], "2.5");
        assert_eq!(&row[47], "-1");
        assert_eq!(&row[48], "Z");
        assert_eq!(&row[50], "00 00 00 00 00 00 00 00 00 00 00 00");
        assert_eq!(&row[51], "00 00 00 00 00 00 00 00");
    }

    #[test]
    fn test_text_round_trip_with_quartz() {
        let mut item = sample();
        item.trailing_block = [1, 0, 0, 0, 0, 0, 0, 0];
        item.quartz = Some(QuartzExtension([3, 0, 12, -1, -1, -1]));

        let row = row_of(&item, "item_q");
        assert_eq!(row.len(), ITEM_COLUMNS + QUARTZ_EXTENSION_LEN);
        assert_eq!(&row[52], "3");

        let mut cursor = FieldCursor::new(&row, "item_q");
        assert_eq!(Item::from_fields(&mut cursor).unwrap(), item);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_text_missing_quartz_columns() {
        let mut item = sample();
        item.trailing_block = [0, 0, 0, 0, 0, 0, 0, 2];
        let row = row_of(&item, "item_q");
        let truncated = StringRecord::from(row.iter().take(ITEM_COLUMNS).collect::<Vec<_>>());

        let mut cursor = FieldCursor::new(&truncated, "item_q");
        assert!(matches!(
            Item::from_fields(&mut cursor),
            Err(crate::Error::RecordDecode { column: 52, .. })
        ));
    }

    #[test]
    fn test_legacy_layout_row() {
        let mut fields = vec!["item", "5", "Tear Balm", "Restores HP.", "1", "100", "99"];
        fields.extend(["0"; 20]); // effects
        fields.extend(["0"; 10]); // stats
        fields.extend(["1", "0", "0", "0", "0", "0", "0", "1", "1.5", "0", "-1", "Z", "7"]);
        fields.push("00 00 00 00 00 00 00 00 00 00 00 00");
        fields.push("00 00 00 00 00 00 00 00");
        assert_eq!(fields.len(), ITEM_COLUMNS);

        let record = StringRecord::from(fields);
        let mut cursor = FieldCursor::new(&record, "item");
        let item = Item::from_fields(&mut cursor).unwrap();

        assert_eq!(item.id, 5);
        assert_eq!(item.rank, 1);
        assert_eq!(item.restriction, -1);
        assert_eq!(item.flags, "Z");
        assert_eq!(item.unknown_short, 7);
        assert_eq!(item.rank_padding, DEFAULT_RANK_PADDING);
        assert_eq!(item.quartz, None);
    }

    #[test]
    fn test_rank_padding_column() {
        let mut item = sample();
        item.rank_padding = 4;
        let row = row_of(&item, "item");
        assert_eq!(row.len(), ITEM_COLUMNS + 1);
        assert_eq!(&row[ITEM_COLUMNS], "4");
        let mut cursor = FieldCursor::new(&row, "item");
        assert_eq!(Item::from_fields(&mut cursor).unwrap(), item);

        item.trailing_block = [0, 0, 0, 0, 0, 0, 0, 9];
        item.quartz = Some(QuartzExtension([1, 2, 3, 4, 5, 6]));
        let row = row_of(&item, "item_q");
        assert_eq!(row.len(), ITEM_COLUMNS + QUARTZ_EXTENSION_LEN + 1);
        let mut cursor = FieldCursor::new(&row, "item_q");
        assert_eq!(Item::from_fields(&mut cursor).unwrap(), item);
    }

    #[test]
    fn test_truncated_quartz_body() {
        let mut item = sample();
        item.trailing_block = [1, 0, 0, 0, 0, 0, 0, 0];
        let bytes = item.to_bytes().unwrap();
        let cut = &bytes[2..bytes.len() - 4];

        let mut reader = BinaryReader::new(cut);
        assert!(Item::read(&mut reader).is_err());
    }
}
