//! Effect values embedded in item and magic records.

use std::io::Write;

use tblkit_common::{BinaryReader, BinaryWriterExt};

use crate::text::{FieldCursor, RowWriter};
use crate::Result;

/// Number of effect slots carried by every item and magic record.
pub const EFFECT_SLOTS: usize = 5;

/// Number of numeric parameters per effect.
pub const EFFECT_PARAMS: usize = 3;

/// Encoded size of one effect in bytes.
pub const EFFECT_SIZE: usize = 2 + 4 * EFFECT_PARAMS;

/// An effect identifier with its parameters.
///
/// Unused slots are all zero and are kept, not dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectValue {
    pub id: i16,
    pub params: [i32; EFFECT_PARAMS],
}

impl EffectValue {
    /// Create a new effect.
    pub const fn new(id: i16, params: [i32; EFFECT_PARAMS]) -> Self {
        Self { id, params }
    }

    /// Check whether this slot is empty.
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.params.iter().all(|&p| p == 0)
    }

    /// Read an effect from binary data.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let id = reader.read_i16()?;
        let mut params = [0i32; EFFECT_PARAMS];
        for param in &mut params {
            *param = reader.read_i32()?;
        }
        Ok(Self { id, params })
    }

    /// Write the effect in binary form.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i16_le(self.id)?;
        for param in self.params {
            writer.write_i32_le(param)?;
        }
        Ok(())
    }

    /// Read an effect from four CSV columns.
    pub fn from_fields(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        let id = cursor.next_value()?;
        let mut params = [0i32; EFFECT_PARAMS];
        for param in &mut params {
            *param = cursor.next_value()?;
        }
        Ok(Self { id, params })
    }

    /// Append the effect as four CSV columns.
    pub fn write_fields(&self, row: &mut RowWriter) {
        row.push(self.id);
        for param in self.params {
            row.push(param);
        }
    }
}

/// Read the fixed run of effect slots.
pub fn read_effects(reader: &mut BinaryReader<'_>) -> Result<[EffectValue; EFFECT_SLOTS]> {
    let mut effects = [EffectValue::default(); EFFECT_SLOTS];
    for slot in &mut effects {
        *slot = EffectValue::read(reader)?;
    }
    Ok(effects)
}

/// Read the fixed run of effect slots from CSV columns.
pub fn effects_from_fields(cursor: &mut FieldCursor<'_>) -> Result<[EffectValue; EFFECT_SLOTS]> {
    let mut effects = [EffectValue::default(); EFFECT_SLOTS];
    for slot in &mut effects {
        *slot = EffectValue::from_fields(cursor)?;
    }
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;

    #[test]
    fn test_effect_binary_layout() {
        let effect = EffectValue::new(-3, [1, -1, 0x01020304]);
        let mut bytes = Vec::new();
        effect.write(&mut bytes).unwrap();

        assert_eq!(bytes.len(), EFFECT_SIZE);
        assert_eq!(
            bytes,
            [0xFD, 0xFF, 1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 4, 3, 2, 1]
        );

        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(EffectValue::read(&mut reader).unwrap(), effect);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_zero_slots_are_written() {
        let effects = [EffectValue::default(); EFFECT_SLOTS];
        let mut row = RowWriter::new("item");
        for effect in &effects {
            effect.write_fields(&mut row);
        }

        assert_eq!(row.fields().len(), 1 + EFFECT_SLOTS * 4);
        assert!(row.fields()[1..].iter().all(|f| f == "0"));
        assert!(effects.iter().all(EffectValue::is_empty));
    }

    #[test]
    fn test_effect_text() {
        let record = StringRecord::from(vec!["magic", "10", "-20", "30", "2147483647"]);
        let mut cursor = FieldCursor::new(&record, "magic");
        let effect = EffectValue::from_fields(&mut cursor).unwrap();

        assert_eq!(effect, EffectValue::new(10, [-20, 30, i32::MAX]));

        let mut row = RowWriter::new("magic");
        effect.write_fields(&mut row);
        assert_eq!(row.fields(), record.iter().collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_effect_text_rejects_garbage() {
        let record = StringRecord::from(vec!["item", "1", "2", "three", "4"]);
        let mut cursor = FieldCursor::new(&record, "item");

        assert!(EffectValue::from_fields(&mut cursor).is_err());
    }
}
