//! Magic (arts and crafts) records.

use std::io::Write;

use tblkit_common::{BinaryReader, BinaryWriterExt};

use super::frame;
use crate::effect::{effects_from_fields, read_effects, EffectValue, EFFECT_SLOTS};
use crate::text::{FieldCursor, RowWriter};
use crate::Result;

/// A spell or craft definition.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Magic {
    pub id: i16,
    /// Character restriction.
    pub restriction: i16,
    pub flags: String,
    pub category: u8,
    pub kind: u8,
    pub element: u8,
    pub switchable: u8,
    pub target_type: u8,
    pub target_range: f32,
    pub target_size: u8,
    pub unknown_short1: i16,
    pub unknown_short2: i16,
    pub unknown_float1: f32,
    pub unknown_float2: f32,
    pub effects: [EffectValue; EFFECT_SLOTS],
    pub cast_time: u8,
    pub delay: u8,
    pub cost: i16,
    pub unbalance: u8,
    pub break_value: i16,
    pub level: u8,
    pub order: u8,
    pub unknown_byte: u8,
    pub animation: String,
    pub name: String,
    pub description: String,
}

impl Magic {
    /// Read a magic record from its body.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            id: reader.read_i16()?,
            restriction: reader.read_i16()?,
            flags: reader.read_cstring()?.to_string(),
            category: reader.read_u8()?,
            kind: reader.read_u8()?,
            element: reader.read_u8()?,
            switchable: reader.read_u8()?,
            target_type: reader.read_u8()?,
            target_range: reader.read_f32()?,
            target_size: reader.read_u8()?,
            unknown_short1: reader.read_i16()?,
            unknown_short2: reader.read_i16()?,
            unknown_float1: reader.read_f32()?,
            unknown_float2: reader.read_f32()?,
            effects: read_effects(reader)?,
            cast_time: reader.read_u8()?,
            delay: reader.read_u8()?,
            cost: reader.read_i16()?,
            unbalance: reader.read_u8()?,
            break_value: reader.read_i16()?,
            level: reader.read_u8()?,
            order: reader.read_u8()?,
            unknown_byte: reader.read_u8()?,
            animation: reader.read_cstring()?.to_string(),
            name: reader.read_cstring()?.to_string(),
            description: reader.read_cstring()?.to_string(),
        })
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i16_le(self.id)?;
        writer.write_i16_le(self.restriction)?;
        writer.write_cstring(&self.flags)?;
        writer.write_u8_le(self.category)?;
        writer.write_u8_le(self.kind)?;
        writer.write_u8_le(self.element)?;
        writer.write_u8_le(self.switchable)?;
        writer.write_u8_le(self.target_type)?;
        writer.write_f32_le(self.target_range)?;
        writer.write_u8_le(self.target_size)?;
        writer.write_i16_le(self.unknown_short1)?;
        writer.write_i16_le(self.unknown_short2)?;
        writer.write_f32_le(self.unknown_float1)?;
        writer.write_f32_le(self.unknown_float2)?;

        for effect in &self.effects {
            effect.write(writer)?;
        }

        writer.write_u8_le(self.cast_time)?;
        writer.write_u8_le(self.delay)?;
        writer.write_i16_le(self.cost)?;
        writer.write_u8_le(self.unbalance)?;
        writer.write_i16_le(self.break_value)?;
        writer.write_u8_le(self.level)?;
        writer.write_u8_le(self.order)?;
        writer.write_u8_le(self.unknown_byte)?;
        writer.write_cstring(&self.animation)?;
        writer.write_cstring(&self.name)?;
        writer.write_cstring(&self.description)?;
        Ok(())
    }

    /// Encode the record with its 16-bit length prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(160);
        self.write_payload(&mut payload)?;
        frame(payload)
    }

    /// Read a magic record from its CSV columns.
    pub fn from_fields(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(Self {
            id: cursor.next_value()?,
            restriction: cursor.next_value()?,
            flags: cursor.next_string()?,
            category: cursor.next_value()?,
            kind: cursor.next_value()?,
            element: cursor.next_value()?,
            switchable: cursor.next_value()?,
            target_type: cursor.next_value()?,
            target_range: cursor.next_value()?,
            target_size: cursor.next_value()?,
            unknown_short1: cursor.next_value()?,
            unknown_short2: cursor.next_value()?,
            unknown_float1: cursor.next_value()?,
            unknown_float2: cursor.next_value()?,
            effects: effects_from_fields(cursor)?,
            cast_time: cursor.next_value()?,
            delay: cursor.next_value()?,
            cost: cursor.next_value()?,
            unbalance: cursor.next_value()?,
            break_value: cursor.next_value()?,
            level: cursor.next_value()?,
            order: cursor.next_value()?,
            unknown_byte: cursor.next_value()?,
            animation: cursor.next_string()?,
            name: cursor.next_string()?,
            description: cursor.next_string()?,
        })
    }

    /// Append the record's CSV columns.
    pub fn write_fields(&self, row: &mut RowWriter) {
        row.push(self.id);
        row.push(self.restriction);
        row.push_string(&self.flags);
        row.push(self.category);
        row.push(self.kind);
        row.push(self.element);
        row.push(self.switchable);
        row.push(self.target_type);
        row.push(self.target_range);
        row.push(self.target_size);
        row.push(self.unknown_short1);
        row.push(self.unknown_short2);
        row.push(self.unknown_float1);
        row.push(self.unknown_float2);

        for effect in &self.effects {
            effect.write_fields(row);
        }

        row.push(self.cast_time);
        row.push(self.delay);
        row.push(self.cost);
        row.push(self.unbalance);
        row.push(self.break_value);
        row.push(self.level);
        row.push(self.order);
        row.push(self.unknown_byte);
        row.push_string(&self.animation);
        row.push_string(&self.name);
        row.push_string(&self.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;

    fn sample() -> Magic {
        Magic {
            id: 200,
            restriction: 0,
            flags: "CM".to_string(),
            category: 1,
            kind: 2,
            element: 3,
            target_type: 4,
            target_range: 10.0,
            target_size: 3,
            unknown_float1: 0.25,
            unknown_float2: -1.0,
            effects: [
                EffectValue::new(7, [120, 0, 0]),
                EffectValue::new(31, [0, 20, 2]),
                EffectValue::default(),
                EffectValue::default(),
                EffectValue::default(),
            ],
            cast_time: 30,
            delay: 15,
            cost: 40,
            unbalance: 10,
            break_value: 100,
            level: 1,
            order: 5,
            animation: "mg_fire01".to_string(),
            name: "Fire Bolt".to_string(),
            description: "Single fire damage (S).\nBurn 20%".to_string(),
            ..Magic::default()
        }
    }

    #[test]
    fn test_binary_round_trip() {
        let magic = sample();
        let bytes = magic.to_bytes().unwrap();

        let mut reader = BinaryReader::new(&bytes[2..]);
        assert_eq!(Magic::read(&mut reader).unwrap(), magic);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_length_prefix() {
        let bytes = sample().to_bytes().unwrap();
        let prefix = i16::from_le_bytes([bytes[0], bytes[1]]);

        assert_eq!(prefix as usize, bytes.len() - 2);
        assert!((120..=180).contains(&bytes.len()));
    }

    #[test]
    fn test_text_round_trip() {
        let magic = sample();
        let mut row = RowWriter::new("magic");
        magic.write_fields(&mut row);
        assert_eq!(row.fields().len(), 46);

        let record = StringRecord::from(row.fields().to_vec());
        let mut cursor = FieldCursor::new(&record, "magic");
        assert_eq!(Magic::from_fields(&mut cursor).unwrap(), magic);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_text_bad_byte_column() {
        let mut row = RowWriter::new("magic");
        sample().write_fields(&mut row);
        let mut fields = row.fields().to_vec();
        fields[4] = "300".to_string(); // category does not fit a byte

        let record = StringRecord::from(fields);
        let mut cursor = FieldCursor::new(&record, "magic");
        assert!(matches!(
            Magic::from_fields(&mut cursor),
            Err(crate::Error::RecordDecode { column: 4, .. })
        ));
    }
}
