use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::error::{CoreError, Result};
use crate::layout::SLOT_LEN;
use crate::text;

pub const DEATHS_OFFSET: usize = 0x0022;
pub const NAME_OFFSET: usize = 0x0024;
pub const NAME_LEN: usize = 8;
pub const HEART_CONTAINERS_OFFSET: usize = 0x002E;
pub const HEALTH_OFFSET: usize = 0x0030;
pub const RUPEES_OFFSET: usize = 0x0034;
pub const DOUBLE_DEFENSE_OFFSET: usize = 0x00CF;
pub const GOLD_SKULLTULAS_OFFSET: usize = 0x00D0;
pub const SLOT_INDEX_OFFSET: usize = 0x1354;

/// Health and heart containers are stored in sixteenths of a heart.
pub const HEALTH_PER_HEART: u16 = 0x10;
pub const MIN_HEART_CONTAINERS: u16 = 3;

/// A single flag bit inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub offset: usize,
    pub bit: u8,
}

impl BitField {
    pub const fn new(offset: usize, bit: u8) -> Self {
        Self { offset, bit }
    }

    pub fn read(&self, record: &[u8]) -> Result<bool> {
        read_bit(record, self.offset, self.bit)
    }
}

pub const KOKIRI_EMERALD: BitField = BitField::new(0x0ED5, 7);
pub const GORON_RUBY: BitField = BitField::new(0x0ED9, 5);
pub const ZORA_SAPPHIRE: BitField = BitField::new(0x0EDB, 7);
pub const FOREST_MEDALLION: BitField = BitField::new(0x0EDC, 0);
pub const FIRE_MEDALLION: BitField = BitField::new(0x0EDC, 1);
pub const WATER_MEDALLION: BitField = BitField::new(0x0EDC, 2);
pub const SPIRIT_MEDALLION: BitField = BitField::new(0x0EEC, 0);
// Shares its bit with the forest medallion; kept as the editor has always read it.
pub const SHADOW_MEDALLION: BitField = BitField::new(0x0EDC, 0);
pub const LIGHT_MEDALLION: BitField = BitField::new(0x0EDD, 5);

/// Spiritual stones and medallions collected in one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestProgress {
    pub kokiri_emerald: bool,
    pub goron_ruby: bool,
    pub zora_sapphire: bool,
    pub forest_medallion: bool,
    pub fire_medallion: bool,
    pub water_medallion: bool,
    pub spirit_medallion: bool,
    pub shadow_medallion: bool,
    pub light_medallion: bool,
}

impl QuestProgress {
    pub fn spiritual_stones(&self) -> [(&'static str, bool); 3] {
        [
            ("Kokiri", self.kokiri_emerald),
            ("Goron", self.goron_ruby),
            ("Zora", self.zora_sapphire),
        ]
    }

    pub fn medallions(&self) -> [(&'static str, bool); 6] {
        [
            ("Forest", self.forest_medallion),
            ("Fire", self.fire_medallion),
            ("Water", self.water_medallion),
            ("Spirit", self.spirit_medallion),
            ("Shadow", self.shadow_medallion),
            ("Light", self.light_medallion),
        ]
    }
}

fn check_bounds(record: &[u8], offset: usize, width: usize, field: &str) -> Result<()> {
    let fits = offset
        .checked_add(width)
        .is_some_and(|end| end <= record.len());
    if !fits {
        return Err(CoreError::out_of_range(format!(
            "{field} at offset {offset:#06x} (width {width}) exceeds record length {}",
            record.len()
        )));
    }
    Ok(())
}

pub fn read_u8(record: &[u8], offset: usize) -> Result<u8> {
    check_bounds(record, offset, 1, "u8")?;
    Ok(record[offset])
}

pub fn read_u16_be(record: &[u8], offset: usize) -> Result<u16> {
    check_bounds(record, offset, 2, "u16")?;
    Ok(u16::from_be_bytes([record[offset], record[offset + 1]]))
}

/// Bit 0 is the least significant bit of the byte at `offset`.
pub fn read_bit(record: &[u8], offset: usize, bit: u8) -> Result<bool> {
    if bit > 7 {
        return Err(CoreError::out_of_range(format!(
            "bit index {bit} at offset {offset:#06x}, expected 0..7"
        )));
    }
    let byte = read_u8(record, offset)?;
    Ok((byte >> bit) & 1 == 1)
}

pub fn read_bytes(record: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    check_bounds(record, offset, len, "byte range")?;
    Ok(&record[offset..offset + len])
}

pub fn write_u8(record: &mut [u8], offset: usize, value: u8) -> Result<()> {
    check_bounds(record, offset, 1, "u8")?;
    record[offset] = value;
    Ok(())
}

pub fn write_u16_be(record: &mut [u8], offset: usize, value: u16) -> Result<()> {
    check_bounds(record, offset, 2, "u16")?;
    record[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    Ok(())
}

pub fn write_bytes(record: &mut [u8], offset: usize, bytes: &[u8]) -> Result<()> {
    check_bounds(record, offset, bytes.len(), "byte range")?;
    record[offset..offset + bytes.len()].copy_from_slice(bytes);
    Ok(())
}

/// Read-only view over one 5200-byte file slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotRecord<'a> {
    bytes: &'a [u8],
}

impl<'a> SlotRecord<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() != SLOT_LEN {
            return Err(CoreError::malformed(format!(
                "slot record must be {SLOT_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn name(&self) -> Result<String> {
        Ok(text::decode(read_bytes(self.bytes, NAME_OFFSET, NAME_LEN)?))
    }

    pub fn deaths(&self) -> Result<u16> {
        read_u16_be(self.bytes, DEATHS_OFFSET)
    }

    pub fn rupees(&self) -> Result<u16> {
        read_u16_be(self.bytes, RUPEES_OFFSET)
    }

    pub fn heart_containers_raw(&self) -> Result<u16> {
        read_u16_be(self.bytes, HEART_CONTAINERS_OFFSET)
    }

    /// Whole heart containers, never fewer than the three Link starts with.
    /// A partial container (raw value not a multiple of 0x10) rounds down;
    /// [`SlotRecord::heart_containers_raw`] keeps the sixteenths.
    pub fn heart_containers(&self) -> Result<u16> {
        let containers = self.heart_containers_raw()? / HEALTH_PER_HEART;
        Ok(containers.max(MIN_HEART_CONTAINERS))
    }

    pub fn health(&self) -> Result<u16> {
        read_u16_be(self.bytes, HEALTH_OFFSET)
    }

    pub fn gold_skulltulas(&self) -> Result<u16> {
        read_u16_be(self.bytes, GOLD_SKULLTULAS_OFFSET)
    }

    pub fn has_double_defense(&self) -> Result<bool> {
        Ok(read_u8(self.bytes, DOUBLE_DEFENSE_OFFSET)? > 0)
    }

    pub fn slot_index(&self) -> Result<u8> {
        read_u8(self.bytes, SLOT_INDEX_OFFSET)
    }

    pub fn quest(&self) -> Result<QuestProgress> {
        Ok(QuestProgress {
            kokiri_emerald: KOKIRI_EMERALD.read(self.bytes)?,
            goron_ruby: GORON_RUBY.read(self.bytes)?,
            zora_sapphire: ZORA_SAPPHIRE.read(self.bytes)?,
            forest_medallion: FOREST_MEDALLION.read(self.bytes)?,
            fire_medallion: FIRE_MEDALLION.read(self.bytes)?,
            water_medallion: WATER_MEDALLION.read(self.bytes)?,
            spirit_medallion: SPIRIT_MEDALLION.read(self.bytes)?,
            shadow_medallion: SHADOW_MEDALLION.read(self.bytes)?,
            light_medallion: LIGHT_MEDALLION.read(self.bytes)?,
        })
    }

    pub fn stored_checksum(&self) -> Result<u16> {
        checksum::stored(self.bytes)
    }

    pub fn computed_checksum(&self) -> Result<u16> {
        checksum::compute(self.bytes, checksum::CHECKSUM_SPAN)
    }

    /// True when every checksummed byte is zero, as in a never-used slot.
    pub fn is_blank(&self) -> bool {
        self.bytes[..checksum::CHECKSUM_SPAN]
            .iter()
            .all(|&b| b == 0)
    }
}
