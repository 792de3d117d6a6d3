use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const HEADER_LEN: usize = 0x20;
pub const SLOT_LEN: usize = 0x1450;
pub const PADDING_LEN: usize = 0x600;

/// Number of playable file slots. Each one also has a backup chunk.
pub const SLOT_COUNT: usize = 3;
pub const CHUNK_COUNT: usize = 8;

pub const CHUNK_LENGTHS: [usize; CHUNK_COUNT] = [
    HEADER_LEN,
    SLOT_LEN,
    SLOT_LEN,
    SLOT_LEN,
    SLOT_LEN,
    SLOT_LEN,
    SLOT_LEN,
    PADDING_LEN,
];

pub const FILE_LEN: usize = HEADER_LEN + SLOT_LEN * SLOT_COUNT * 2 + PADDING_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Identity of one chunk in the file. Slot numbers are 1-based, matching the
/// file-select screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkId {
    Header,
    File(u8),
    Backup(u8),
    Padding,
}

impl ChunkId {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Header),
            1..=3 => Some(Self::File(index as u8)),
            4..=6 => Some(Self::Backup((index - SLOT_COUNT) as u8)),
            7 => Some(Self::Padding),
            _ => None,
        }
    }

    /// Primary chunk for a 0-based slot index.
    pub fn file(slot: usize) -> Result<Self> {
        check_slot(slot)?;
        Ok(Self::File(slot as u8 + 1))
    }

    /// Backup chunk for a 0-based slot index.
    pub fn backup(slot: usize) -> Result<Self> {
        check_slot(slot)?;
        Ok(Self::Backup(slot as u8 + 1))
    }

    /// Position of the chunk in file order. Record ids carrying a slot number
    /// outside 1..=3 are rejected.
    pub fn index(&self) -> Result<usize> {
        match *self {
            Self::Header => Ok(0),
            Self::File(n) => slot_position(n),
            Self::Backup(n) => Ok(slot_position(n)? + SLOT_COUNT),
            Self::Padding => Ok(CHUNK_COUNT - 1),
        }
    }

    pub fn role(&self) -> &'static str {
        match *self {
            Self::Header => "Header",
            Self::File(_) => "File",
            Self::Backup(_) => "Backup",
            Self::Padding => "Padding",
        }
    }

    pub fn slot_number(&self) -> Option<u8> {
        match *self {
            Self::File(n) | Self::Backup(n) => Some(n),
            Self::Header | Self::Padding => None,
        }
    }

    pub fn is_record(&self) -> bool {
        self.slot_number().is_some()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot_number() {
            Some(n) => write!(f, "{} {}", self.role(), n),
            None => f.write_str(self.role()),
        }
    }
}

fn slot_position(number: u8) -> Result<usize> {
    let position = usize::from(number);
    if !(1..=SLOT_COUNT).contains(&position) {
        return Err(CoreError::invalid_selector(format!(
            "invalid slot number {number}, expected 1..={SLOT_COUNT}"
        )));
    }
    Ok(position)
}

pub fn check_slot(slot: usize) -> Result<()> {
    if slot >= SLOT_COUNT {
        return Err(CoreError::invalid_selector(format!(
            "invalid slot index {slot}, expected 0..{}",
            SLOT_COUNT - 1
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    pub id: ChunkId,
    pub range: ByteRange,
}

#[derive(Debug, Clone)]
pub struct FileLayout {
    pub file_len: usize,
    pub chunks: Vec<ChunkLayout>,
}

impl FileLayout {
    /// The one layout every `.sra` file uses, walked with a running cursor.
    pub fn standard() -> Self {
        let mut cursor = 0usize;
        let mut chunks = Vec::with_capacity(CHUNK_COUNT);
        for (index, &len) in CHUNK_LENGTHS.iter().enumerate() {
            if let Some(id) = ChunkId::from_index(index) {
                chunks.push(ChunkLayout {
                    id,
                    range: ByteRange {
                        start: cursor,
                        end: cursor + len,
                    },
                });
            }
            cursor += len;
        }

        Self {
            file_len: cursor,
            chunks,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.chunks.first() else {
            return Err(CoreError::malformed(
                "file layout must contain at least one chunk",
            ));
        };

        if first.range.start != 0 {
            return Err(CoreError::malformed("layout does not start at byte 0"));
        }

        let mut expected = 0usize;
        for chunk in &self.chunks {
            if chunk.range.start != expected {
                return Err(CoreError::malformed(format!(
                    "layout gap/overlap around chunk {}: expected start {}, got {}",
                    chunk.id, expected, chunk.range.start
                )));
            }
            let expected_len = CHUNK_LENGTHS[chunk.id.index()?];
            if chunk.range.len() != expected_len {
                return Err(CoreError::malformed(format!(
                    "chunk {} spans {} bytes, expected {expected_len}",
                    chunk.id,
                    chunk.range.len()
                )));
            }
            expected = chunk.range.end;
        }

        if expected != self.file_len {
            return Err(CoreError::malformed(format!(
                "layout does not cover file: ended at {}, file length {}",
                expected, self.file_len
            )));
        }

        Ok(())
    }
}
