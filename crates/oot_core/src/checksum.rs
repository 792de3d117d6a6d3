use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::layout::ChunkId;
use crate::record;

/// Bytes `[0, CHECKSUM_SPAN)` of a record are covered by its checksum.
pub const CHECKSUM_SPAN: usize = 0x1352;
pub const CHECKSUM_OFFSET: usize = 0x1352;

/// Sums big-endian 16-bit words over `bytes[..length]` and keeps the low 16
/// bits. An odd trailing byte is ignored.
pub fn compute(bytes: &[u8], length: usize) -> Result<u16> {
    if length > bytes.len() {
        return Err(CoreError::out_of_range(format!(
            "checksum length {length} exceeds input length {}",
            bytes.len()
        )));
    }
    let sum: u64 = bytes[..length]
        .chunks_exact(2)
        .map(|word| u64::from(u16::from_be_bytes([word[0], word[1]])))
        .sum();
    Ok((sum & 0xFFFF) as u16)
}

pub fn stored(record: &[u8]) -> Result<u16> {
    record::read_u16_be(record, CHECKSUM_OFFSET)
}

/// Recomputes the checksum and writes it into the record's checksum field.
pub fn refresh(record: &mut [u8]) -> Result<u16> {
    let checksum = compute(record, CHECKSUM_SPAN)?;
    record::write_u16_be(record, CHECKSUM_OFFSET, checksum)?;
    Ok(checksum)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityMismatch {
    pub chunk: ChunkId,
    pub computed: u16,
    pub expected: u16,
}

impl fmt::Display for IntegrityMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} CRC mismatch (got {:x} expected {:x})",
            self.chunk, self.computed, self.expected
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Valid(u16),
    Mismatch(IntegrityMismatch),
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn mismatch(&self) -> Option<&IntegrityMismatch> {
        match self {
            Self::Valid(_) => None,
            Self::Mismatch(m) => Some(m),
        }
    }
}

/// Checks a record's stored checksum. A mismatch is a finding, not an error:
/// the record stays usable.
pub fn verify(record: &[u8], chunk: ChunkId) -> Result<Verification> {
    let expected = stored(record)?;
    let computed = compute(record, CHECKSUM_SPAN)?;
    if computed == expected {
        Ok(Verification::Valid(computed))
    } else {
        Ok(Verification::Mismatch(IntegrityMismatch {
            chunk,
            computed,
            expected,
        }))
    }
}
