use tracing::{debug, warn};

use crate::byteswap;
use crate::checksum::{self, IntegrityMismatch, Verification};
use crate::error::{CoreError, Result};
use crate::layout::{
    CHUNK_COUNT, CHUNK_LENGTHS, ChunkId, FILE_LEN, FileLayout, HEADER_LEN, SLOT_COUNT, SLOT_LEN,
};
use crate::record::SlotRecord;

pub const HEADER_TEMPLATE: [u8; HEADER_LEN] = [
    0x00, 0x00, 0x00, 0x98, 0x09, 0x10, 0x21, 0x5A, 0x45, 0x4C, 0x44, 0x41, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The eight chunks of an `.sra` file in linear byte order. Chunk count,
/// order and lengths never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveContainer {
    chunks: [Vec<u8>; CHUNK_COUNT],
}

#[derive(Debug, Clone)]
pub struct Decoded {
    pub container: SaveContainer,
    pub warnings: Vec<IntegrityMismatch>,
}

impl SaveContainer {
    /// Header template followed by zero-filled slots, backups and padding.
    pub fn blank() -> Self {
        let mut chunks: [Vec<u8>; CHUNK_COUNT] =
            std::array::from_fn(|index| vec![0u8; CHUNK_LENGTHS[index]]);
        chunks[0].copy_from_slice(&HEADER_TEMPLATE);
        Self { chunks }
    }

    /// Splits a console-order file into chunks, word-swapping each chunk on
    /// its own. Checksum mismatches come back as warnings alongside the
    /// container.
    pub fn decode(bytes: &[u8]) -> Result<Decoded> {
        if bytes.len() != FILE_LEN {
            return Err(CoreError::malformed(format!(
                "save file must be {FILE_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let layout = FileLayout::standard();
        layout.validate()?;

        let mut container = Self::blank();
        let mut warnings = Vec::new();
        for chunk in &layout.chunks {
            let raw = &bytes[chunk.range.start..chunk.range.end];
            let swapped = byteswap::swap_words(raw)?;

            if chunk.id.is_record() {
                if let Verification::Mismatch(mismatch) = checksum::verify(&swapped, chunk.id)? {
                    warn!("{mismatch}");
                    warnings.push(mismatch);
                }
            }

            container.chunks[chunk.id.index()?] = swapped;
        }

        debug!(
            "Decoded save file ({} bytes, {} checksum warnings)",
            bytes.len(),
            warnings.len()
        );
        Ok(Decoded {
            container,
            warnings,
        })
    }

    /// Inverse of [`SaveContainer::decode`]: swaps each chunk back to console
    /// order and concatenates them. Checksums are emitted as stored.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(FILE_LEN);
        for chunk in &self.chunks {
            let start = out.len();
            out.extend_from_slice(chunk);
            byteswap::swap_words_in_place(&mut out[start..])?;
        }

        if out.len() != FILE_LEN {
            return Err(CoreError::malformed(format!(
                "encoded length mismatch: got {}, expected {FILE_LEN}",
                out.len()
            )));
        }
        Ok(out)
    }

    pub fn chunk(&self, id: ChunkId) -> Result<&[u8]> {
        let index = id.index()?;
        Ok(&self.chunks[index])
    }

    pub fn header(&self) -> &[u8] {
        &self.chunks[0]
    }

    pub fn header_mut(&mut self) -> &mut [u8] {
        &mut self.chunks[0]
    }

    /// Primary record for a 0-based slot index.
    pub fn slot(&self, slot: usize) -> Result<&[u8]> {
        self.chunk(ChunkId::file(slot)?)
    }

    /// Backup record for a 0-based slot index.
    pub fn backup(&self, slot: usize) -> Result<&[u8]> {
        self.chunk(ChunkId::backup(slot)?)
    }

    pub fn record(&self, id: ChunkId) -> Result<SlotRecord<'_>> {
        if !id.is_record() {
            return Err(CoreError::invalid_selector(format!(
                "chunk {id} is not a file record"
            )));
        }
        SlotRecord::new(self.chunk(id)?)
    }

    /// Writes `record` into both the primary and the backup chunk of a slot.
    pub fn replace_slot_pair(&mut self, slot: usize, record: &[u8]) -> Result<()> {
        let file = ChunkId::file(slot)?;
        let backup = ChunkId::backup(slot)?;
        if record.len() != SLOT_LEN {
            return Err(CoreError::malformed(format!(
                "slot record must be {SLOT_LEN} bytes, got {}",
                record.len()
            )));
        }

        let (file, backup) = (file.index()?, backup.index()?);
        self.chunks[file].copy_from_slice(record);
        self.chunks[backup].copy_from_slice(record);
        Ok(())
    }

    /// Re-verifies all six records.
    pub fn verify_all(&self) -> Result<Vec<IntegrityMismatch>> {
        let mut out = Vec::new();
        for index in 1..=SLOT_COUNT * 2 {
            let Some(id) = ChunkId::from_index(index) else {
                continue;
            };
            if let Verification::Mismatch(mismatch) = checksum::verify(self.chunk(id)?, id)? {
                out.push(mismatch);
            }
        }
        Ok(out)
    }
}

impl Default for SaveContainer {
    fn default() -> Self {
        Self::blank()
    }
}
