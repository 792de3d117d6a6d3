use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::checksum::{self, IntegrityMismatch, Verification};
use crate::container::SaveContainer;
use crate::error::{CoreError, Result};
use crate::layout::{CHUNK_COUNT, ChunkId, SLOT_LEN, check_slot};
use crate::record::{self, SLOT_INDEX_OFFSET};

/// Console region/revision, which decides where the live save context sits
/// in an RDRAM dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleVersion {
    Ntsc10,
    Ntsc11,
    Ntsc12,
    Pal10,
    Pal11,
}

impl ConsoleVersion {
    pub const ALL: [Self; 5] = [
        Self::Ntsc10,
        Self::Ntsc11,
        Self::Ntsc12,
        Self::Pal10,
        Self::Pal11,
    ];

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            CoreError::invalid_selector(format!(
                "invalid console version index {index}, expected 0..{}",
                Self::ALL.len() - 1
            ))
        })
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ntsc-1.0" | "ntsc10" => Ok(Self::Ntsc10),
            "ntsc-1.1" | "ntsc11" => Ok(Self::Ntsc11),
            "ntsc-1.2" | "ntsc12" => Ok(Self::Ntsc12),
            "pal-1.0" | "pal10" => Ok(Self::Pal10),
            "pal-1.1" | "pal11" => Ok(Self::Pal11),
            _ => Err(CoreError::invalid_selector(format!(
                "unknown console version '{name}', expected one of: \
                 ntsc-1.0, ntsc-1.1, ntsc-1.2, pal-1.0, pal-1.1"
            ))),
        }
    }

    pub fn ram_offset(self) -> usize {
        match self {
            Self::Ntsc10 => 0x11A5D0,
            Self::Ntsc11 => 0x11A790,
            Self::Ntsc12 => 0x11AC80,
            Self::Pal10 => 0x1183D0,
            Self::Pal11 => 0x118410,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ntsc10 => "NTSC 1.0",
            Self::Ntsc11 => "NTSC 1.1",
            Self::Ntsc12 => "NTSC 1.2",
            Self::Pal10 => "PAL 1.0",
            Self::Pal11 => "PAL 1.1",
        }
    }
}

impl fmt::Display for ConsoleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where imported save data comes from.
#[derive(Debug, Clone, Copy)]
pub enum ImportSource<'a> {
    /// A whole `.sra` file; replaces every chunk of the target.
    Sra(&'a [u8]),
    /// An RDRAM dump holding one in-progress file, spliced into a 0-based
    /// slot of the target.
    Ram {
        snapshot: &'a [u8],
        version: ConsoleVersion,
        slot: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub touched: Vec<ChunkId>,
    pub warnings: Vec<IntegrityMismatch>,
}

/// Applies an import to `target`. All validation happens before the target
/// is touched, so a failed import leaves it unchanged.
pub fn import(source: ImportSource<'_>, target: &mut SaveContainer) -> Result<ImportReport> {
    match source {
        ImportSource::Sra(bytes) => {
            let decoded = SaveContainer::decode(bytes)?;
            *target = decoded.container;
            debug!("Imported full save file");
            Ok(ImportReport {
                touched: (0..CHUNK_COUNT)
                    .filter_map(ChunkId::from_index)
                    .collect(),
                warnings: decoded.warnings,
            })
        }
        ImportSource::Ram {
            snapshot,
            version,
            slot,
        } => {
            check_slot(slot)?;
            let record = extract_ram_record(snapshot, version, slot)?;
            target.replace_slot_pair(slot, &record)?;
            debug!("Imported {version} RAM snapshot into slot {}", slot + 1);

            let file = ChunkId::file(slot)?;
            let backup = ChunkId::backup(slot)?;
            let mut warnings = Vec::new();
            for id in [file, backup] {
                if let Verification::Mismatch(mismatch) = checksum::verify(target.chunk(id)?, id)? {
                    warn!("{mismatch}");
                    warnings.push(mismatch);
                }
            }

            Ok(ImportReport {
                touched: vec![file, backup],
                warnings,
            })
        }
    }
}

/// Copies the save context out of an RDRAM dump, then stamps its checksum and
/// slot index so it is ready to be written into `slot`.
pub fn extract_ram_record(
    snapshot: &[u8],
    version: ConsoleVersion,
    slot: usize,
) -> Result<Vec<u8>> {
    check_slot(slot)?;
    let offset = version.ram_offset();
    let end = offset + SLOT_LEN;
    if snapshot.len() < end {
        return Err(CoreError::malformed(format!(
            "{version} RAM snapshot must cover {offset:#x}..{end:#x}, got {} bytes",
            snapshot.len()
        )));
    }

    let mut record = snapshot[offset..end].to_vec();
    checksum::refresh(&mut record)?;
    record::write_u8(&mut record, SLOT_INDEX_OFFSET, slot as u8)?;
    Ok(record)
}
