use tracing::debug;

use crate::checksum::{self, IntegrityMismatch};
use crate::container::SaveContainer;
use crate::error::CoreError;
use crate::import::{self, ConsoleVersion, ImportReport, ImportSource};
use crate::layout::{ChunkId, SLOT_COUNT};
use crate::record::{self, NAME_LEN, NAME_OFFSET};
use crate::settings::{SOUND_OFFSET, Settings, SoundMode, TARGETING_OFFSET, TargetingMode};
use crate::text;

use super::types::SlotSummary;

/// File name the game and most emulators expect for the battery save.
pub const SUGGESTED_FILENAME: &str = "THE LEGEND OF ZELDA.sra";

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// The active save: one owned container plus the warnings seen while loading
/// it.
#[derive(Debug, Clone)]
pub struct Session {
    container: SaveContainer,
    load_warnings: Vec<IntegrityMismatch>,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let decoded = SaveContainer::decode(bytes.as_ref()).map_err(|e| {
            CoreError::new(e.code, format!("failed to decode save file: {}", e.message))
        })?;

        Ok(Session {
            container: decoded.container,
            load_warnings: decoded.warnings,
        })
    }

    pub fn blank(&self) -> Session {
        Session {
            container: SaveContainer::blank(),
            load_warnings: Vec::new(),
        }
    }
}

impl Session {
    pub fn container(&self) -> &SaveContainer {
        &self.container
    }

    /// Checksum mismatches found when the current container was loaded.
    pub fn load_warnings(&self) -> &[IntegrityMismatch] {
        &self.load_warnings
    }

    /// Re-verifies all six records against their current contents.
    pub fn integrity(&self) -> Result<Vec<IntegrityMismatch>, CoreError> {
        self.container.verify_all()
    }

    pub fn settings(&self) -> Settings {
        let header = self.container.header();
        Settings {
            sound: SoundMode::from_raw(header[SOUND_OFFSET]),
            targeting: TargetingMode::from_raw(header[TARGETING_OFFSET]),
        }
    }

    pub fn set_sound_mode(&mut self, mode: SoundMode) -> Result<(), CoreError> {
        self.set_sound_raw(mode.raw())
    }

    pub fn set_sound_raw(&mut self, raw: u8) -> Result<(), CoreError> {
        record::write_u8(self.container.header_mut(), SOUND_OFFSET, raw)
    }

    pub fn set_targeting_mode(&mut self, mode: TargetingMode) -> Result<(), CoreError> {
        self.set_targeting_raw(mode.raw())
    }

    pub fn set_targeting_raw(&mut self, raw: u8) -> Result<(), CoreError> {
        record::write_u8(self.container.header_mut(), TARGETING_OFFSET, raw)
    }

    /// Summary of a 0-based slot, read from the primary record.
    pub fn slot_summary(&self, slot: usize) -> Result<SlotSummary, CoreError> {
        let id = ChunkId::file(slot)?;
        let record = self.container.record(id)?;

        Ok(SlotSummary {
            slot: slot as u8 + 1,
            name: record.name()?.trim_end().to_string(),
            is_blank: record.is_blank(),
            rupees: record.rupees()?,
            deaths: record.deaths()?,
            heart_containers: record.heart_containers()?,
            health: record.health()?,
            gold_skulltulas: record.gold_skulltulas()?,
            double_defense: record.has_double_defense()?,
            quest: record.quest()?,
            slot_index: record.slot_index()?,
            stored_checksum: record.stored_checksum()?,
            computed_checksum: record.computed_checksum()?,
        })
    }

    pub fn slot_summaries(&self) -> Result<Vec<SlotSummary>, CoreError> {
        (0..SLOT_COUNT).map(|slot| self.slot_summary(slot)).collect()
    }

    /// Renames the player in a 0-based slot. The name is space-padded to the
    /// field width, written to both the file and its backup, and both
    /// checksums are refreshed.
    pub fn set_name(&mut self, slot: usize, name: &str) -> Result<(), CoreError> {
        let mut encoded = text::encode(name)?;
        if encoded.len() > NAME_LEN {
            return Err(CoreError::out_of_range(format!(
                "name '{name}' is {} characters, at most {NAME_LEN} fit",
                encoded.len()
            )));
        }
        encoded.resize(NAME_LEN, text::SPACE);

        let mut record = self.container.slot(slot)?.to_vec();
        record::write_bytes(&mut record, NAME_OFFSET, &encoded)?;
        checksum::refresh(&mut record)?;
        self.container.replace_slot_pair(slot, &record)?;
        debug!("Renamed slot {} to {name}", slot + 1);
        Ok(())
    }

    pub fn import(&mut self, source: ImportSource<'_>) -> Result<ImportReport, CoreError> {
        let replaces_all = matches!(source, ImportSource::Sra(_));
        let report = import::import(source, &mut self.container)?;
        if replaces_all {
            self.load_warnings = report.warnings.clone();
        }
        Ok(report)
    }

    pub fn import_ram(
        &mut self,
        snapshot: &[u8],
        version: ConsoleVersion,
        slot: usize,
    ) -> Result<ImportReport, CoreError> {
        self.import(ImportSource::Ram {
            snapshot,
            version,
            slot,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.container.encode().map_err(|e| {
            CoreError::new(e.code, format!("failed to emit save bytes: {}", e.message))
        })
    }
}
