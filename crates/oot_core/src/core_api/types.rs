use serde::{Deserialize, Serialize};

use crate::record::QuestProgress;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    /// 1-based, as shown on the file-select screen.
    pub slot: u8,
    /// Decoded name with the field's trailing space padding removed.
    pub name: String,
    pub is_blank: bool,
    pub rupees: u16,
    pub deaths: u16,
    pub heart_containers: u16,
    /// Current health in sixteenths of a heart.
    pub health: u16,
    pub gold_skulltulas: u16,
    pub double_defense: bool,
    pub quest: QuestProgress,
    pub slot_index: u8,
    pub stored_checksum: u16,
    pub computed_checksum: u16,
}

impl SlotSummary {
    pub fn checksum_valid(&self) -> bool {
        self.stored_checksum == self.computed_checksum
    }

    /// Current health as (whole hearts, remaining sixteenths).
    pub fn hearts(&self) -> (u16, u16) {
        (self.health / 0x10, self.health % 0x10)
    }
}
