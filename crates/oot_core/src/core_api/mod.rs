mod engine;
mod types;

pub use crate::checksum::IntegrityMismatch;
pub use crate::error::{CoreError, CoreErrorCode};
pub use crate::import::{ConsoleVersion, ImportReport, ImportSource};
pub use crate::layout::ChunkId;
pub use crate::settings::{Settings, SoundMode, TargetingMode};
pub use engine::{Engine, SUGGESTED_FILENAME, Session};
pub use crate::record::QuestProgress;
pub use types::SlotSummary;
