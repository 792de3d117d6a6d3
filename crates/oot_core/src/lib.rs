//! Codec and query library for Ocarina of Time `.sra` battery saves.
//!
//! The file is a fixed run of eight chunks (header, three file slots, their
//! three backups and trailing padding) stored in the console's word-swapped
//! byte order. [`container::SaveContainer`] owns the decoded chunks and
//! [`core_api::Engine`] wraps one in a [`core_api::Session`] for querying,
//! editing and export.

pub mod byteswap;
pub mod checksum;
pub mod container;
pub mod core_api;
pub mod error;
pub mod import;
pub mod layout;
pub mod record;
pub mod settings;
pub mod text;

pub use error::{CoreError, CoreErrorCode};
