use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoreErrorCode {
    /// Byte length does not fit the word size or the fixed file layout.
    MalformedInput,
    /// A field access ran past the end of its record.
    OutOfRange,
    /// Unknown console version or slot number.
    InvalidSelector,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::MalformedInput, message)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::OutOfRange, message)
    }

    pub fn invalid_selector(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::InvalidSelector, message)
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
