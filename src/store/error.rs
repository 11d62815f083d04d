//! Error types for the result store

use crate::error::ErrorCode;
use std::fmt;
use thiserror::Error;

/// Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures raised by a [`super::ResultStore`] backend
///
/// Store errors are passed through to the caller unchanged; nothing in the
/// crate retries them.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be written as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store settings cannot be used to open a backend
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    pub fn serialization<E: fmt::Display>(err: E) -> Self {
        Self::Serialization(err.to_string())
    }

    pub fn configuration<E: fmt::Display>(msg: E) -> Self {
        Self::Configuration(msg.to_string())
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Io(_) => ErrorCode::STORAGE_IO_ERROR,
            Self::Serialization(_) => ErrorCode::STORAGE_SERIALIZATION_ERROR,
            Self::Configuration(_) => ErrorCode::STORAGE_BACKEND_ERROR,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let io = StorageError::from(std::io::Error::other("disk"));
        assert_eq!(io.code(), ErrorCode::STORAGE_IO_ERROR);
        assert_eq!(
            StorageError::configuration("x").code(),
            ErrorCode::STORAGE_BACKEND_ERROR
        );
    }

    #[test]
    fn test_json_errors_become_serialization() {
        let err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = StorageError::from(err);
        assert!(matches!(err, StorageError::Serialization(_)));
        assert_eq!(err.code(), ErrorCode::STORAGE_SERIALIZATION_ERROR);
    }
}
