//! Error types for persisted data and parsed names.

use std::fmt;

/// Errors that can occur while reading or writing persisted data.
#[derive(Debug)]
pub enum StorageError {
    /// Failed to read or write the backing file.
    Io(std::io::Error),
    /// Stored data is not valid JSON for the requested type.
    Json(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Storage I/O failed: {}", e),
            StorageError::Json(e) => write!(f, "Stored data is malformed: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// A difficulty name that is not one of endless/easy/normal/hard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown difficulty '{}'", self.0)
    }
}

impl std::error::Error for UnknownDifficulty {}
