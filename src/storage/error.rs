//! Key-value store error types
//!
//! Defines all errors that can occur while reading or writing persisted entries.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in a key-value store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file or an entry could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store file exists but is not a JSON object of strings
    #[error("Corrupt store file {path:?}: {reason}")]
    Corruption { path: PathBuf, reason: String },

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for key-value store operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Lock("poisoned".to_string());
        assert_eq!(err.to_string(), "Lock error: poisoned");

        let err = StorageError::Corruption {
            path: PathBuf::from("store.json"),
            reason: "expected object".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt store file \"store.json\": expected object"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let storage_err: StorageError = json_err.into();
        assert!(matches!(storage_err, StorageError::Serialization(_)));
    }
}
