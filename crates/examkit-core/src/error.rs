//! Storage and folder backend error types.
//!
//! Defined in `examkit-core` so the store traits can name them and callers
//! can tell a missing record from an I/O failure without string matching.

use thiserror::Error;

/// Errors raised by a key-value store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("invalid JSON for key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be represented by this store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The store's internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors returned by a folder backend.
#[derive(Debug, Error)]
pub enum FolderError {
    #[error("folder name must not be empty")]
    EmptyName,

    #[error("folder not found: {0}")]
    FolderNotFound(uuid::Uuid),

    #[error("exam not found: {0}")]
    ExamNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FolderError {
    /// Returns `true` if the request itself was invalid, as opposed to the
    /// backend failing.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FolderError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_error_classification() {
        assert!(FolderError::EmptyName.is_client_error());
        assert!(FolderError::ExamNotFound("e1".into()).is_client_error());
        assert!(!FolderError::Store(StoreError::Poisoned).is_client_error());
    }

    #[test]
    fn store_error_messages() {
        let err = StoreError::InvalidKey("../etc".into());
        assert_eq!(err.to_string(), "invalid storage key: ../etc");
    }
}
