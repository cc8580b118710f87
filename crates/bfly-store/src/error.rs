use std::path::PathBuf;

use bfly_types::{Collection, RecordId};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a valid store document.
    #[error("malformed store file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// Failure encoding the document for persistence.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A record with this id is already present in the collection.
    #[error("duplicate id {id} in {collection}")]
    DuplicateId { collection: Collection, id: RecordId },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
