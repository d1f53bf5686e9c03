//! Error types for slotnote.

use thiserror::Error;

/// Errors that can occur in slotnote operations.
#[derive(Error, Debug)]
pub enum SlotnoteError {
    #[error("Stored notes under '{key}' are not a valid note list: {source}")]
    PersistenceParse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read '{key}' from storage: {reason}")]
    PersistenceRead { key: String, reason: String },

    #[error("Could not write '{key}' to storage: {reason}")]
    PersistenceWrite { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Stored notes under '{key}' are not a valid note list: duplicate id '{id}'")]
    DuplicateId { key: String, id: String },

    #[error("Invalid slot starting {start}: {reason}")]
    InvalidSlot { start: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for slotnote operations.
pub type SlotnoteResult<T> = Result<T, SlotnoteError>;
