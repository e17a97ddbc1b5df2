use std::path::PathBuf;

use hbnb_model::ModelError;
use hbnb_types::{RecordKey, TypeError};

/// Errors from registry and persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested type tag is not a known record type.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// No record is registered under the key.
    #[error("record not found: {0}")]
    NotFound(RecordKey),

    /// The snapshot file exists but is not the expected two-level mapping.
    #[error("malformed snapshot {}: {reason}", path.display())]
    MalformedSnapshot { path: PathBuf, reason: String },

    /// Field-level failure (unknown field, wrong kind, protected field).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnknownType(tag) => Self::UnknownType(tag),
            other => Self::Model(ModelError::Type(other)),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
