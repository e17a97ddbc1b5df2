use thiserror::Error;

use crate::value::FieldKind;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("invalid record key: {0}")]
    InvalidKey(String),

    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("expected {expected} value, got {actual}")]
    KindMismatch { expected: FieldKind, actual: FieldKind },

    #[error("float value must be finite, got {0}")]
    NonFiniteFloat(String),
}
