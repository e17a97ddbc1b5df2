use hbnb_types::{TypeError, TypeTag};

/// Errors from record construction and field access.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The field is not declared by this record type.
    #[error("{tag} has no field named {field:?}")]
    UnknownField { tag: TypeTag, field: String },

    /// Identity, timestamps, and the discriminator are never set directly.
    #[error("field {0:?} cannot be assigned")]
    ProtectedField(String),

    /// The value does not fit the declared field kind.
    #[error("invalid value for {tag}.{field}: {source}")]
    InvalidValue {
        tag: TypeTag,
        field: String,
        #[source]
        source: TypeError,
    },

    /// The stored mapping has no `__class__` discriminator.
    #[error("missing __class__ discriminator")]
    MissingClass,

    /// The stored mapping names a different type than the one decoding it.
    #[error("expected __class__ {expected}, found {found:?}")]
    ClassMismatch { expected: TypeTag, found: String },

    /// A float field holds NaN or an infinity, which JSON cannot carry.
    #[error("{tag}.{field} is not a finite number")]
    NonFiniteFloat { tag: TypeTag, field: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
