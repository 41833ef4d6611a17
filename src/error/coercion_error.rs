use crate::interpreter::value::Kind;

/// Errors raised when a value has no defined conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    /// The value's type is not accepted by the operation.
    #[error("invalid 'type' ({type_name}) of argument")]
    InvalidTypeArgument {
        /// The offending type, as reported by `typeof`.
        type_name: &'static str,
    },
    /// A foreign object without a vector view was coerced.
    #[error("cannot coerce external object to vector")]
    CannotCoerceExternalObject,
    /// A list element does not reduce to a single value of the target kind.
    #[error("(list) object cannot be coerced to type '{target}'")]
    CannotCoerceListElement {
        /// The requested kind.
        target: Kind,
    },
}

impl CoercionError {
    /// Stable identifier of the error kind.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::InvalidTypeArgument { .. } => "INVALID_TYPE_ARGUMENT",
            Self::CannotCoerceExternalObject => "CANNOT_COERCE_EXTERNAL_OBJECT",
            Self::CannotCoerceListElement { .. } => "LIST_COERCION",
        }
    }
}
