/// Errors raised when binding actual arguments to formal parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Two actuals bound the same formal.
    #[error("formal argument \"{formal}\" matched by multiple actual arguments")]
    MultipleActualArguments {
        /// The formal that was bound twice.
        formal: String,
    },
    /// A named actual is a prefix of more than one unbound formal.
    #[error("argument {position} matches multiple formal arguments")]
    AmbiguousPartialMatch {
        /// One-based position of the actual in the call.
        position: usize,
        /// The name the actual was given.
        name:     String,
    },
    /// One actual could not be bound and the callee has no `...`.
    #[error("unused argument ({argument})")]
    UnusedArgument {
        /// The argument as written (`name = ` prefix included when named).
        argument: String,
    },
    /// Several actuals could not be bound and the callee has no `...`.
    #[error("unused arguments ({arguments})")]
    UnusedArguments {
        /// The unbound arguments, comma separated.
        arguments: String,
    },
}

impl MatchError {
    /// Stable identifier of the error kind.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::MultipleActualArguments { .. } => "FORMAL_MATCHED_MULTIPLE",
            Self::AmbiguousPartialMatch { .. } => "ARGUMENT_MATCHES_MULTIPLE",
            Self::UnusedArgument { .. } => "UNUSED_ARGUMENT",
            Self::UnusedArguments { .. } => "UNUSED_ARGUMENTS",
        }
    }
}
