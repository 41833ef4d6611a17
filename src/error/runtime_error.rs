use crate::{
    error::{CoercionError, MatchError},
    interpreter::{evaluator::warning::Warning, value::Value},
};

/// Errors raised while evaluating a parsed program.
///
/// `Break`, `Next` and `Return` are non-local exits rather than failures; the
/// evaluator catches them at loop and function boundaries and only lets them
/// escape when no such boundary exists.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A symbol with no binding in any enclosing environment.
    #[error("Error on line {line}: object '{name}' not found.")]
    UnknownVariable {
        name: String,
        line: usize,
    },
    /// A call whose callee name resolves to no function.
    #[error("Error on line {line}: could not find function \"{name}\".")]
    UnknownFunction {
        name: String,
        line: usize,
    },
    /// Read a formal that was neither supplied nor defaulted.
    #[error("Error on line {line}: argument \"{name}\" is missing, with no default.")]
    ArgumentMissing {
        /// The name of the formal.
        name: String,
        line: usize,
    },
    /// The callee of a call is not a function.
    #[error("Error on line {line}: attempt to apply non-function.")]
    NotAFunction {
        line: usize,
    },
    /// Argument matching failed.
    #[error("Error on line {line}: {source}.")]
    Match {
        /// The matcher's error.
        source: MatchError,
        line:   usize,
    },
    /// Coercion failed.
    #[error("Error on line {line}: {source}.")]
    Coercion {
        /// The coercion engine's error.
        source: CoercionError,
        line:   usize,
    },
    /// An operand of the wrong kind.
    #[error("Error on line {line}: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        line:    usize,
    },
    /// An argument was invalid or out of range.
    #[error("Error on line {line}: invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        line:    usize,
    },
    /// A condition was NA or had no elements.
    #[error("Error on line {line}: {details}.")]
    InvalidCondition {
        /// Which of the condition rules was broken.
        details: &'static str,
        line:    usize,
    },
    /// Tried to index outside the extent of a vector.
    #[error("Error on line {line}: subscript out of bounds.")]
    SubscriptOutOfBounds {
        line: usize,
    },
    /// The number of positions does not match the number of dimensions.
    #[error("Error on line {line}: incorrect number of dimensions.")]
    IncorrectDimensions {
        line: usize,
    },
    /// A `stopifnot` argument was not all `TRUE`.
    #[error("Error on line {line}: argument {index} is not all TRUE.")]
    AssertionFailed {
        /// One-based index of the failing argument.
        index: usize,
        line:  usize,
    },
    /// Raised by `stop()`.
    #[error("Error on line {line}: {message}")]
    User {
        /// The message passed to `stop()`.
        message: String,
        line:    usize,
    },
    /// A warning escalated by `options(warn = 2)`.
    #[error("Error on line {}: (converted from warning) {}", warning.line, warning.kind)]
    WarningAsError {
        /// The escalated warning.
        warning: Warning,
    },
    /// The evaluation depth limit was exceeded.
    #[error("Error on line {line}: evaluation nested too deeply: infinite recursion?")]
    NestingTooDeep {
        line: usize,
    },
    /// A connection operation failed.
    #[error("Error on line {line}: connection error: {details}.")]
    Connection {
        /// Details reported by the connection.
        details: String,
        line:    usize,
    },
    /// A native routine failed or is unavailable.
    #[error("Error on line {line}: .Call(\"{symbol}\") failed: {message}.")]
    NativeCall {
        /// The native symbol.
        symbol:  String,
        /// The failure message.
        message: String,
        line:    usize,
    },
    /// `break` outside any loop.
    #[error("Error on line {line}: no loop for break/next, jumping to top level.")]
    Break {
        /// The source line of the `break`.
        line: usize,
    },
    /// `next` outside any loop.
    #[error("Error on line {line}: no loop for break/next, jumping to top level.")]
    Next {
        /// The source line of the `next`.
        line: usize,
    },
    /// `return()` outside any function.
    #[error("Error: no function to return from, jumping to top level.")]
    Return {
        /// The returned value.
        value: Value,
    },
    /// An internal state that should be unreachable.
    #[error("Internal error: {details}.")]
    InvariantViolation {
        /// What went wrong.
        details: &'static str,
    },
}

impl RuntimeError {
    /// Stable identifier of the error kind.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::UnknownVariable { .. } => "UNKNOWN_OBJECT",
            Self::UnknownFunction { .. } => "UNKNOWN_FUNCTION",
            Self::ArgumentMissing { .. } => "ARGUMENT_MISSING",
            Self::NotAFunction { .. } => "APPLY_NON_FUNCTION",
            Self::Match { source, .. } => source.id(),
            Self::Coercion { source, .. } => source.id(),
            Self::TypeError { .. } => "TYPE_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::InvalidCondition { .. } => "INVALID_CONDITION",
            Self::SubscriptOutOfBounds { .. } => "SUBSCRIPT_BOUNDS",
            Self::IncorrectDimensions { .. } => "INCORRECT_DIMENSIONS",
            Self::AssertionFailed { .. } => "ASSERTION_FAILED",
            Self::User { .. } => "GENERIC",
            Self::WarningAsError { .. } => "WARNING_AS_ERROR",
            Self::NestingTooDeep { .. } => "NESTING_TOO_DEEP",
            Self::Connection { .. } => "CONNECTION",
            Self::NativeCall { .. } => "NATIVE_CALL",
            Self::Break { .. } | Self::Next { .. } => "NO_LOOP_FOR_BREAK_NEXT",
            Self::Return { .. } => "NO_FUNCTION_RETURN",
            Self::InvariantViolation { .. } => "INVARIANT_VIOLATION",
        }
    }

    /// Attaches a line to a coercion failure.
    #[must_use]
    pub const fn coercion(source: CoercionError, line: usize) -> Self {
        Self::Coercion { source, line }
    }
}
