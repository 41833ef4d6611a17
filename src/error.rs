/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code, before any lowering or evaluation happens.
pub mod parse_error;
/// Lowering errors.
///
/// Raised while turning the surface tree into executable nodes, most notably
/// when an assignment target cannot be desugared.
pub mod lowering_error;
/// Argument matching errors.
///
/// Raised when the actual arguments of a call cannot be bound to the formal
/// parameters of the callee.
pub mod match_error;
/// Coercion errors.
///
/// Raised when a value has no defined conversion to the requested kind.
pub mod coercion_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, including
/// the non-local exits used by `break`, `next` and `return`.
pub mod runtime_error;

pub use coercion_error::CoercionError;
pub use lowering_error::LoweringError;
pub use match_error::MatchError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure produced while running source text end to end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The parsed tree could not be lowered.
    #[error(transparent)]
    Lowering(#[from] LoweringError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Stable identifier of the underlying error kind.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.id(),
            Self::Lowering(e) => e.id(),
            Self::Runtime(e) => e.id(),
        }
    }
}
