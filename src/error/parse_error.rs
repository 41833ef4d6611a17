/// Failures while turning source text into an AST. Every variant carries the
/// source line it was raised on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A token that no production accepts at this position.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        token: String,
        line:  usize,
    },
    /// The source ended inside an unfinished expression.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        line: usize,
    },
    /// A closing delimiter was expected but not found.
    #[error("Error on line {line}: Expected '{expected}'.")]
    ExpectedDelimiter {
        expected: &'static str,
        line:     usize,
    },
    /// A numeric literal could not be represented.
    #[error("Error on line {line}: Invalid numeric literal '{literal}'.")]
    InvalidLiteral {
        /// The literal as written.
        literal: String,
        line:    usize,
    },
    /// A formal parameter name appeared twice in one function definition.
    #[error("Error on line {line}: Repeated formal argument '{name}'.")]
    RepeatedFormal {
        name: String,
        line: usize,
    },
}

impl ParseError {
    /// Stable identifier of the error kind.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "UNEXPECTED_TOKEN",
            Self::UnexpectedEndOfInput { .. } => "UNEXPECTED_END_OF_INPUT",
            Self::ExpectedDelimiter { .. } => "EXPECTED_DELIMITER",
            Self::InvalidLiteral { .. } => "INVALID_LITERAL",
            Self::RepeatedFormal { .. } => "REPEATED_FORMAL",
        }
    }
}
