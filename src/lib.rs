//! # statcore
//!
//! statcore is the evaluation core of a small vectorized statistical
//! language. Source text is parsed, lowered into executable nodes and
//! evaluated against a context holding environments, options and the
//! warning side channel.
//!
//! Every value is a vector: logical, integer, double, complex, character,
//! raw or list, each with its own NA. Arithmetic recycles operands,
//! conversions go through one coercion engine, and `sum`, `prod`, `min` and
//! `max` share one reduction engine. Calls match arguments by exact name,
//! unique prefix and position, and every call site caches the matching for
//! the call shapes it sees.
//!
//! ```
//! let result = statcore::evaluate("x <- c(a = 1, b = NA, c = 3)\nsum(x, na.rm = TRUE)").unwrap();
//! assert_eq!(format!("{:?}", result.value), "4");
//! assert!(result.warnings.is_empty());
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use logos::Logos;

use crate::{
    ast::Expr,
    error::{Error, ParseError},
    interpreter::{
        evaluator::{core::Context, warning::Warning},
        lexer::{LexerExtras, Token},
        parser::{statement::parse_program, utils::strip_grouped_newlines},
        value::Value,
    },
};

/// The surface syntax tree produced by the parser.
///
/// Every expression carries the source line it started on, so lowering and
/// evaluation can report errors against the text.
pub mod ast;
/// Error types for every phase.
///
/// Parse, lowering, matching, coercion and runtime errors each have their
/// own enum; [`error::Error`] wraps the three that can end a program.
/// Every error exposes a stable identifier next to its message.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, lowering,
///   matcher, coercion, evaluator).
/// - Attaches line numbers to everything raised while evaluating.
pub mod error;
/// The language runtime.
///
/// Lexing, parsing, lowering into nodes, argument matching, the value
/// model with its coercion and reduction engines, environments and the
/// evaluator itself.
pub mod interpreter;
/// Checked numeric conversions shared by the evaluator and the builtins.
pub mod util;

/// Parses source text into its top-level expressions.
///
/// Errors at the end of input report the last line of the source.
///
/// # Example
/// ```
/// use statcore::{error::ParseError, parse};
///
/// assert_eq!(parse("x <- 1; y <- 2").unwrap().len(), 2);
/// assert!(matches!(parse("f(1,\n"), Err(ParseError::UnexpectedEndOfInput { line: 2 })));
/// ```
pub fn parse(source: &str) -> Result<Vec<Expr>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });
    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push((tok, lexer.extras.line)),
            Err(()) => {
                return Err(ParseError::UnexpectedToken { token: lexer.slice().to_string(),
                                                         line:  lexer.extras.line, });
            },
        }
    }
    let last_line = lexer.extras.line;
    let tokens = strip_grouped_newlines(tokens);
    let mut iter = tokens.iter().peekable();
    parse_program(&mut iter).map_err(|e| match e {
                                ParseError::UnexpectedEndOfInput { line: 0 } => {
                                    ParseError::UnexpectedEndOfInput { line: last_line }
                                },
                                e => e,
                            })
}

/// The outcome of [`evaluate`]: the value of the last top-level expression
/// and the warnings raised on the way.
#[derive(Debug)]
pub struct Evaluation {
    /// Value of the last expression, `NULL` for an empty program.
    pub value:    Value,
    /// Warnings in the order they were raised.
    pub warnings: Vec<Warning>,
}

/// Evaluates a program in a fresh context.
///
/// # Errors
/// Returns an error if parsing, lowering or evaluation fails.
///
/// # Examples
/// ```
/// use statcore::evaluate;
///
/// let result = evaluate("max(character(0))").unwrap();
/// assert_eq!(format!("{:?}", result.value), "NA");
/// assert_eq!(result.warnings[0].id(), "NO_NONMISSING_CHARACTER");
///
/// // Reading an undefined variable fails.
/// let err = evaluate("y <- x + 1").unwrap_err();
/// assert_eq!(err.id(), "UNKNOWN_OBJECT");
/// ```
pub fn evaluate(source: &str) -> Result<Evaluation, Error> {
    let mut context = Context::new();
    let value = context.run(source)?;
    Ok(Evaluation { value,
                    warnings: context.take_warnings() })
}
