/// Core expression parsing.
///
/// Entry point of the precedence hierarchy, assignment operators and the
/// keyword forms `if`, `for`, `while` and `function`.
pub mod core;

/// Prefix operators, exponentiation, postfix operators and primary
/// expressions.
pub mod unary;

/// Binary operator levels from `||` down to `:`.
pub mod binary;

/// Brace-delimited blocks.
pub mod block;

/// Separated expression sequences and whole programs.
pub mod statement;

/// Shared helpers: argument lists, delimiters and line-break handling.
pub mod utils;
