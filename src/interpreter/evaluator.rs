/// Binary operator evaluation logic.
///
/// Handles the element-wise operators: arithmetic, comparisons, `&`, `|`
/// and the `:` sequence operator. Operands are recycled to a common length.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation, unary plus and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context, the warning
/// side channel and the nesting limit.
pub mod core;

/// Function calls.
///
/// Expands `...`, prepares arguments through the call-site cache, evaluates
/// them and applies closures and builtins.
pub mod call;

/// Control flow: conditionals, loops and the short-circuit operators.
pub mod control;

/// Indexing with `[`, `[[`, `$` and `@`, and their update forms.
pub mod index;

/// Utility functions for evaluation.
///
/// Provides helpers for reading builtin arguments.
pub mod utils;

/// Builtin functions.
///
/// Declares the builtin table and the implementations it points at.
pub mod function;

/// Evaluation options.
pub mod options;

/// Warnings and the identifiers they are reported with.
pub mod warning;
