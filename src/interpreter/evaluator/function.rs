/// The builtin table and its installation into the base environment.
///
/// Every builtin is declared once, with its formal parameters, in the
/// `builtin_functions!` table.
pub mod core;

/// Operator builtins: `+`, `-`, comparisons, `&`, `|`, `!` and `:`.
///
/// Lowering turns every operator expression into a call of one of these.
pub mod operators;

/// Vector constructors: `c`, `list`, `vector`, `seq_len` and the
/// per-kind constructors.
pub mod construct;

/// Attribute access and predicates.
///
/// `length`, `names`, `dim`, `attr` and their replacement forms, plus
/// `is.na`, `is.null`, `typeof` and `identical`.
pub mod attributes;

/// The `as.*` conversions, built on the coercion engine.
pub mod coerce;

/// `sum`, `prod`, `min` and `max`, built on the reduction engine.
pub mod reduce;

/// Conditions and options: `stop`, `warning`, `stopifnot`, `options`.
pub mod conditions;

/// Function application: `return`, `invisible`, `do.call`, `lapply`.
pub mod apply;

/// Connections, printing and `.Call`.
///
/// Output goes through the context's standard output connection, so
/// embedders can capture it.
pub mod io;
