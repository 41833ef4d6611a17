/// The evaluator executes lowered nodes.
///
/// It owns the runtime context, walks the node graph, applies closures and
/// builtins and records warnings on the side channel.
///
/// # Responsibilities
/// - Evaluates nodes: constants, variables, calls, control flow, indexing
///   and replacement sequences.
/// - Applies vectorized operators and builtins.
/// - Reports runtime errors with the line of the failing expression.
pub mod evaluator;
/// The lexer turns source text into tokens.
///
/// Numbers, integer and imaginary literals, strings, identifiers,
/// backquoted names, keywords, operators and line breaks. Comments are
/// skipped; every token carries its line.
pub mod lexer;
/// The parser builds the surface syntax tree from tokens.
///
/// Recursive descent with one function per precedence level.
pub mod parser;
/// Lowering turns the syntax tree into executable nodes.
///
/// Operators become builtin calls, and complex assignments become the
/// five-step replacement sequence.
pub mod lowering;
/// The executable node graph.
pub mod node;
/// Argument matching and the per-call-site argument cache.
pub mod matcher;
/// Lexically scoped variable frames.
pub mod environment;
/// The coercion engine: conversions between vector kinds.
///
/// Every conversion in the language goes through here, with NA handling and
/// the warnings conversions raise.
pub mod coercion;
/// The reduction engine behind `sum`, `prod`, `min` and `max`.
pub mod reduction;
/// Connection and native-call capabilities supplied by embedders.
pub mod connection;
/// The value model.
///
/// `NULL`, vectors of every kind with their NA sentinels and attributes,
/// strided sequences, functions and foreign objects.
///
/// # Responsibilities
/// - Defines the `Value` enum and the vector storage behind it.
/// - Defines NA for every kind and the three-valued logical.
/// - Renders values for `print` and for debugging.
pub mod value;
