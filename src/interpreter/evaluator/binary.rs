/// Operator dispatch and the recycling helpers shared by the element-wise
/// operators.
pub mod core;

/// Arithmetic operators.
///
/// Implements `+ - * / ^ %% %/%` over logical, integer, double and complex
/// vectors, with integer overflow turned into NA.
pub mod arithmetic;

/// Comparison operators.
pub mod comparison;

/// Element-wise `&` and `|`.
pub mod logic;

/// The `:` operator, which builds strided sequences.
pub mod range;
