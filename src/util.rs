/// Numeric conversion helpers.
///
/// This module provides the conversions between lengths, subscripts and the
/// numeric element types, checking for the cases where a silent cast would
/// lose data.
pub mod num;
