/// Complex number support.
///
/// Arithmetic, NA detection and formatting for the element type of complex
/// vectors.
pub mod complex;
/// The `Value` enum and the callable value types.
///
/// Everything the evaluator can bind to a name lives here: `NULL`, vectors,
/// closures, builtins, connections and foreign objects.
pub mod core;
/// Textual rendering of elements and vectors.
pub mod format;
/// Vector kinds and their promotion order.
pub mod kind;
/// NA sentinels and the three-valued logical element.
pub mod na;
/// Vector storage, strided sequences and attributes.
pub mod vector;

pub use self::{
    complex::ComplexNumber,
    core::Value,
    kind::Kind,
    na::{Logical, NA_INTEGER, NA_REAL, is_na_real},
    vector::{Attributes, Vector, VectorData},
};
