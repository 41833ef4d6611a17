use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::{double_scalar, logical_scalar, string_scalar},
        evaluator::core::EvalResult,
        value::Value,
    },
    util::num::f64_to_count_checked,
};

/// Fails with [`RuntimeError::ArgumentMissing`] when a builtin argument was
/// not supplied.
pub fn required(value: Value, name: &str, line: usize) -> EvalResult<Value> {
    match value {
        Value::Missing => Err(RuntimeError::ArgumentMissing { name: name.to_string(),
                                                              line }),
        value => Ok(value),
    }
}

/// Reads a logical flag such as `na.rm`, falling back to `default` when the
/// argument is missing.
///
/// # Example
/// ```
/// use statcore::interpreter::{evaluator::utils::flag, value::Value};
///
/// assert!(flag(&Value::Missing, "na.rm", true, 1).unwrap());
/// assert!(!flag(&Value::logical(false), "na.rm", true, 1).unwrap());
/// assert!(flag(&Value::character("x"), "na.rm", true, 1).is_err());
/// ```
pub fn flag(value: &Value, name: &str, default: bool, line: usize) -> EvalResult<bool> {
    if matches!(value, Value::Missing) {
        return Ok(default);
    }
    logical_scalar(value).and_then(|l| l.to_bool())
                         .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("invalid '{name}' argument"),
                                                                        line })
}

/// The values collected by a `...` formal, in call order.
#[must_use]
pub fn varargs(value: Value) -> Vec<(Option<String>, Value)> {
    match value {
        Value::Varargs(values) => Rc::unwrap_or_clone(values),
        _ => Vec::new(),
    }
}

/// Reads a non-NA string argument.
pub fn string_arg(value: &Value, name: &str, line: usize) -> EvalResult<String> {
    string_scalar(value).flatten()
                        .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("invalid '{name}' argument"),
                                                                       line })
}

/// Reads a non-negative count such as a vector length.
pub fn count_arg(value: &Value, name: &str, line: usize) -> EvalResult<usize> {
    match double_scalar(value) {
        Some(d) => f64_to_count_checked(d, name, line),
        None => Err(RuntimeError::InvalidArgument { details: format!("invalid '{name}' argument"),
                                                    line }),
    }
}
