use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::double_scalar,
        evaluator::core::EvalResult,
        value::{Value, Vector, is_na_real},
    },
    util::num::f64_to_count_checked,
};

/// `from:to`.
///
/// The result is a strided integer vector when `from` is integral and every
/// element fits in an integer, otherwise a strided double vector. The step
/// is `1` or `-1`.
///
/// # Example
/// ```
/// use statcore::interpreter::{evaluator::binary::range::range, value::{Kind, Value}};
///
/// let v = range(&Value::double(1.0), &Value::double(4.0), 1).unwrap();
/// assert_eq!(v.as_vector().unwrap().kind(), Kind::Integer);
/// assert_eq!(format!("{v:?}"), "c(1L, 2L, 3L, 4L)");
///
/// let v = range(&Value::double(1.5), &Value::double(-1.0), 1).unwrap();
/// assert_eq!(format!("{v:?}"), "c(1.5, 0.5, -0.5)");
/// ```
pub fn range(from: &Value, to: &Value, line: usize) -> EvalResult<Value> {
    let from = endpoint(from, line)?;
    let to = endpoint(to, line)?;
    let count = f64_to_count_checked((to - from).abs() + 1e-10, "length.out", line)? + 1;
    let ascending = from <= to;

    #[allow(clippy::cast_possible_truncation)]
    let start = from as i32;
    if f64::from(start) == from
       && let Some(sequence) = Vector::integer_sequence(start, if ascending { 1 } else { -1 }, count)
    {
        return Ok(sequence.into());
    }
    Ok(Vector::double_sequence(from, if ascending { 1.0 } else { -1.0 }, count).into())
}

fn endpoint(value: &Value, line: usize) -> EvalResult<f64> {
    match double_scalar(value) {
        None => Err(RuntimeError::InvalidArgument { details: "argument of length 0".to_string(),
                                                    line }),
        Some(d) if is_na_real(d) || d.is_nan() => {
            Err(RuntimeError::InvalidArgument { details: "NA/NaN argument".to_string(),
                                                line })
        },
        Some(d) => Ok(d),
    }
}
