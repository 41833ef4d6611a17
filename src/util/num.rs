use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Truncates a double towards zero, as numeric subscripts are read.
///
/// Returns `None` for NaN (and NA). Values beyond `±2^53` are clamped, which
/// is far outside any valid index.
///
/// ## Example
/// ```
/// use statcore::util::num::f64_to_position;
///
/// assert_eq!(f64_to_position(2.9), Some(2));
/// assert_eq!(f64_to_position(-1.5), Some(-1));
/// assert_eq!(f64_to_position(f64::NAN), None);
/// assert_eq!(f64_to_position(f64::INFINITY), Some(9_007_199_254_740_991));
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_position(value: f64) -> Option<i64> {
    if value.is_nan() {
        return None;
    }
    let clamped = value.trunc().clamp(-9_007_199_254_740_991.0, 9_007_199_254_740_991.0);
    Some(clamped as i64)
}

/// Converts a length to an R integer.
///
/// ## Errors
/// Returns `Err(RuntimeError::InvalidArgument)` when the length does not fit
/// in an `i32`, or collides with the integer NA.
pub fn usize_to_i32_checked(value: usize, line: usize) -> EvalResult<i32> {
    i32::try_from(value).map_err(|_| RuntimeError::InvalidArgument { details: format!("length {value} is too large for an integer"),
                                                                     line })
}

/// Converts a non-negative count argument to `usize`.
///
/// ## Errors
/// Returns `Err(RuntimeError::InvalidArgument)` for NaN, negative or
/// infinite values.
pub fn f64_to_count_checked(value: f64, what: &str, line: usize) -> EvalResult<usize> {
    let invalid = || RuntimeError::InvalidArgument { details: format!("invalid '{what}' argument"),
                                                     line };
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    f64_to_position(value).and_then(|v| usize::try_from(v).ok())
                          .filter(|v| i64::try_from(*v).is_ok_and(|v| v <= MAX_SAFE_I64_INT))
                          .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(f64_to_count_checked(3.7, "length", 1).unwrap(), 3);
        assert!(f64_to_count_checked(-1.0, "length", 1).is_err());
        assert!(f64_to_count_checked(f64::NAN, "length", 1).is_err());
    }

    #[test]
    fn integer_lengths() {
        assert_eq!(usize_to_i32_checked(5, 1).unwrap(), 5);
        assert!(usize_to_i32_checked(usize::MAX, 1).is_err());
    }
}
