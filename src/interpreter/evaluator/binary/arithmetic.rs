use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::{dense, operand, recycled_length, result_attributes, zip_recycled},
            core::EvalResult,
            warning::WarningKind,
        },
        value::{
            ComplexNumber, Kind, NA_INTEGER, NA_REAL, Value, Vector, VectorData,
            complex::NA_COMPLEX,
            is_na_real,
        },
    },
};

const NON_NUMERIC: &str = "non-numeric argument to binary operator";

/// Element-wise `+ - * / ^ %% %/%`.
///
/// Logical operands count as integers. Integer `/` and `^` give doubles;
/// other integer results that overflow become NA with a warning.
pub fn arithmetic(op: BinaryOperator,
                  left: &Value,
                  right: &Value,
                  warnings: &mut Vec<WarningKind>,
                  line: usize)
                  -> EvalResult<Value> {
    let l = operand(left, NON_NUMERIC, line)?;
    let r = operand(right, NON_NUMERIC, line)?;
    if !l.kind().is_numeric() || !r.kind().is_numeric() {
        return Err(RuntimeError::TypeError { details: NON_NUMERIC.to_string(),
                                             line });
    }
    let mut kind = l.kind().max(r.kind()).max(Kind::Integer);
    if kind == Kind::Integer && matches!(op, BinaryOperator::Div | BinaryOperator::Pow) {
        kind = Kind::Double;
    }
    let n = recycled_length(l.len(), r.len(), warnings);
    let attributes = result_attributes(&l, &r, n);

    let data = match (dense(&l, kind, line)?, dense(&r, kind, line)?) {
        _ if n == 0 => VectorData::empty(kind),
        (VectorData::Integer(a), VectorData::Integer(b)) => {
            let mut overflow = false;
            let out = zip_recycled(&a, &b, n, |x, y| integer_op(op, *x, *y, &mut overflow));
            if overflow {
                warnings.push(WarningKind::IntegerOverflow);
            }
            VectorData::Integer(out)
        },
        (VectorData::Double(a), VectorData::Double(b)) => {
            VectorData::Double(zip_recycled(&a, &b, n, |x, y| double_op(op, *x, *y)))
        },
        (VectorData::Complex(a), VectorData::Complex(b)) => {
            if matches!(op, BinaryOperator::Mod | BinaryOperator::IntDiv) {
                return Err(RuntimeError::TypeError { details: "invalid operation on complex numbers".to_string(),
                                                     line });
            }
            VectorData::Complex(zip_recycled(&a, &b, n, |x, y| complex_op(op, *x, *y)))
        },
        _ => return Err(RuntimeError::InvariantViolation { details: "arithmetic operands of different kinds" }),
    };
    Ok(Vector::with_attributes(data, attributes).into())
}

/// Integer arithmetic with NA propagation. `%%` and `%/%` by zero give NA
/// without a warning; overflow sets `overflow`.
fn integer_op(op: BinaryOperator, a: i32, b: i32, overflow: &mut bool) -> i32 {
    if a == NA_INTEGER || b == NA_INTEGER {
        return NA_INTEGER;
    }
    let result = match op {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Sub => a.checked_sub(b),
        BinaryOperator::Mul => a.checked_mul(b),
        BinaryOperator::Mod => {
            if b == 0 {
                return NA_INTEGER;
            }
            return a.rem_euclid(b) + if b < 0 && a.rem_euclid(b) != 0 { b } else { 0 };
        },
        BinaryOperator::IntDiv => {
            if b == 0 {
                return NA_INTEGER;
            }
            return a.div_euclid(b) - i32::from(b < 0 && a.rem_euclid(b) != 0);
        },
        _ => return NA_INTEGER,
    };
    match result {
        Some(v) if v != NA_INTEGER => v,
        _ => {
            *overflow = true;
            NA_INTEGER
        },
    }
}

/// Double arithmetic. NA wins over NaN, except that `1 ^ y` and `x ^ 0`
/// are always 1.
fn double_op(op: BinaryOperator, a: f64, b: f64) -> f64 {
    if op == BinaryOperator::Pow && (a == 1.0 || b == 0.0) {
        return 1.0;
    }
    if is_na_real(a) || is_na_real(b) {
        return NA_REAL;
    }
    match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => a / b,
        BinaryOperator::Pow => a.powf(b),
        BinaryOperator::Mod => double_mod(a, b),
        BinaryOperator::IntDiv => (a / b).floor(),
        _ => NA_REAL,
    }
}

/// `%%` on doubles: the result has the sign of the divisor.
fn double_mod(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::NAN;
    }
    if b.is_infinite() && a.is_finite() {
        return if a == 0.0 || (a > 0.0) == (b > 0.0) { a } else { b };
    }
    let r = a - (a / b).floor() * b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
}

fn complex_op(op: BinaryOperator, a: ComplexNumber, b: ComplexNumber) -> ComplexNumber {
    if a.is_na() || b.is_na() {
        return NA_COMPLEX;
    }
    match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => a / b,
        BinaryOperator::Pow => a.pow(b),
        _ => NA_COMPLEX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_modulo_follows_divisor_sign() {
        let mut overflow = false;
        assert_eq!(integer_op(BinaryOperator::Mod, 5, 3, &mut overflow), 2);
        assert_eq!(integer_op(BinaryOperator::Mod, -5, 3, &mut overflow), 1);
        assert_eq!(integer_op(BinaryOperator::Mod, 5, -3, &mut overflow), -1);
        assert_eq!(integer_op(BinaryOperator::Mod, -5, -3, &mut overflow), -2);
        assert_eq!(integer_op(BinaryOperator::IntDiv, -5, 3, &mut overflow), -2);
        assert_eq!(integer_op(BinaryOperator::IntDiv, 5, -3, &mut overflow), -2);
        assert_eq!(integer_op(BinaryOperator::IntDiv, -5, -3, &mut overflow), 1);
        assert_eq!(integer_op(BinaryOperator::Mod, 5, 0, &mut overflow), NA_INTEGER);
        assert!(!overflow);
    }

    #[test]
    fn integer_overflow_is_na() {
        let mut overflow = false;
        assert_eq!(integer_op(BinaryOperator::Add, i32::MAX, 1, &mut overflow), NA_INTEGER);
        assert!(overflow);
    }

    #[test]
    fn double_modulo() {
        assert!((double_mod(5.5, 2.0) - 1.5).abs() < 1e-12);
        assert!((double_mod(-5.5, 2.0) - 0.5).abs() < 1e-12);
        assert!(double_mod(1.0, 0.0).is_nan());
        assert!((double_mod(5.0, f64::INFINITY) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn na_beats_nan_but_not_power_identities() {
        assert!(is_na_real(double_op(BinaryOperator::Add, NA_REAL, f64::NAN)));
        assert!((double_op(BinaryOperator::Pow, NA_REAL, 0.0) - 1.0).abs() < f64::EPSILON);
        assert!((double_op(BinaryOperator::Pow, 1.0, NA_REAL) - 1.0).abs() < f64::EPSILON);
    }
}
