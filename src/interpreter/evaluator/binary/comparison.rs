use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::{dense, operand, recycled_length, result_attributes, zip_recycled},
            core::EvalResult,
            warning::WarningKind,
        },
        value::{Kind, Logical, Value, Vector, VectorData, is_na_real},
    },
};

/// Element-wise `== != < <= > >=`.
///
/// Operands are compared in their common kind. Strings compare by bytes;
/// complex numbers support only equality. NA and NaN elements give NA.
///
/// # Errors
/// `TypeError` for lists and functions, and for ordering comparisons of
/// complex numbers.
pub fn compare(op: BinaryOperator,
               left: &Value,
               right: &Value,
               warnings: &mut Vec<WarningKind>,
               line: usize)
               -> EvalResult<Value> {
    let invalid = format!("comparison ({op}) is possible only for atomic types");
    let l = operand(left, &invalid, line)?;
    let r = operand(right, &invalid, line)?;
    if l.kind() == Kind::List || r.kind() == Kind::List {
        return Err(RuntimeError::TypeError { details: invalid,
                                             line });
    }
    let n = recycled_length(l.len(), r.len(), warnings);
    let attributes = result_attributes(&l, &r, n);
    let kind = l.kind().max(r.kind());

    let out: Vec<Logical> = if n == 0 {
        Vec::new()
    } else {
        match kind {
            Kind::Character => match (dense(&l, kind, line)?, dense(&r, kind, line)?) {
                (VectorData::Character(a), VectorData::Character(b)) => {
                    zip_recycled(&a, &b, n, |x, y| match (x, y) {
                        (Some(x), Some(y)) => holds(op, x.as_str().cmp(y.as_str())),
                        _ => Logical::Na,
                    })
                },
                _ => return Err(RuntimeError::InvariantViolation { details: "character comparison lost its kind" }),
            },
            Kind::Complex => {
                if !matches!(op, BinaryOperator::Equal | BinaryOperator::NotEqual) {
                    return Err(RuntimeError::TypeError { details: "invalid comparison with complex values".to_string(),
                                                         line });
                }
                match (dense(&l, kind, line)?, dense(&r, kind, line)?) {
                    (VectorData::Complex(a), VectorData::Complex(b)) => zip_recycled(&a, &b, n, |x, y| {
                        if x.is_na() || y.is_na() || x.is_nan() || y.is_nan() {
                            Logical::Na
                        } else {
                            ((x == y) == (op == BinaryOperator::Equal)).into()
                        }
                    }),
                    _ => return Err(RuntimeError::InvariantViolation { details: "complex comparison lost its kind" }),
                }
            },
            _ => match (dense(&l, Kind::Double, line)?, dense(&r, Kind::Double, line)?) {
                (VectorData::Double(a), VectorData::Double(b)) => zip_recycled(&a, &b, n, |x, y| {
                    if is_na_real(*x) || is_na_real(*y) {
                        return Logical::Na;
                    }
                    x.partial_cmp(y).map_or(Logical::Na, |ordering| holds(op, ordering))
                }),
                _ => return Err(RuntimeError::InvariantViolation { details: "numeric comparison lost its kind" }),
            },
        }
    };
    Ok(Vector::with_attributes(VectorData::Logical(out), attributes).into())
}

fn holds(op: BinaryOperator, ordering: Ordering) -> Logical {
    let result = match op {
        BinaryOperator::Equal => ordering == Ordering::Equal,
        BinaryOperator::NotEqual => ordering != Ordering::Equal,
        BinaryOperator::Less => ordering == Ordering::Less,
        BinaryOperator::LessEqual => ordering != Ordering::Greater,
        BinaryOperator::Greater => ordering == Ordering::Greater,
        BinaryOperator::GreaterEqual => ordering != Ordering::Less,
        _ => return Logical::Na,
    };
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Value {
        VectorData::Character(v.iter().map(|s| Some((*s).to_string())).collect()).into()
    }

    #[test]
    fn strings_compare_by_bytes() {
        let out = compare(BinaryOperator::Less, &strings(&["B", "a"]), &strings(&["a", "b"]), &mut Vec::new(), 1)
            .unwrap();
        assert!(out.identical(&VectorData::Logical(vec![Logical::True, Logical::True]).into()));
    }

    #[test]
    fn nan_compares_as_na() {
        let out = compare(BinaryOperator::Equal, &Value::double(f64::NAN), &Value::double(1.0), &mut Vec::new(), 1)
            .unwrap();
        assert!(out.identical(&VectorData::Logical(vec![Logical::Na]).into()));
    }

    #[test]
    fn mixed_kinds_use_common_kind() {
        let out = compare(BinaryOperator::Equal, &Value::integer(1), &Value::character("1"), &mut Vec::new(), 1)
            .unwrap();
        assert!(out.identical(&Value::logical(true)));
    }
}
