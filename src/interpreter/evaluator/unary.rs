use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce_vector},
        evaluator::core::{Context, EvalResult},
        value::{Kind, Logical, NA_INTEGER, Value, Vector, VectorData, is_na_real},
    },
};

impl Context {
    /// Evaluates a unary operator on a value.
    ///
    /// - `Minus` and `Plus` work on logical, integer, double and complex
    ///   vectors; logical operands become integers.
    /// - `Not` gives a logical vector, comparing numbers with zero. On raw
    ///   vectors it flips the bits.
    ///
    /// Attributes of the operand are kept.
    ///
    /// # Example
    /// ```
    /// use statcore::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::{Value, VectorData}},
    /// };
    ///
    /// let ctx = Context::new();
    /// let v = ctx.eval_unary(UnaryOperator::Minus, &Value::logical(true), 1).unwrap();
    /// assert_eq!(format!("{v:?}"), "-1L");
    ///
    /// let x: Value = VectorData::Double(vec![0.0, 2.0]).into();
    /// let v = ctx.eval_unary(UnaryOperator::Not, &x, 1).unwrap();
    /// assert_eq!(format!("{v:?}"), "c(TRUE, FALSE)");
    /// ```
    pub fn eval_unary(&self, op: UnaryOperator, operand: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Minus | UnaryOperator::Plus => sign(op == UnaryOperator::Minus, operand, line),
            UnaryOperator::Not => not(operand, line),
        }
    }
}

fn sign(negate: bool, operand: &Value, line: usize) -> EvalResult<Value> {
    let Some(vector) = operand.as_vector().filter(|v| v.kind().is_numeric()) else {
        return Err(RuntimeError::TypeError { details: "invalid argument to unary operator".to_string(),
                                             line });
    };
    let kind = vector.kind().max(Kind::Integer);
    let converted =
        coerce_vector(vector, kind, PreservePolicy::ALL, &mut Vec::new()).map_err(|e| RuntimeError::coercion(e, line))?;
    if !negate {
        return Ok(converted.into());
    }
    let mut result = converted;
    result.update_data(|data| {
        *data = match data.to_dense() {
            VectorData::Integer(v) => {
                VectorData::Integer(v.into_iter().map(|i| if i == NA_INTEGER { i } else { -i }).collect())
            },
            VectorData::Double(v) => {
                VectorData::Double(v.into_iter().map(|d| if is_na_real(d) { d } else { -d }).collect())
            },
            VectorData::Complex(v) => VectorData::Complex(v.into_iter().map(|c| if c.is_na() { c } else { -c }).collect()),
            other => other,
        };
    });
    Ok(result.into())
}

fn not(operand: &Value, line: usize) -> EvalResult<Value> {
    let vector = match operand {
        Value::Null => return Ok(Vector::empty(Kind::Logical).into()),
        Value::Vector(v) => v,
        _ => {
            return Err(RuntimeError::TypeError { details: "invalid argument type".to_string(),
                                                 line });
        },
    };
    let data = match vector.data() {
        VectorData::Raw(bytes) => VectorData::Raw(bytes.iter().map(|b| !b).collect()),
        data if data.kind().is_numeric() => {
            let logical = coerce_vector(vector, Kind::Logical, PreservePolicy::NONE, &mut Vec::new())
                .map_err(|e| RuntimeError::coercion(e, line))?;
            match logical.into_data().to_dense() {
                VectorData::Logical(v) => VectorData::Logical(v.into_iter()
                                                               .map(|l| match l {
                                                                   Logical::Na => Logical::Na,
                                                                   Logical::True => Logical::False,
                                                                   Logical::False => Logical::True,
                                                               })
                                                               .collect()),
                _ => return Err(RuntimeError::InvariantViolation { details: "logical coercion lost its kind" }),
            }
        },
        _ => {
            return Err(RuntimeError::TypeError { details: "invalid argument type".to_string(),
                                                 line });
        },
    };
    Ok(Vector::with_attributes(data, vector.attributes().clone()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_keeps_na() {
        let x: Value = VectorData::Integer(vec![1, NA_INTEGER]).into();
        let v = sign(true, &x, 1).unwrap();
        assert!(v.identical(&VectorData::Integer(vec![-1, NA_INTEGER]).into()));
    }

    #[test]
    fn negating_character_fails() {
        assert!(matches!(sign(true, &Value::character("a"), 1), Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn not_flips_raw_bits() {
        let v = not(&VectorData::Raw(vec![0x0f]).into(), 1).unwrap();
        assert!(v.identical(&VectorData::Raw(vec![0xf0]).into()));
    }

    #[test]
    fn not_null_is_empty_logical() {
        let v = not(&Value::Null, 1).unwrap();
        assert!(v.identical(&Vector::empty(Kind::Logical).into()));
    }
}
