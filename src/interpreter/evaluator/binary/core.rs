use std::rc::Rc;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce_vector},
        evaluator::{
            binary::{arithmetic::arithmetic, comparison::compare, logic::logic, range::range},
            core::{Context, EvalResult},
            warning::WarningKind,
        },
        value::{Attributes, Kind, Value, Vector, VectorData},
    },
};

impl Context {
    /// Evaluates a binary operator on two values.
    ///
    /// Arithmetic, comparison and element-wise logic recycle the shorter
    /// operand; a length that does not divide the longer one raises a warning
    /// on the side channel. `&&` and `||` never reach this function: they
    /// are short-circuit nodes.
    ///
    /// # Example
    /// ```
    /// use statcore::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::{Value, VectorData}},
    /// };
    ///
    /// let mut ctx = Context::new();
    /// let x: Value = VectorData::Double(vec![1.0, 2.0, 3.0, 4.0]).into();
    /// let y: Value = VectorData::Double(vec![10.0, 20.0]).into();
    /// let sum = ctx.eval_binary(BinaryOperator::Add, &x, &y, 1).unwrap();
    /// assert_eq!(format!("{sum:?}"), "c(11, 22, 13, 24)");
    /// assert!(ctx.warnings().is_empty());
    /// ```
    pub fn eval_binary(&mut self,
                       op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, AndAnd, Div, Equal, Greater, GreaterEqual, IntDiv, Less, LessEqual, Mod,
            Mul, NotEqual, Or, OrOr, Pow, Range, Sub,
        };

        let mut warnings = Vec::new();
        let result = match op {
            Add | Sub | Mul | Div | Pow | Mod | IntDiv => {
                arithmetic(op, left, right, &mut warnings, line)?
            },
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
                compare(op, left, right, &mut warnings, line)?
            },
            And | Or => logic(op, left, right, &mut warnings, line)?,
            Range => range(left, right, line)?,
            AndAnd | OrOr => {
                return Err(RuntimeError::InvariantViolation { details: "short-circuit operator reached vector evaluation" });
            },
        };
        self.signal(warnings, line)?;
        Ok(result)
    }
}

/// Views an operand as a vector; `NULL` is an empty logical vector.
pub(super) fn operand(value: &Value, what: &str, line: usize) -> EvalResult<Rc<Vector>> {
    match value {
        Value::Null => Ok(Rc::new(Vector::empty(Kind::Logical))),
        Value::Vector(v) => Ok(Rc::clone(v)),
        _ => Err(RuntimeError::TypeError { details: what.to_string(),
                                           line }),
    }
}

/// Length of the result of an element-wise operation: zero when either side
/// is empty, else the longer length.
pub(super) fn recycled_length(left: usize, right: usize, warnings: &mut Vec<WarningKind>) -> usize {
    if left == 0 || right == 0 {
        return 0;
    }
    let (long, short) = if left >= right { (left, right) } else { (right, left) };
    if long % short != 0 {
        warnings.push(WarningKind::LengthNotMultiple);
    }
    long
}

/// Dense elements of `vector` converted to `kind`.
pub(super) fn dense(vector: &Vector, kind: Kind, line: usize) -> EvalResult<VectorData> {
    let converted =
        coerce_vector(vector, kind, PreservePolicy::NONE, &mut Vec::new()).map_err(|e| RuntimeError::coercion(e, line))?;
    Ok(converted.into_data().to_dense())
}

/// Applies `f` to recycled pairs of elements.
pub(super) fn zip_recycled<A, B, T>(a: &[A], b: &[B], n: usize, mut f: impl FnMut(&A, &B) -> T) -> Vec<T> {
    (0..n).map(|i| f(&a[i % a.len()], &b[i % b.len()])).collect()
}

/// Attributes of an element-wise result: those of the operands whose length
/// equals the result's, the left operand taking precedence.
pub(super) fn result_attributes(left: &Vector, right: &Vector, n: usize) -> Attributes {
    let mut attributes = Attributes::default();
    for side in [right, left] {
        if side.len() == n {
            for (name, value) in side.attributes().iter() {
                attributes.set(name, value.clone());
            }
        }
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycling_warns_on_uneven_lengths() {
        let mut warnings = Vec::new();
        assert_eq!(recycled_length(4, 2, &mut warnings), 4);
        assert!(warnings.is_empty());
        assert_eq!(recycled_length(3, 2, &mut warnings), 3);
        assert_eq!(warnings, vec![WarningKind::LengthNotMultiple]);
        assert_eq!(recycled_length(0, 5, &mut warnings), 0);
    }

    #[test]
    fn left_attributes_win() {
        let mut l = Vector::new(VectorData::Double(vec![1.0, 2.0]));
        l.set_names(Some(vec![Some("a".into()), Some("b".into())]));
        let mut r = Vector::new(VectorData::Double(vec![1.0, 2.0]));
        r.set_names(Some(vec![Some("x".into()), Some("y".into())]));
        let attributes = result_attributes(&l, &r, 2);
        let names = Vector::with_attributes(VectorData::Double(vec![0.0, 0.0]), attributes);
        assert_eq!(names.names().unwrap()[0].as_deref(), Some("a"));
    }
}
