use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::{dense, operand, recycled_length, result_attributes, zip_recycled},
            core::EvalResult,
            warning::WarningKind,
        },
        value::{Kind, Logical, Value, Vector, VectorData},
    },
};

const INVALID: &str = "operations are possible only for numeric, logical or complex types";

/// Element-wise `&` and `|` with three-valued logic; on two raw vectors
/// they work bitwise.
pub fn logic(op: BinaryOperator,
             left: &Value,
             right: &Value,
             warnings: &mut Vec<WarningKind>,
             line: usize)
             -> EvalResult<Value> {
    let l = operand(left, INVALID, line)?;
    let r = operand(right, INVALID, line)?;
    let n = recycled_length(l.len(), r.len(), warnings);
    let attributes = result_attributes(&l, &r, n);

    if let (VectorData::Raw(a), VectorData::Raw(b)) = (l.data(), r.data()) {
        let out = zip_recycled(a, b, n, |x, y| if op == BinaryOperator::And { x & y } else { x | y });
        return Ok(Vector::with_attributes(VectorData::Raw(out), attributes).into());
    }
    for side in [&l, &r] {
        if !side.kind().is_numeric() && side.kind() != Kind::Raw {
            return Err(RuntimeError::TypeError { details: INVALID.to_string(),
                                                 line });
        }
    }
    let out = match (dense(&l, Kind::Logical, line)?, dense(&r, Kind::Logical, line)?) {
        (VectorData::Logical(a), VectorData::Logical(b)) => zip_recycled(&a, &b, n, |x, y| match op {
            BinaryOperator::And => x.and(*y),
            _ => x.or(*y),
        }),
        _ => Vec::<Logical>::new(),
    };
    Ok(Vector::with_attributes(VectorData::Logical(out), attributes).into())
}
