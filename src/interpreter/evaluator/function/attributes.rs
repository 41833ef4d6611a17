use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce},
        evaluator::{
            core::{Context, EvalResult},
            function::core::take,
            utils::{flag, required, string_arg},
        },
        value::{
            Kind, Logical, Value, Vector, VectorData,
            vector::{DIM, DIMNAMES, NAMES},
        },
    },
    util::num::usize_to_i32_checked,
};

/// `length(x)`.
pub fn length(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    let x = required(x, "x", line)?;
    Ok(Value::integer(usize_to_i32_checked(x.length(), line)?))
}

/// `names(x)`: the names attribute, or `NULL`.
pub fn names(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    let x = required(x, "x", line)?;
    Ok(x.as_vector().and_then(|v| v.attributes().get(NAMES).cloned()).unwrap_or(Value::Null))
}

/// `` `names<-`(x, value) ``.
///
/// Names shorter than `x` are padded with NA; `NULL` removes them.
pub fn set_names(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, value] = take(args)?;
    let x = required(x, "x", line)?;
    let value = required(value, "value", line)?;
    let mut vector = receiver(x, line)?;
    assign_attribute(ctx, &mut vector, NAMES, value, line)?;
    Ok(vector.into())
}

/// `dim(x)`.
pub fn dim(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    let x = required(x, "x", line)?;
    Ok(x.as_vector().and_then(|v| v.attributes().get(DIM).cloned()).unwrap_or(Value::Null))
}

/// `` `dim<-`(x, value) ``.
///
/// The product of the extents must equal the length of `x`. Setting `dim`
/// removes `names` and `dimnames`; `NULL` removes `dim`.
pub fn set_dim(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, value] = take(args)?;
    let x = required(x, "x", line)?;
    let value = required(value, "value", line)?;
    let mut vector = receiver(x, line)?;
    assign_attribute(ctx, &mut vector, DIM, value, line)?;
    Ok(vector.into())
}

/// `attr(x, which, exact = FALSE)`.
///
/// Without `exact`, a unique prefix of an attribute name selects it.
pub fn attr(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, which, exact] = take(args)?;
    let x = required(x, "x", line)?;
    let which = string_arg(&required(which, "which", line)?, "which", line)?;
    let exact = flag(&exact, "exact", false, line)?;
    let Some(vector) = x.as_vector() else {
        return Ok(Value::Null);
    };
    if let Some(value) = vector.attributes().get(&which) {
        return Ok(value.clone());
    }
    if exact {
        return Ok(Value::Null);
    }
    let mut candidates = vector.attributes().iter().filter(|(name, _)| name.starts_with(which.as_str()));
    Ok(match (candidates.next(), candidates.next()) {
        (Some((_, value)), None) => value.clone(),
        _ => Value::Null,
    })
}

/// `` `attr<-`(x, which, value) ``.
pub fn set_attr(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, which, value] = take(args)?;
    let x = required(x, "x", line)?;
    let which = string_arg(&required(which, "which", line)?, "which", line)?;
    let value = required(value, "value", line)?;
    let mut vector = receiver(x, line)?;
    assign_attribute(ctx, &mut vector, &which, value, line)?;
    Ok(vector.into())
}

/// Stores one attribute. `names`, `dim` and `dimnames` are checked against
/// the vector's shape whichever form wrote them; other names are stored
/// as given.
pub(crate) fn assign_attribute(ctx: &mut Context,
                               vector: &mut Vector,
                               name: &str,
                               value: Value,
                               line: usize)
                               -> EvalResult<()> {
    match name {
        NAMES => assign_names(ctx, vector, value, line),
        DIM => assign_dim(vector, &value, line),
        DIMNAMES => assign_dimnames(vector, value, line),
        _ => {
            vector.attributes_mut().set(name, value);
            Ok(())
        },
    }
}

fn assign_names(ctx: &mut Context, vector: &mut Vector, value: Value, line: usize) -> EvalResult<()> {
    if matches!(value, Value::Null) {
        vector.set_names(None);
        return Ok(());
    }
    let mut warnings = Vec::new();
    let names = coerce(&value, Kind::Character, PreservePolicy::NONE, &mut warnings)
        .map_err(|e| RuntimeError::coercion(e, line))?;
    ctx.signal(warnings, line)?;
    if names.len() > vector.len() {
        return Err(RuntimeError::InvalidArgument { details: format!("'names' attribute [{}] must be the same length as the vector [{}]",
                                                                    names.len(),
                                                                    vector.len()),
                                                   line });
    }
    let mut data = names.into_data().to_dense();
    data.extend_to(vector.len());
    match data {
        VectorData::Character(names) => vector.set_names(Some(names)),
        _ => return Err(RuntimeError::InvariantViolation { details: "names lost their kind" }),
    }
    Ok(())
}

fn assign_dim(vector: &mut Vector, value: &Value, line: usize) -> EvalResult<()> {
    if matches!(value, Value::Null) {
        vector.attributes_mut().set(DIM, Value::Null);
        vector.attributes_mut().set(DIMNAMES, Value::Null);
        return Ok(());
    }
    let dims = coerce(value, Kind::Integer, PreservePolicy::NONE, &mut Vec::new())
        .map_err(|e| RuntimeError::coercion(e, line))?;
    let extents = match dims.data().to_dense() {
        VectorData::Integer(d) if !d.is_empty() => d.iter().map(|x| usize::try_from(*x).ok()).collect::<Option<Vec<_>>>(),
        _ => None,
    };
    let Some(extents) = extents else {
        return Err(RuntimeError::InvalidArgument { details: "the dims contain missing or negative values".to_string(),
                                                   line });
    };
    let product = extents.iter().try_fold(1usize, |acc, x| acc.checked_mul(*x));
    if product != Some(vector.len()) {
        return Err(RuntimeError::IncorrectDimensions { line });
    }
    vector.set_names(None);
    vector.attributes_mut().set(DIMNAMES, Value::Null);
    vector.attributes_mut().set(DIM, Vector::new(dims.into_data()).into());
    Ok(())
}

/// `dimnames` must be a list with one entry per dimension, each `NULL` or
/// as long as its extent.
fn assign_dimnames(vector: &mut Vector, value: Value, line: usize) -> EvalResult<()> {
    if matches!(value, Value::Null) {
        vector.attributes_mut().set(DIMNAMES, Value::Null);
        return Ok(());
    }
    let Some(extents) = vector.dim() else {
        return Err(RuntimeError::InvalidArgument { details: "'dimnames' applied to non-array".to_string(),
                                                   line });
    };
    let fits = match value.as_vector().and_then(|v| v.elements()) {
        Some(entries) => {
            entries.len() == extents.len()
            && entries.iter()
                      .zip(&extents)
                      .all(|(entry, extent)| matches!(entry, Value::Null) || entry.length() == *extent)
        },
        None => false,
    };
    if !fits {
        return Err(RuntimeError::InvalidArgument { details: "length of 'dimnames' must match that of 'dims'".to_string(),
                                                   line });
    }
    vector.attributes_mut().set(DIMNAMES, value);
    Ok(())
}

/// `is.na(x)`: element-wise NA test, true for NaN as well. List elements
/// count when they are length-1 atomic NA.
pub fn is_na(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    let x = required(x, "x", line)?;
    let Some(vector) = x.as_vector() else {
        return Ok(Vector::empty(Kind::Logical).into());
    };
    let data = vector.data().to_dense();
    let flags: Vec<Logical> = match &data {
        VectorData::List(values) => {
            values.iter()
                  .map(|v| {
                      v.as_vector()
                       .is_some_and(|v| v.len() == 1 && v.kind() != Kind::List && v.data().has_na())
                       .into()
                  })
                  .collect()
        },
        VectorData::Double(values) => values.iter().map(|d| d.is_nan().into()).collect(),
        VectorData::Complex(values) => values.iter().map(|c| c.is_nan().into()).collect(),
        data => (0..data.len()).map(|i| data.select(&[Some(i)]).has_na().into()).collect(),
    };
    let mut result = Vector::new(VectorData::Logical(flags));
    for name in [NAMES, DIM, DIMNAMES] {
        if let Some(value) = vector.attributes().get(name) {
            result.attributes_mut().set(name, value.clone());
        }
    }
    Ok(result.into())
}

/// `is.null(x)`.
pub fn is_null(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    let x = required(x, "x", line)?;
    Ok(Value::logical(matches!(x, Value::Null)))
}

/// `typeof(x)`.
pub fn type_of(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    let x = required(x, "x", line)?;
    Ok(Value::character(x.type_name()))
}

/// `identical(x, y)`.
pub fn identical(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, y] = take(args)?;
    let x = required(x, "x", line)?;
    let y = required(y, "y", line)?;
    Ok(Value::logical(x.identical(&y)))
}

/// The vector an attribute update works on, copied only when shared.
fn receiver(x: Value, line: usize) -> EvalResult<Vector> {
    match x {
        Value::Vector(v) => Ok(Rc::unwrap_or_clone(v)),
        Value::Null => Ok(Vector::empty(Kind::Logical)),
        _ => Err(RuntimeError::TypeError { details: "attempt to set an attribute on a non-vector".to_string(),
                                           line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_padded_with_na() {
        let mut ctx = Context::new();
        let x: Value = VectorData::Double(vec![1.0, 2.0, 3.0]).into();
        let out = set_names(&mut ctx, vec![x, Value::character("a")], 1).unwrap();
        let names = out.as_vector().unwrap().names().unwrap().to_vec();
        assert_eq!(names, vec![Some("a".to_string()), None, None]);
    }

    #[test]
    fn dim_must_match_length() {
        let mut ctx = Context::new();
        let x: Value = VectorData::Double(vec![1.0, 2.0, 3.0]).into();
        let bad = set_dim(&mut ctx, vec![x.clone(), Value::integer(2)], 1);
        assert!(matches!(bad, Err(RuntimeError::IncorrectDimensions { .. })));
        let good = set_dim(&mut ctx, vec![x, VectorData::Integer(vec![3, 1]).into()], 1).unwrap();
        assert_eq!(good.as_vector().unwrap().dim(), Some(vec![3, 1]));
    }

    #[test]
    fn attr_matches_prefixes_unless_exact() {
        let mut ctx = Context::new();
        let x = set_attr(&mut ctx,
                         vec![Value::integer(1), Value::character("label"), Value::character("v")],
                         1).unwrap();
        let partial = attr(&mut ctx, vec![x.clone(), Value::character("lab"), Value::Missing], 1).unwrap();
        assert!(partial.identical(&Value::character("v")));
        let exact = attr(&mut ctx, vec![x, Value::character("lab"), Value::logical(true)], 1).unwrap();
        assert!(matches!(exact, Value::Null));
    }

    #[test]
    fn attr_checks_shape_attributes() {
        let mut ctx = Context::new();
        let x: Value = VectorData::Integer(vec![1, 2, 3]).into();
        let bad = set_attr(&mut ctx,
                           vec![x.clone(), Value::character("dim"), VectorData::Integer(vec![5, 5]).into()],
                           1);
        assert!(matches!(bad, Err(RuntimeError::IncorrectDimensions { .. })));

        let too_many = VectorData::Character(vec![Some("a".into()); 4]).into();
        let bad = set_attr(&mut ctx, vec![x.clone(), Value::character("names"), too_many], 1);
        assert!(matches!(bad, Err(RuntimeError::InvalidArgument { .. })));

        let labels = VectorData::List(vec![Value::Null, Value::character("only")]).into();
        let bad = set_attr(&mut ctx, vec![x, Value::character("dimnames"), labels], 1);
        assert!(matches!(bad, Err(RuntimeError::InvalidArgument { .. })));
    }
}
