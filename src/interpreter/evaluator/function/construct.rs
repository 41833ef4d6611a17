use crate::{
    error::{CoercionError, RuntimeError},
    interpreter::{
        coercion::{PreservePolicy, coerce_vector},
        evaluator::{
            core::{Context, EvalResult},
            function::core::take,
            utils::{count_arg, required, string_arg, varargs},
            warning::WarningKind,
        },
        value::{Kind, Value, Vector, VectorData},
    },
};

/// Concatenates values with `c()` semantics.
///
/// `NULL` arguments vanish. The result kind is the highest kind among the
/// arguments, a list as soon as one argument is a list or not a vector.
/// Names come from argument tags and from the elements' own names: a tagged
/// vector of length one takes the tag, a longer one gets `tag1`, `tag2`, ...
/// or `tag.name` where the element is named.
///
/// # Example
/// ```
/// use statcore::interpreter::{evaluator::function::construct::combine, value::Value};
///
/// let v = combine(vec![(None, Value::integer(1)), (Some("b".into()), Value::double(2.0))],
///                 &mut Vec::new()).unwrap();
/// assert_eq!(format!("{v:?}"), "c(1, 2)");
/// assert_eq!(v.as_vector().unwrap().names().unwrap()[1].as_deref(), Some("b"));
/// ```
pub fn combine(values: Vec<(Option<String>, Value)>,
               warnings: &mut Vec<WarningKind>)
               -> Result<Value, CoercionError> {
    let values: Vec<_> = values.into_iter().filter(|(_, v)| !matches!(v, Value::Null)).collect();
    if values.is_empty() {
        return Ok(Value::Null);
    }
    let kind = values.iter()
                     .map(|(_, v)| match v {
                         Value::Vector(v) => v.kind(),
                         _ => Kind::List,
                     })
                     .max()
                     .unwrap_or(Kind::Logical);
    let named = values.iter()
                      .any(|(tag, v)| tag.is_some() || v.as_vector().is_some_and(|v| v.names().is_some()));

    let mut data = VectorData::empty(kind);
    let mut names = Vec::new();
    for (tag, value) in values {
        let part = match &value {
            Value::Vector(v) => coerce_vector(v, kind, PreservePolicy::NONE, warnings)?.into_data(),
            other => VectorData::List(vec![other.clone()]),
        };
        if named {
            let inner = value.as_vector().and_then(|v| v.names().map(<[Option<String>]>::to_vec));
            names.extend(element_names(tag.as_deref(), inner.as_deref(), part.len()));
        }
        data.append(part);
    }
    let mut vector = Vector::new(data);
    if named {
        vector.set_names(Some(names));
    }
    Ok(vector.into())
}

fn element_names(tag: Option<&str>, inner: Option<&[Option<String>]>, len: usize) -> Vec<Option<String>> {
    (0..len).map(|i| {
                let own = inner.and_then(|n| n.get(i).cloned().flatten()).filter(|n| !n.is_empty());
                Some(match (tag, own) {
                    (Some(tag), Some(own)) => format!("{tag}.{own}"),
                    (Some(tag), None) if len == 1 => tag.to_string(),
                    (Some(tag), None) => format!("{tag}{}", i + 1),
                    (None, own) => own.unwrap_or_default(),
                })
            })
            .collect()
}

/// `c(...)`.
pub fn c(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [dots] = take(args)?;
    let mut warnings = Vec::new();
    let result = combine(varargs(dots), &mut warnings).map_err(|e| RuntimeError::coercion(e, line))?;
    ctx.signal(warnings, line)?;
    Ok(result)
}

/// `list(...)`: a list of the arguments, named by their tags.
pub fn list(_: &mut Context, args: Vec<Value>, _: usize) -> EvalResult<Value> {
    let [dots] = take(args)?;
    let entries = varargs(dots);
    let named = entries.iter().any(|(tag, _)| tag.is_some());
    let (names, values): (Vec<_>, Vec<_>) = entries.into_iter().map(|(tag, v)| (Some(tag.unwrap_or_default()), v)).unzip();
    let mut vector = Vector::new(VectorData::List(values));
    if named {
        vector.set_names(Some(names));
    }
    Ok(vector.into())
}

/// `vector(mode = "logical", length = 0)`.
pub fn vector(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [mode, length] = take(args)?;
    let mode = match mode {
        Value::Missing => "logical".to_string(),
        mode => string_arg(&mode, "mode", line)?,
    };
    let Some(kind) = Kind::from_mode(&mode) else {
        return Err(RuntimeError::InvalidArgument { details: format!("vector: cannot make a vector of mode '{mode}'"),
                                                   line });
    };
    zeroed(kind, &length, "length", line)
}

fn zeroed(kind: Kind, length: &Value, name: &str, line: usize) -> EvalResult<Value> {
    let len = match length {
        Value::Missing => 0,
        length => count_arg(length, name, line)?,
    };
    Ok(Vector::new(VectorData::zeroed(kind, len)).into())
}

/// `logical(length = 0)`.
pub fn logical(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [length] = take(args)?;
    zeroed(Kind::Logical, &length, "length", line)
}

/// `integer(length = 0)`.
pub fn integer(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [length] = take(args)?;
    zeroed(Kind::Integer, &length, "length", line)
}

/// `double(length = 0)`, also bound as `numeric`.
pub fn double(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [length] = take(args)?;
    zeroed(Kind::Double, &length, "length", line)
}

/// `complex(length.out = 0)`.
pub fn complex(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [length] = take(args)?;
    zeroed(Kind::Complex, &length, "length.out", line)
}

/// `character(length = 0)`.
pub fn character(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [length] = take(args)?;
    zeroed(Kind::Character, &length, "length", line)
}

/// `raw(length = 0)`.
pub fn raw(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [length] = take(args)?;
    zeroed(Kind::Raw, &length, "length", line)
}

/// `seq_len(length.out)`: the strided sequence `1, 2, ..., n`.
pub fn seq_len(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [length] = take(args)?;
    let length = required(length, "length.out", line)?;
    let n = count_arg(&length, "length.out", line)?;
    Ok(Vector::integer_sequence(1, 1, n).unwrap_or_else(|| Vector::double_sequence(1.0, 1.0, n))
                                        .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_name_elements() {
        let v: Value = VectorData::Integer(vec![1, 2]).into();
        let out = combine(vec![(Some("a".into()), v), (None, Value::integer(3))], &mut Vec::new()).unwrap();
        let names = out.as_vector().unwrap().names().unwrap().to_vec();
        assert_eq!(names, vec![Some("a1".to_string()), Some("a2".to_string()), Some(String::new())]);
    }

    #[test]
    fn null_vanishes_and_empty_is_null() {
        assert!(matches!(combine(vec![(None, Value::Null)], &mut Vec::new()).unwrap(), Value::Null));
        let out = combine(vec![(None, Value::Null), (None, Value::logical(true))], &mut Vec::new()).unwrap();
        assert!(out.identical(&Value::logical(true)));
    }

    #[test]
    fn promotes_to_highest_kind() {
        let out = combine(vec![(None, Value::logical(true)), (None, Value::character("x"))], &mut Vec::new()).unwrap();
        assert_eq!(out.as_vector().unwrap().kind(), Kind::Character);
    }
}
