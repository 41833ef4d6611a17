use std::rc::Rc;

use crate::{
    ast::{FieldKind, IndexKind},
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce_vector},
        environment::Environment,
        evaluator::{
            core::{Context, EvalResult},
            function::attributes::assign_attribute,
            utils::flag,
            warning::WarningKind,
        },
        node::{Node, Position},
        value::{
            Kind, NA_INTEGER, Value, Vector, VectorData,
            vector::{CLASS, DIM},
        },
    },
    util::num::{f64_to_position, usize_to_i32_checked},
};

/// One axis of a subscript after resolution.
#[derive(Debug, Default)]
struct Resolved {
    /// Zero-based element indices; `None` selects NA.
    indices:   Vec<Option<usize>>,
    /// Names of elements appended by character subscripts, by index.
    new_names: Vec<(usize, String)>,
}

impl Context {
    pub(crate) fn eval_access_vector(&mut self,
                                     vector: &Node,
                                     positions: &[Position],
                                     drop: Option<&Node>,
                                     exact: Option<&Node>,
                                     kind: IndexKind,
                                     env: &Environment,
                                     line: usize)
                                     -> EvalResult<Value> {
        let object = self.eval(vector, env)?;
        let positions = self.eval_positions(positions, env)?;
        match kind {
            IndexKind::Subset => {
                let drop = match drop {
                    Some(node) => flag(&self.eval(node, env)?, "drop", true, line)?,
                    None => true,
                };
                subset(&object, &positions, drop, line)
            },
            IndexKind::Element => {
                let exact = match exact {
                    Some(node) => flag(&self.eval(node, env)?, "exact", true, line)?,
                    None => true,
                };
                element(&object, &positions, exact, line)
            },
        }
    }

    pub(crate) fn eval_update_vector(&mut self,
                                     vector: &Node,
                                     positions: &[Position],
                                     value: &Node,
                                     kind: IndexKind,
                                     env: &Environment,
                                     line: usize)
                                     -> EvalResult<Value> {
        let object = self.eval(vector, env)?;
        let positions = self.eval_positions(positions, env)?;
        let value = self.eval(value, env)?;
        let mut warnings = Vec::new();
        let updated = match kind {
            IndexKind::Subset => assign_subset(object, &positions, value, &mut warnings, line)?,
            IndexKind::Element => assign_element(object, &positions, value, &mut warnings, line)?,
        };
        self.signal(warnings, line)?;
        Ok(updated)
    }

    fn eval_positions(&mut self, positions: &[Position], env: &Environment) -> EvalResult<Vec<Option<Value>>> {
        positions.iter()
                 .map(|p| p.node.as_ref().map(|node| self.eval(node, env)).transpose())
                 .collect()
    }

    /// `x$name` and `x@name`.
    pub(crate) fn access_field(&mut self,
                               object: &Value,
                               name: &str,
                               kind: FieldKind,
                               line: usize)
                               -> EvalResult<Value> {
        match kind {
            FieldKind::Dollar => match object {
                Value::Null => Ok(Value::Null),
                Value::Vector(v) if v.kind() == Kind::List => {
                    let found = v.names().and_then(|names| find_name(names, name, false));
                    Ok(match (found, v.elements()) {
                        (Some(i), Some(elements)) => elements[i].clone(),
                        _ => Value::Null,
                    })
                },
                Value::Vector(_) => Err(RuntimeError::TypeError { details: "$ operator is invalid for atomic vectors".to_string(),
                                                                  line }),
                other => Err(not_subsettable(other, line)),
            },
            FieldKind::Slot => match object {
                Value::Vector(v) => v.attributes().get(name).cloned().ok_or_else(|| no_slot(object, name, line)),
                other => Err(no_slot(other, name, line)),
            },
        }
    }

    /// The value of `x$name <- value` and `x@name <- value`.
    pub(crate) fn update_field(&mut self,
                               object: Value,
                               name: &str,
                               value: Value,
                               kind: FieldKind,
                               line: usize)
                               -> EvalResult<Value> {
        match kind {
            FieldKind::Dollar => {
                let mut list = match object {
                    Value::Null => Vector::empty(Kind::List),
                    Value::Vector(v) if v.kind() == Kind::List => Rc::unwrap_or_clone(v),
                    Value::Vector(v) => {
                        self.signal_one(WarningKind::CoercingLhsToList, line)?;
                        let policy = PreservePolicy { names: true,
                                                      ..PreservePolicy::NONE };
                        coerce_vector(&v, Kind::List, policy, &mut Vec::new()).map_err(|e| {
                                                                                   RuntimeError::coercion(e, line)
                                                                               })?
                    },
                    other => return Err(not_subsettable(&other, line)),
                };
                let existing = list.names().and_then(|names| find_name(names, name, true));
                match (existing, value) {
                    (Some(i), Value::Null) => remove_elements(&mut list, &[i]),
                    (None, Value::Null) => {},
                    (Some(i), value) => set_list_element(&mut list, i, value),
                    (None, value) => {
                        let index = list.len();
                        set_list_element(&mut list, index, value);
                        set_name(&mut list, index, name);
                    },
                }
                Ok(list.into())
            },
            FieldKind::Slot => match object {
                Value::Vector(v) => {
                    let mut v = Rc::unwrap_or_clone(v);
                    assign_attribute(self, &mut v, name, value, line)?;
                    Ok(v.into())
                },
                other => Err(no_slot(&other, name, line)),
            },
        }
    }
}

fn not_subsettable(value: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeError { details: format!("object of type '{}' is not subsettable", value.type_name()),
                              line }
}

/// Objects with a `class` attribute report their class, others their type.
fn no_slot(object: &Value, name: &str, line: usize) -> RuntimeError {
    let class = object.as_vector()
                      .and_then(|v| v.attributes().get(CLASS))
                      .and_then(|c| c.as_vector().and_then(|v| v.strings()).and_then(|s| s.first().cloned()))
                      .flatten();
    let details = match class {
        Some(class) => format!("no slot of name \"{name}\" for this object of class \"{class}\""),
        None => format!("cannot get a slot (\"{name}\") from an object of type \"{}\"", object.type_name()),
    };
    RuntimeError::InvalidArgument { details, line }
}

/// Finds `name` among element names: exactly, or when `exact` is `false`
/// by unique prefix.
fn find_name(names: &[Option<String>], name: &str, exact: bool) -> Option<usize> {
    if let Some(i) = names.iter().position(|n| n.as_deref() == Some(name)) {
        return Some(i);
    }
    if exact {
        return None;
    }
    let mut matches = names.iter()
                           .enumerate()
                           .filter(|(_, n)| n.as_deref().is_some_and(|n| n.starts_with(name)));
    match (matches.next(), matches.next()) {
        (Some((i, _)), None) => Some(i),
        _ => None,
    }
}

/// Resolves one subscript against an axis of `extent` elements.
///
/// With `grow`, character subscripts that match no name are given indices
/// past the end and reported in `new_names`.
fn resolve(position: Option<&Value>,
           extent: usize,
           names: Option<&[Option<String>]>,
           grow: bool,
           line: usize)
           -> EvalResult<Resolved> {
    let Some(position) = position else {
        return Ok(Resolved { indices:   (0..extent).map(Some).collect(),
                             new_names: Vec::new(), });
    };
    let vector = match position {
        Value::Null => return Ok(Resolved::default()),
        Value::Vector(v) => v,
        other => {
            return Err(RuntimeError::TypeError { details: format!("invalid subscript type '{}'", other.type_name()),
                                                 line });
        },
    };
    match vector.data() {
        VectorData::Logical(mask) => {
            if mask.is_empty() {
                return Ok(Resolved::default());
            }
            let n = extent.max(mask.len());
            let indices = (0..n).filter_map(|i| match mask[i % mask.len()].to_bool() {
                                    Some(true) => Some(Some(i)),
                                    Some(false) => None,
                                    None => Some(None),
                                })
                                .collect();
            Ok(Resolved { indices,
                          new_names: Vec::new() })
        },
        VectorData::Character(strings) => {
            let mut resolved = Resolved::default();
            for s in strings {
                let Some(s) = s else {
                    resolved.indices.push(None);
                    continue;
                };
                let found = names.and_then(|names| names.iter().position(|n| n.as_deref() == Some(s)));
                let appended = resolved.new_names.iter().find(|(_, n)| n == s).map(|(i, _)| *i);
                match (found, appended) {
                    (Some(i), _) | (None, Some(i)) => resolved.indices.push(Some(i)),
                    (None, None) if grow => {
                        let index = extent + resolved.new_names.len();
                        resolved.new_names.push((index, s.clone()));
                        resolved.indices.push(Some(index));
                    },
                    (None, None) => resolved.indices.push(None),
                }
            }
            Ok(resolved)
        },
        VectorData::Integer(_)
        | VectorData::Double(_)
        | VectorData::IntegerSequence { .. }
        | VectorData::DoubleSequence { .. } => {
            let values = numeric_positions(vector.data());
            Ok(Resolved { indices:   numeric_indices(&values, extent, line)?,
                          new_names: Vec::new(), })
        },
        VectorData::Complex(_) | VectorData::Raw(_) | VectorData::List(_) => {
            Err(RuntimeError::TypeError { details: format!("invalid subscript type '{}'", vector.kind()),
                                          line })
        },
    }
}

/// Numeric subscripts truncated towards zero; `None` for NA.
fn numeric_positions(data: &VectorData) -> Vec<Option<i64>> {
    match data.to_dense() {
        VectorData::Integer(v) => {
            v.iter().map(|i| (*i != NA_INTEGER).then_some(i64::from(*i))).collect()
        },
        VectorData::Double(v) => v.iter().map(|d| f64_to_position(*d)).collect(),
        _ => Vec::new(),
    }
}

/// Positive subscripts select (zeros are dropped); negative ones exclude.
fn numeric_indices(values: &[Option<i64>], extent: usize, line: usize) -> EvalResult<Vec<Option<usize>>> {
    let negative = values.iter().any(|v| v.is_some_and(|k| k < 0));
    if negative {
        if values.iter().any(|v| v.is_none_or(|k| k > 0)) {
            return Err(RuntimeError::InvalidArgument { details: "can't mix positive and negative subscripts".to_string(),
                                                       line });
        }
        let mut keep = vec![true; extent];
        for k in values.iter().flatten() {
            if let Ok(i) = usize::try_from(-k - 1)
               && i < extent
            {
                keep[i] = false;
            }
        }
        return Ok((0..extent).filter(|i| keep[*i]).map(Some).collect());
    }
    Ok(values.iter()
             .filter(|v| **v != Some(0))
             .map(|v| v.and_then(|k| usize::try_from(k - 1).ok()))
             .collect())
}

/// `x[...]`.
fn subset(object: &Value, positions: &[Option<Value>], drop: bool, line: usize) -> EvalResult<Value> {
    let vector = match object {
        Value::Null => return Ok(Value::Null),
        Value::Vector(v) => v,
        other => return Err(not_subsettable(other, line)),
    };
    match positions.len() {
        0 => Ok(object.clone()),
        1 => {
            let names = vector.names();
            let resolved = resolve(positions[0].as_ref(), vector.len(), names, false, line)?;
            let mut out = Vector::new(vector.data().select(&resolved.indices));
            if let Some(names) = names {
                out.set_names(Some(resolved.indices
                                           .iter()
                                           .map(|i| i.and_then(|i| names.get(i).cloned().flatten()))
                                           .collect()));
            }
            Ok(out.into())
        },
        _ => {
            let dim = matching_dim(vector, positions.len(), line)?;
            let axes = resolve_axes(positions, &dim, line)?;
            let indices = linear_indices(&axes, &dim);
            let mut out = Vector::new(vector.data().select(&indices));
            let extents: Vec<usize> = axes.iter().map(Vec::len).collect();
            let kept: Vec<usize> = if drop {
                extents.iter().copied().filter(|e| *e != 1).collect()
            } else {
                extents
            };
            if kept.len() > 1 || !drop {
                out.attributes_mut().set(DIM, dim_value(&kept, line)?);
            }
            Ok(out.into())
        },
    }
}

fn matching_dim(vector: &Vector, count: usize, line: usize) -> EvalResult<Vec<usize>> {
    match vector.dim() {
        Some(dim) if dim.len() == count => Ok(dim),
        _ => Err(RuntimeError::IncorrectDimensions { line }),
    }
}

fn resolve_axes(positions: &[Option<Value>], dim: &[usize], line: usize) -> EvalResult<Vec<Vec<Option<usize>>>> {
    positions.iter()
             .zip(dim)
             .map(|(position, extent)| {
                 let resolved = resolve(position.as_ref(), *extent, None, false, line)?;
                 if resolved.indices.iter().flatten().any(|i| i >= extent) {
                     return Err(RuntimeError::SubscriptOutOfBounds { line });
                 }
                 Ok(resolved.indices)
             })
             .collect()
}

/// Column-major linear indices of the cartesian product of `axes`.
fn linear_indices(axes: &[Vec<Option<usize>>], dim: &[usize]) -> Vec<Option<usize>> {
    let total: usize = axes.iter().map(Vec::len).product();
    (0..total).map(|flat| {
                  let mut rest = flat;
                  let mut offset = 0;
                  let mut stride = 1;
                  for (axis, extent) in axes.iter().zip(dim) {
                      let coordinate = rest % axis.len();
                      rest /= axis.len();
                      offset += axis[coordinate]? * stride;
                      stride *= extent;
                  }
                  Some(offset)
              })
              .collect()
}

fn dim_value(extents: &[usize], line: usize) -> EvalResult<Value> {
    let dims = extents.iter()
                      .map(|e| usize_to_i32_checked(*e, line))
                      .collect::<EvalResult<Vec<_>>>()?;
    Ok(VectorData::Integer(dims).into())
}

/// `x[[...]]`.
fn element(object: &Value, positions: &[Option<Value>], exact: bool, line: usize) -> EvalResult<Value> {
    let vector = match object {
        Value::Null => return Ok(Value::Null),
        Value::Vector(v) => v,
        other => return Err(not_subsettable(other, line)),
    };
    let index = match positions {
        [] => {
            return Err(RuntimeError::InvalidArgument { details: "invalid subscript".to_string(),
                                                       line });
        },
        [position] => single_index(position.as_ref(), vector, exact, line)?,
        _ => {
            let dim = matching_dim(vector, positions.len(), line)?;
            let axes = resolve_axes(positions, &dim, line)?;
            if axes.iter().any(|a| a.len() != 1) {
                return Err(RuntimeError::SubscriptOutOfBounds { line });
            }
            linear_indices(&axes, &dim).first().copied().flatten()
        },
    };
    match (index, vector.data()) {
        (None, VectorData::List(_)) => Ok(Value::Null),
        (Some(i), VectorData::List(elements)) => {
            elements.get(i).cloned().ok_or(RuntimeError::SubscriptOutOfBounds { line })
        },
        (Some(i), data) if i < data.len() => Ok(data.select(&[Some(i)]).into()),
        _ => Err(RuntimeError::SubscriptOutOfBounds { line }),
    }
}

/// The single element a `[[` subscript names, `None` when a name matches
/// nothing.
fn single_index(position: Option<&Value>, vector: &Vector, exact: bool, line: usize) -> EvalResult<Option<usize>> {
    let subscript = match position {
        Some(Value::Vector(v)) => v,
        _ => {
            return Err(RuntimeError::InvalidArgument { details: "invalid subscript".to_string(),
                                                       line });
        },
    };
    match subscript.len() {
        1 => {},
        0 => {
            return Err(RuntimeError::InvalidArgument { details: "attempt to select less than one element".to_string(),
                                                       line });
        },
        _ => {
            return Err(RuntimeError::InvalidArgument { details: "attempt to select more than one element".to_string(),
                                                       line });
        },
    }
    match subscript.data() {
        VectorData::Character(s) => {
            Ok(s[0].as_deref().and_then(|s| vector.names().and_then(|names| find_name(names, s, exact))))
        },
        VectorData::Logical(l) => match l[0].to_bool() {
            Some(true) => Ok(Some(0)),
            _ => Err(RuntimeError::SubscriptOutOfBounds { line }),
        },
        data => match numeric_positions(data).first().copied().flatten() {
            Some(k) if k >= 1 => Ok(usize::try_from(k - 1).ok()),
            _ => Err(RuntimeError::SubscriptOutOfBounds { line }),
        },
    }
}

/// Turns the object of an update into an owned vector; `NULL` becomes an
/// empty vector of `kind`.
fn owned_target(object: Value, kind: Kind, line: usize) -> EvalResult<Vector> {
    match object {
        Value::Null => Ok(Vector::empty(kind)),
        Value::Vector(v) => Ok(Rc::unwrap_or_clone(v)),
        other => Err(not_subsettable(&other, line)),
    }
}

/// Brings target and source to their common kind.
fn unify(target: Vector,
         source: &Vector,
         warnings: &mut Vec<WarningKind>,
         line: usize)
         -> EvalResult<(Vector, Vector)> {
    let kind = target.kind().max(source.kind());
    let target = if target.kind() == kind {
        target
    } else {
        coerce_vector(&target, kind, PreservePolicy::ALL, warnings).map_err(|e| RuntimeError::coercion(e, line))?
    };
    let source = coerce_vector(source, kind, PreservePolicy::NONE, warnings).map_err(|e| RuntimeError::coercion(e, line))?;
    Ok((target, source))
}

/// `x[...] <- value`, answering the updated vector.
fn assign_subset(object: Value,
                 positions: &[Option<Value>],
                 value: Value,
                 warnings: &mut Vec<WarningKind>,
                 line: usize)
                 -> EvalResult<Value> {
    let source = match &value {
        Value::Null => None,
        Value::Vector(v) => Some(Vector::clone(v)),
        function if object.as_vector().is_some_and(|v| v.kind() == Kind::List) => {
            Some(Vector::new(VectorData::List(vec![function.clone()])))
        },
        other => {
            return Err(RuntimeError::TypeError { details: format!("incompatible types (from {} to {}) in subassignment type fix",
                                                                  other.type_name(),
                                                                  object.type_name()),
                                                 line });
        },
    };
    let kind = source.as_ref().map_or(Kind::Logical, Vector::kind);
    let target = owned_target(object, kind, line)?;
    let (targets, new_names) = update_targets(&target, positions, line)?;

    let Some(source) = source else {
        if target.kind() == Kind::List {
            let mut target = target;
            let mut indices: Vec<usize> = targets.into_iter().filter(|i| *i < target.len()).collect();
            indices.sort_unstable();
            indices.dedup();
            remove_elements(&mut target, &indices);
            return Ok(target.into());
        }
        if targets.is_empty() {
            return Ok(target.into());
        }
        return Err(RuntimeError::InvalidArgument { details: "replacement has length zero".to_string(),
                                                   line });
    };
    if targets.is_empty() {
        return Ok(target.into());
    }
    if source.is_empty() {
        return Err(RuntimeError::InvalidArgument { details: "replacement has length zero".to_string(),
                                                   line });
    }
    if targets.len() % source.len() != 0 {
        warnings.push(WarningKind::ReplacementNotMultiple);
    }
    let (mut target, source) = unify(target, &source, warnings, line)?;
    let old_len = target.len();
    target.update_data(|data| data.assign(&targets, source.data()));
    finish_growth(&mut target, old_len, &new_names);
    Ok(target.into())
}

/// Zero-based indices an update writes to, with the names of appended
/// elements.
fn update_targets(target: &Vector,
                  positions: &[Option<Value>],
                  line: usize)
                  -> EvalResult<(Vec<usize>, Vec<(usize, String)>)> {
    match positions.len() {
        0 => Ok(((0..target.len()).collect(), Vec::new())),
        1 => {
            let resolved = resolve(positions[0].as_ref(), target.len(), target.names(), true, line)?;
            Ok((resolved.indices.into_iter().flatten().collect(), resolved.new_names))
        },
        count => {
            let dim = matching_dim(target, count, line)?;
            let axes = resolve_axes(positions, &dim, line)?;
            Ok((linear_indices(&axes, &dim).into_iter().flatten().collect(), Vec::new()))
        },
    }
}

/// After an update grew the vector: pads names, applies the names of
/// appended elements, and drops `dim`.
fn finish_growth(target: &mut Vector, old_len: usize, new_names: &[(usize, String)]) {
    let len = target.len();
    if len == old_len {
        return;
    }
    target.attributes_mut().set(DIM, Value::Null);
    if target.names().is_none() && new_names.is_empty() {
        return;
    }
    let mut names: Vec<Option<String>> =
        target.names().map_or_else(|| vec![Some(String::new()); old_len], <[Option<String>]>::to_vec);
    names.resize(len, Some(String::new()));
    for (index, name) in new_names {
        if let Some(slot) = names.get_mut(*index) {
            *slot = Some(name.clone());
        }
    }
    target.set_names(Some(names));
}

/// `x[[...]] <- value`, answering the updated vector.
fn assign_element(object: Value,
                  positions: &[Option<Value>],
                  value: Value,
                  warnings: &mut Vec<WarningKind>,
                  line: usize)
                  -> EvalResult<Value> {
    let scalar = value.as_vector().filter(|v| v.len() == 1 && v.kind() != Kind::List).cloned();
    let kind = scalar.as_ref().map_or(Kind::List, |v| v.kind());
    let mut target = owned_target(object, kind, line)?;

    if target.kind() != Kind::List && scalar.is_none() {
        match &value {
            Value::Null => {
                return Err(RuntimeError::InvalidArgument { details: "replacement has length zero".to_string(),
                                                           line });
            },
            Value::Vector(v) if v.kind() != Kind::List => {
                return Err(RuntimeError::InvalidArgument { details: "more elements supplied than there are to replace"
                                                                    .to_string(),
                                                           line });
            },
            _ => {
                target = coerce_vector(&target, Kind::List, PreservePolicy::ALL, warnings).map_err(|e| {
                                                                                              RuntimeError::coercion(e, line)
                                                                                          })?;
            },
        }
    }

    let (index, new_name) = element_target(&target, positions, line)?;
    let old_len = target.len();
    if target.kind() == Kind::List {
        if matches!(value, Value::Null) {
            if index < old_len {
                remove_elements(&mut target, &[index]);
            }
            return Ok(target.into());
        }
        set_list_element(&mut target, index, value);
    } else if let Some(scalar) = scalar {
        let (unified, source) = unify(target, &scalar, warnings, line)?;
        target = unified;
        target.update_data(|data| data.assign(&[index], source.data()));
    }
    let new_names: Vec<(usize, String)> = new_name.into_iter().map(|n| (index, n)).collect();
    finish_growth(&mut target, old_len, &new_names);
    Ok(target.into())
}

/// The element a `[[<-` writes to, with its name when it is appended by
/// name.
fn element_target(target: &Vector, positions: &[Option<Value>], line: usize) -> EvalResult<(usize, Option<String>)> {
    match positions {
        [position] => {
            if let Some(Value::Vector(v)) = position
               && let VectorData::Character(s) = v.data()
               && v.len() == 1
            {
                let Some(name) = &s[0] else {
                    return Err(RuntimeError::SubscriptOutOfBounds { line });
                };
                return Ok(match target.names().and_then(|names| find_name(names, name, true)) {
                    Some(i) => (i, None),
                    None => (target.len(), Some(name.clone())),
                });
            }
            single_index(position.as_ref(), target, true, line)?.map(|i| (i, None))
                                                                .ok_or(RuntimeError::SubscriptOutOfBounds { line })
        },
        _ => {
            let dim = matching_dim(target, positions.len(), line)?;
            let axes = resolve_axes(positions, &dim, line)?;
            if axes.iter().any(|a| a.len() != 1) {
                return Err(RuntimeError::SubscriptOutOfBounds { line });
            }
            linear_indices(&axes, &dim).first()
                                       .copied()
                                       .flatten()
                                       .map(|i| (i, None))
                                       .ok_or(RuntimeError::SubscriptOutOfBounds { line })
        },
    }
}

/// Stores `value` at `index` of a list, padding with `NULL`.
fn set_list_element(list: &mut Vector, index: usize, value: Value) {
    let old_len = list.len();
    list.update_data(|data| {
            if let VectorData::List(elements) = data {
                if index >= elements.len() {
                    elements.resize(index + 1, Value::Null);
                }
                elements[index] = value;
            }
        });
    if list.len() > old_len
       && let Some(names) = list.names()
    {
        let mut names = names.to_vec();
        names.resize(list.len(), Some(String::new()));
        list.set_names(Some(names));
    }
}

fn set_name(vector: &mut Vector, index: usize, name: &str) {
    let mut names = vector.names().map_or_else(Vec::new, <[Option<String>]>::to_vec);
    names.resize(vector.len(), Some(String::new()));
    if let Some(slot) = names.get_mut(index) {
        *slot = Some(name.to_string());
    }
    vector.set_names(Some(names));
}

/// Removes elements (sorted, unique indices) together with their names.
fn remove_elements(vector: &mut Vector, indices: &[usize]) {
    let names = vector.names().map(|names| {
                                   names.iter()
                                        .enumerate()
                                        .filter(|(i, _)| indices.binary_search(i).is_err())
                                        .map(|(_, n)| n.clone())
                                        .collect::<Vec<_>>()
                               });
    vector.update_data(|data| data.remove(indices));
    if names.is_some() {
        vector.set_names(names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubles(v: &[f64]) -> Value {
        VectorData::Double(v.to_vec()).into()
    }

    #[test]
    fn negative_subscripts_exclude() {
        let indices = numeric_indices(&[Some(-1), Some(-3)], 4, 1).unwrap();
        assert_eq!(indices, vec![Some(1), Some(3)]);
        assert!(numeric_indices(&[Some(-1), Some(2)], 4, 1).is_err());
    }

    #[test]
    fn logical_subscripts_recycle() {
        let mask: Value = VectorData::Logical(vec![true.into(), false.into()]).into();
        let resolved = resolve(Some(&mask), 5, None, false, 1).unwrap();
        assert_eq!(resolved.indices, vec![Some(0), Some(2), Some(4)]);
    }

    #[test]
    fn growing_by_name() {
        let x = doubles(&[1.0, 2.0]);
        let updated = assign_subset(x, &[Some(Value::character("c"))], Value::double(5.0), &mut Vec::new(), 1).unwrap();
        let v = updated.as_vector().unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.names().unwrap()[2].as_deref(), Some("c"));
        assert_eq!(v.names().unwrap()[0].as_deref(), Some(""));
    }

    #[test]
    fn matrix_subset_drops_extent_one() {
        let mut m = Vector::new(VectorData::Integer((1..=6).collect()));
        m.attributes_mut().set(DIM, VectorData::Integer(vec![2, 3]).into());
        let m: Value = m.into();
        let row = subset(&m, &[Some(Value::double(2.0)), None], true, 1).unwrap();
        assert!(row.identical(&VectorData::Integer(vec![2, 4, 6]).into()));
        let kept = subset(&m, &[Some(Value::double(2.0)), None], false, 1).unwrap();
        assert_eq!(kept.as_vector().unwrap().dim(), Some(vec![1, 3]));
    }

    #[test]
    fn partial_names_need_inexact() {
        let names = [Some("alpha".to_string()), Some("beta".to_string())];
        assert_eq!(find_name(&names, "al", false), Some(0));
        assert_eq!(find_name(&names, "al", true), None);
    }
}
