use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce, string_scalar},
        evaluator::{
            core::{Context, EvalResult},
            function::core::take,
            utils::{required, varargs},
        },
        node::ReadMode,
        value::{Kind, Value, Vector, VectorData},
    },
};

/// `return(value = NULL)`: unwinds to the enclosing closure call.
pub fn return_value(_: &mut Context, args: Vec<Value>, _: usize) -> EvalResult<Value> {
    let [value] = take(args)?;
    let value = match value {
        Value::Missing => Value::Null,
        value => value,
    };
    Err(RuntimeError::Return { value })
}

/// `invisible(x = NULL)`.
pub fn invisible(_: &mut Context, args: Vec<Value>, _: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    Ok(match x {
        Value::Missing => Value::Null,
        x => x,
    })
}

/// `do.call(what, args)`: calls `what` (a function or the name of one) with
/// the elements of the list `args`, named by its names.
pub fn do_call(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [what, arguments] = take(args)?;
    let what = required(what, "what", line)?;
    let function = resolve_function(ctx, what, line)?;
    let arguments = match arguments {
        Value::Missing | Value::Null => Vec::new(),
        arguments => tagged_elements(&arguments, line)?,
    };
    ctx.call_function(&function, arguments, line)
}

/// `lapply(X, FUN, ...)`: a list of `FUN(X[[i]], ...)`, keeping the names
/// of `X`.
pub fn lapply(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, fun, dots] = take(args)?;
    let x = required(x, "X", line)?;
    let fun = resolve_function(ctx, required(fun, "FUN", line)?, line)?;
    let extra = varargs(dots);
    let list = coerce(&x, Kind::List, PreservePolicy::NONE, &mut Vec::new()).map_err(|e| RuntimeError::coercion(e, line))?;
    let names = x.as_vector().and_then(|v| v.names().map(<[Option<String>]>::to_vec));

    let mut results = Vec::with_capacity(list.len());
    for element in list.elements().unwrap_or_default() {
        let mut arguments = Vec::with_capacity(extra.len() + 1);
        arguments.push((None, element.clone()));
        arguments.extend(extra.iter().cloned());
        results.push(ctx.call_function(&fun, arguments, line)?);
    }
    let mut result = Vector::new(VectorData::List(results));
    result.set_names(names);
    Ok(result.into())
}

fn resolve_function(ctx: &Context, what: Value, line: usize) -> EvalResult<Value> {
    if what.is_function() {
        return Ok(what);
    }
    let Some(Some(name)) = string_scalar(&what) else {
        return Err(RuntimeError::InvalidArgument { details: "'what' must be a function or character string".to_string(),
                                                   line });
    };
    ctx.global
       .read(&name, ReadMode::Function)
       .ok_or(RuntimeError::UnknownFunction { name, line })
}

fn tagged_elements(list: &Value, line: usize) -> EvalResult<Vec<(Option<String>, Value)>> {
    let vector = match list {
        Value::Vector(v) if v.kind() == Kind::List => Rc::clone(v),
        _ => {
            return Err(RuntimeError::InvalidArgument { details: "second argument must be a list".to_string(),
                                                       line });
        },
    };
    let names = vector.names();
    Ok(vector.elements()
             .unwrap_or_default()
             .iter()
             .enumerate()
             .map(|(i, v)| {
                 let name = names.and_then(|n| n.get(i).cloned().flatten()).filter(|n| !n.is_empty());
                 (name, v.clone())
             })
             .collect())
}
