use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce, integer_scalar},
        evaluator::{
            core::{Context, EvalResult},
            function::core::take,
            options::Options,
            utils::{count_arg, flag, varargs},
            warning::WarningKind,
        },
        value::{Kind, Logical, Value, Vector, VectorData},
    },
};

/// Pastes the arguments of `stop()` and `warning()` into one message.
fn message(values: Vec<(Option<String>, Value)>, line: usize) -> EvalResult<String> {
    let mut out = String::new();
    for (_, value) in values {
        let strings = coerce(&value, Kind::Character, PreservePolicy::NONE, &mut Vec::new())
            .map_err(|e| RuntimeError::coercion(e, line))?;
        if let Some(strings) = strings.strings() {
            for s in strings {
                out.push_str(s.as_deref().unwrap_or("NA"));
            }
        }
    }
    Ok(out)
}

/// `stopifnot(...)`: every argument must be all `TRUE`.
///
/// # Errors
/// [`RuntimeError::AssertionFailed`] naming the first failing argument.
pub fn stopifnot(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [dots] = take(args)?;
    for (i, (_, value)) in varargs(dots).into_iter().enumerate() {
        let holds = match value.as_vector() {
            Some(v) if v.kind() == Kind::Logical => v.logicals().is_some_and(|l| l.iter().all(|x| *x == Logical::True)),
            _ => false,
        };
        if !holds {
            return Err(RuntimeError::AssertionFailed { index: i + 1,
                                                       line });
        }
    }
    Ok(Value::Null)
}

/// `stop(...)`.
pub fn stop(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [dots] = take(args)?;
    Err(RuntimeError::User { message: message(varargs(dots), line)?,
                             line })
}

/// `warning(...)`: signals the pasted message and returns it.
pub fn warning(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [dots] = take(args)?;
    let text = message(varargs(dots), line)?;
    ctx.signal_one(WarningKind::User(text.clone()), line)?;
    Ok(Value::character(&text))
}

/// `options(...)`: sets the named options and returns their previous values
/// as a named list. Without arguments it returns every option.
///
/// | name                  | field                 |
/// |-----------------------|-----------------------|
/// | `warn`                | `warn`                |
/// | `expressions`         | `max_depth`           |
/// | `argument.cache.size` | `argument_cache_size` |
/// | `partial.matching`    | `partial_matching`    |
pub fn options(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [dots] = take(args)?;
    let settings = varargs(dots);
    let mut names = Vec::new();
    let mut old = Vec::new();
    if settings.is_empty() {
        for name in ["warn", "expressions", "argument.cache.size", "partial.matching"] {
            names.push(Some(name.to_string()));
            old.push(current(&ctx.options, name, line)?);
        }
    }
    for (name, value) in settings {
        let Some(name) = name else {
            return Err(RuntimeError::InvalidArgument { details: "options must be named".to_string(),
                                                       line });
        };
        old.push(current(&ctx.options, &name, line)?);
        update(&mut ctx.options, &name, &value, line)?;
        names.push(Some(name));
    }
    let mut list = Vector::new(VectorData::List(old));
    list.set_names(Some(names));
    Ok(list.into())
}

fn current(options: &Options, name: &str, line: usize) -> EvalResult<Value> {
    let count = |n: usize| i32::try_from(n).map_or_else(|_| Value::double(f64::from(i32::MAX)), Value::integer);
    Ok(match name {
        "warn" => Value::integer(options.warn),
        "expressions" => count(options.max_depth),
        "argument.cache.size" => count(options.argument_cache_size),
        "partial.matching" => Value::logical(options.partial_matching),
        _ => return Err(unknown_option(name, line)),
    })
}

fn update(options: &mut Options, name: &str, value: &Value, line: usize) -> EvalResult<()> {
    match name {
        "warn" => {
            options.warn = integer_scalar(value).ok_or_else(|| RuntimeError::InvalidArgument { details: "invalid 'warn' value".to_string(),
                                                                                               line })?;
        },
        "expressions" => {
            let depth = count_arg(value, "expressions", line)?;
            if depth == 0 {
                return Err(RuntimeError::InvalidArgument { details: "'expressions' parameter invalid, allowed 1...".to_string(),
                                                           line });
            }
            options.max_depth = depth;
        },
        "argument.cache.size" => options.argument_cache_size = count_arg(value, name, line)?,
        "partial.matching" => options.partial_matching = flag(value, name, true, line)?,
        _ => return Err(unknown_option(name, line)),
    }
    tracing::debug!(option = name, "option updated");
    Ok(())
}

fn unknown_option(name: &str, line: usize) -> RuntimeError {
    RuntimeError::InvalidArgument { details: format!("unknown option '{name}'"),
                                    line }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dots(values: Vec<(Option<&str>, Value)>) -> Value {
        Value::Varargs(std::rc::Rc::new(values.into_iter().map(|(n, v)| (n.map(str::to_string), v)).collect()))
    }

    #[test]
    fn options_return_previous_values() {
        let mut ctx = Context::new();
        let old = options(&mut ctx, vec![dots(vec![(Some("warn"), Value::integer(2))])], 1).unwrap();
        assert_eq!(ctx.options.warn, 2);
        let old = old.as_vector().unwrap().elements().unwrap().to_vec();
        assert!(old[0].identical(&Value::integer(0)));
    }

    #[test]
    fn expressions_sets_depth_limit() {
        let mut ctx = Context::new();
        options(&mut ctx, vec![dots(vec![(Some("expressions"), Value::double(50.0))])], 1).unwrap();
        assert_eq!(ctx.options.max_depth, 50);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut ctx = Context::new();
        let result = options(&mut ctx, vec![dots(vec![(Some("digits"), Value::integer(3))])], 1);
        assert!(matches!(result, Err(RuntimeError::InvalidArgument { .. })));
    }

    #[test]
    fn stopifnot_reports_failing_argument() {
        let mut ctx = Context::new();
        let args = dots(vec![(None, Value::logical(true)), (None, Value::logical(false))]);
        let result = stopifnot(&mut ctx, vec![args], 3);
        assert!(matches!(result, Err(RuntimeError::AssertionFailed { index: 2, line: 3 })));
    }
}
