use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce},
        evaluator::{
            core::{Context, EvalResult},
            function::core::take,
            utils::{required, string_arg},
        },
        value::{Kind, Value},
    },
};

/// Runs the coercion engine for an `as.*` builtin and signals its warnings.
fn convert(ctx: &mut Context, x: Value, kind: Kind, policy: PreservePolicy, line: usize) -> EvalResult<Value> {
    let x = required(x, "x", line)?;
    let mut warnings = Vec::new();
    let result = coerce(&x, kind, policy, &mut warnings).map_err(|e| RuntimeError::coercion(e, line))?;
    ctx.signal(warnings, line)?;
    Ok(result.into())
}

fn as_kind(ctx: &mut Context, args: Vec<Value>, kind: Kind, line: usize) -> EvalResult<Value> {
    let [x, _] = take(args)?;
    convert(ctx, x, kind, PreservePolicy::NONE, line)
}

/// `as.logical(x, ...)`.
pub fn as_logical(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    as_kind(ctx, args, Kind::Logical, line)
}

/// `as.integer(x, ...)`.
pub fn as_integer(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    as_kind(ctx, args, Kind::Integer, line)
}

/// `as.double(x, ...)`, also bound as `as.numeric`.
pub fn as_double(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    as_kind(ctx, args, Kind::Double, line)
}

/// `as.complex(x, ...)`.
pub fn as_complex(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    as_kind(ctx, args, Kind::Complex, line)
}

/// `as.character(x, ...)`.
pub fn as_character(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    as_kind(ctx, args, Kind::Character, line)
}

/// `as.raw(x)`: values outside `0..=255` become `00` with a warning.
pub fn as_raw(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    convert(ctx, x, Kind::Raw, PreservePolicy::NONE, line)
}

/// `as.vector(x, mode = "any")`.
///
/// `"any"` keeps the kind and drops the attributes. Converting to `"list"`
/// keeps the names.
pub fn as_vector(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, mode] = take(args)?;
    let mode = match mode {
        Value::Missing => "any".to_string(),
        mode => string_arg(&mode, "mode", line)?,
    };
    let kind = match mode.as_str() {
        "any" => match &x {
            Value::Vector(v) => v.kind(),
            Value::Null => return Ok(Value::Null),
            _ => Kind::List,
        },
        mode => Kind::from_mode(mode).ok_or_else(|| RuntimeError::InvalidArgument { details: format!("invalid 'mode' argument '{mode}'"),
                                                                                    line })?,
    };
    let policy = if kind == Kind::List {
        PreservePolicy { names: true,
                         ..PreservePolicy::NONE }
    } else {
        PreservePolicy::NONE
    };
    convert(ctx, x, kind, policy, line)
}
