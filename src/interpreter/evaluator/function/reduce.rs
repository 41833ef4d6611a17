use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{construct::combine, core::take},
            utils::{flag, varargs},
        },
        reduction::{ReduceOp, reduce, reduce_null},
        value::Value,
    },
};

/// Shared body of `sum`, `prod`, `min` and `max`.
///
/// The arguments are concatenated as `c()` would, then folded. Warnings from
/// both steps reach the context.
fn aggregate(ctx: &mut Context, op: ReduceOp, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [dots, na_rm] = take(args)?;
    let na_rm = flag(&na_rm, "na.rm", false, line)?;
    let mut warnings = Vec::new();
    let combined = combine(varargs(dots), &mut warnings).map_err(|e| RuntimeError::coercion(e, line))?;
    let result = match &combined {
        Value::Vector(v) => reduce(v, op, na_rm, false, &mut warnings).map_err(|e| RuntimeError::coercion(e, line))?,
        _ => reduce_null(op, &mut warnings),
    };
    tracing::trace!(op = op.name(), na_rm, warnings = warnings.len(), "reduced");
    ctx.signal(warnings, line)?;
    Ok(result.into())
}

/// `sum(..., na.rm = FALSE)`.
pub fn sum(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    aggregate(ctx, ReduceOp::Sum, args, line)
}

/// `prod(..., na.rm = FALSE)`.
pub fn prod(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    aggregate(ctx, ReduceOp::Prod, args, line)
}

/// `min(..., na.rm = FALSE)`.
pub fn min(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    aggregate(ctx, ReduceOp::Min, args, line)
}

/// `max(..., na.rm = FALSE)`.
pub fn max(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    aggregate(ctx, ReduceOp::Max, args, line)
}
