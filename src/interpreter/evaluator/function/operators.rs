use crate::{
    ast::{BinaryOperator, UnaryOperator},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::take,
            utils::required,
        },
        value::Value,
    },
};

fn binary(ctx: &mut Context, op: BinaryOperator, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [e1, e2] = take(args)?;
    let e1 = required(e1, "e1", line)?;
    let e2 = required(e2, "e2", line)?;
    ctx.eval_binary(op, &e1, &e2, line)
}

/// `+`, unary when called with one operand.
pub fn plus(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    sign(ctx, UnaryOperator::Plus, BinaryOperator::Add, args, line)
}

/// `-`, unary when called with one operand.
pub fn minus(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    sign(ctx, UnaryOperator::Minus, BinaryOperator::Sub, args, line)
}

fn sign(ctx: &mut Context,
        unary: UnaryOperator,
        op: BinaryOperator,
        args: Vec<Value>,
        line: usize)
        -> EvalResult<Value> {
    let [e1, e2] = take(args)?;
    let e1 = required(e1, "e1", line)?;
    match e2 {
        Value::Missing => ctx.eval_unary(unary, &e1, line),
        e2 => ctx.eval_binary(op, &e1, &e2, line),
    }
}

/// `!x`.
pub fn not(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x] = take(args)?;
    let x = required(x, "x", line)?;
    ctx.eval_unary(UnaryOperator::Not, &x, line)
}

pub fn times(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Mul, args, line)
}

pub fn divide(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Div, args, line)
}

pub fn power(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Pow, args, line)
}

pub fn modulo(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Mod, args, line)
}

pub fn int_divide(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::IntDiv, args, line)
}

pub fn equal(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Equal, args, line)
}

pub fn not_equal(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::NotEqual, args, line)
}

pub fn less(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Less, args, line)
}

pub fn less_equal(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::LessEqual, args, line)
}

pub fn greater(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Greater, args, line)
}

pub fn greater_equal(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::GreaterEqual, args, line)
}

pub fn and(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::And, args, line)
}

pub fn or(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    binary(ctx, BinaryOperator::Or, args, line)
}

/// `from:to`.
pub fn colon(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [from, to] = take(args)?;
    let from = required(from, "from", line)?;
    let to = required(to, "to", line)?;
    ctx.eval_binary(BinaryOperator::Range, &from, &to, line)
}
