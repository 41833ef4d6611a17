use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::{PreservePolicy, coerce, double_scalar},
        connection::{Connection, TextConnection},
        evaluator::{
            core::{Context, EvalResult},
            function::core::take,
            utils::{required, string_arg, varargs},
        },
        value::{Kind, Value, Vector, VectorData, format::print_lines},
    },
    util::num::f64_to_position,
};

type SharedConnection = Rc<RefCell<dyn Connection>>;

fn connection_arg(ctx: &Context, value: Value, line: usize) -> EvalResult<SharedConnection> {
    match value {
        Value::Missing => Ok(ctx.stdout()),
        Value::Connection(con) => Ok(con),
        _ => Err(RuntimeError::Connection { details: "invalid connection".to_string(),
                                            line }),
    }
}

fn connection_error(details: String, line: usize) -> RuntimeError {
    RuntimeError::Connection { details, line }
}

fn strings(value: &Value, line: usize) -> EvalResult<Vec<String>> {
    let vector = coerce(value, Kind::Character, PreservePolicy::NONE, &mut Vec::new())
        .map_err(|e| RuntimeError::coercion(e, line))?;
    Ok(vector.strings()
             .unwrap_or_default()
             .iter()
             .map(|s| s.clone().unwrap_or_else(|| "NA".to_string()))
             .collect())
}

/// Prints a value to the context's standard output and returns it
/// unchanged.
///
/// # Example
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use statcore::interpreter::{
///     connection::TextConnection,
///     evaluator::core::Context,
/// };
///
/// let out = Rc::new(RefCell::new(TextConnection::new(Vec::new())));
/// let mut ctx = Context::with_stdout(out.clone());
/// ctx.run("print(c(a = 1, b = 2))").unwrap();
/// assert_eq!(out.borrow().output(), vec!["a b", "1 2"]);
/// ```
pub fn print(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [x, _] = take(args)?;
    let x = required(x, "x", line)?;
    let lines = print_lines(&x);
    ctx.stdout()
       .borrow_mut()
       .write_lines(&lines, "\n")
       .map_err(|e| connection_error(e, line))?;
    Ok(x)
}

/// `stdout()`.
pub fn stdout(ctx: &mut Context, args: Vec<Value>, _: usize) -> EvalResult<Value> {
    let [] = take(args)?;
    Ok(Value::Connection(ctx.stdout()))
}

/// `textConnection(object)`: a connection reading the strings of `object`.
pub fn text_connection(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [object] = take(args)?;
    let object = required(object, "object", line)?;
    let connection: SharedConnection = Rc::new(RefCell::new(TextConnection::new(strings(&object, line)?)));
    Ok(Value::Connection(connection))
}

/// `readLines(con = stdout(), n = -1)`.
pub fn read_lines(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [con, n] = take(args)?;
    let con = connection_arg(ctx, con, line)?;
    let n = match n {
        Value::Missing => -1,
        n => double_scalar(&n).and_then(f64_to_position)
                              .ok_or_else(|| RuntimeError::InvalidArgument { details: "invalid 'n' argument".to_string(),
                                                                             line })?,
    };
    let lines = con.borrow_mut().read_lines(n).map_err(|e| connection_error(e, line))?;
    Ok(Vector::new(VectorData::Character(lines.into_iter().map(Some).collect())).into())
}

/// `writeLines(text, con = stdout(), sep = "\n")`.
pub fn write_lines(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [text, con, sep] = take(args)?;
    let text = strings(&required(text, "text", line)?, line)?;
    let con = connection_arg(ctx, con, line)?;
    let sep = match sep {
        Value::Missing => "\n".to_string(),
        sep => string_arg(&sep, "sep", line)?,
    };
    con.borrow_mut().write_lines(&text, &sep).map_err(|e| connection_error(e, line))?;
    Ok(Value::Null)
}

/// `flush(con)`.
pub fn flush(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [con] = take(args)?;
    let con = connection_arg(ctx, required(con, "con", line)?, line)?;
    con.borrow_mut().flush().map_err(|e| connection_error(e, line))?;
    Ok(Value::Null)
}

/// `close(con, ...)`.
pub fn close(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [con, _] = take(args)?;
    let con = connection_arg(ctx, required(con, "con", line)?, line)?;
    con.borrow_mut().close().map_err(|e| connection_error(e, line))?;
    Ok(Value::Null)
}

/// `.Call(.NAME, ...)`: forwards the arguments to the registered
/// [`NativeCall`](crate::interpreter::connection::NativeCall).
pub fn native_call(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Value> {
    let [name, dots] = take(args)?;
    let symbol = string_arg(&required(name, ".NAME", line)?, ".NAME", line)?;
    let Some(native) = ctx.native_call() else {
        return Err(RuntimeError::NativeCall { symbol,
                                              message: "no native routines are registered".to_string(),
                                              line });
    };
    let values: Vec<Value> = varargs(dots).into_iter().map(|(_, v)| v).collect();
    tracing::debug!(symbol = symbol.as_str(), arguments = values.len(), "native call");
    native.invoke(&symbol, &values)
          .map_err(|message| RuntimeError::NativeCall { symbol, message, line })
}
