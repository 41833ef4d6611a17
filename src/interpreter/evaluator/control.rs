use crate::{
    error::RuntimeError,
    interpreter::{
        coercion::logical_from_str,
        environment::Environment,
        evaluator::core::{Context, EvalResult},
        node::{Node, ShortCircuit},
        value::{Kind, Logical, NA_INTEGER, Value, Vector, VectorData, is_na_real},
    },
};

/// What a loop body asked for.
enum Flow {
    Continue,
    Exit,
}

impl Context {
    pub(crate) fn eval_if(&mut self,
                          condition: &Node,
                          then_branch: &Node,
                          else_branch: Option<&Node>,
                          env: &Environment,
                          line: usize)
                          -> EvalResult<Value> {
        let value = self.eval(condition, env)?;
        if condition_holds(&value, line)? {
            self.eval(then_branch, env)
        } else if let Some(else_branch) = else_branch {
            self.eval(else_branch, env)
        } else {
            Ok(Value::Null)
        }
    }

    pub(crate) fn eval_while(&mut self,
                             condition: &Node,
                             body: &Node,
                             env: &Environment,
                             line: usize)
                             -> EvalResult<Value> {
        loop {
            let value = self.eval(condition, env)?;
            if !condition_holds(&value, line)? {
                break;
            }
            if let Flow::Exit = self.loop_body(body, env)? {
                break;
            }
        }
        Ok(Value::Null)
    }

    pub(crate) fn eval_repeat(&mut self, body: &Node, env: &Environment) -> EvalResult<Value> {
        while let Flow::Continue = self.loop_body(body, env)? {}
        Ok(Value::Null)
    }

    /// Iterates over the elements of a vector, binding each to `variable`.
    ///
    /// The sequence is evaluated once; changes to it inside the body do not
    /// affect the iteration.
    pub(crate) fn eval_for(&mut self,
                           variable: &str,
                           sequence: &Node,
                           body: &Node,
                           env: &Environment,
                           line: usize)
                           -> EvalResult<Value> {
        let sequence = self.eval(sequence, env)?;
        let vector = match &sequence {
            Value::Null => return Ok(Value::Null),
            Value::Vector(v) => v,
            other => {
                return Err(RuntimeError::TypeError { details: format!("invalid for() loop sequence of type '{}'",
                                                                      other.type_name()),
                                                     line });
            },
        };
        for i in 0..vector.len() {
            let element = match vector.data() {
                VectorData::List(elements) => elements[i].clone(),
                data => Value::from(data.select(&[Some(i)])),
            };
            env.define(variable, element);
            if let Flow::Exit = self.loop_body(body, env)? {
                break;
            }
        }
        Ok(Value::Null)
    }

    fn loop_body(&mut self, body: &Node, env: &Environment) -> EvalResult<Flow> {
        match self.eval(body, env) {
            Ok(_) | Err(RuntimeError::Next { .. }) => Ok(Flow::Continue),
            Err(RuntimeError::Break { .. }) => Ok(Flow::Exit),
            Err(e) => Err(e),
        }
    }

    /// `&&` and `||`: the right operand is evaluated only when the left one
    /// does not decide the result.
    pub(crate) fn eval_short_circuit(&mut self,
                                     op: ShortCircuit,
                                     left: &Node,
                                     right: &Node,
                                     env: &Environment,
                                     line: usize)
                                     -> EvalResult<Value> {
        let symbol = match op {
            ShortCircuit::And => "&&",
            ShortCircuit::Or => "||",
        };
        let l = short_circuit_operand(&self.eval(left, env)?, "x", symbol, line)?;
        let decided = match op {
            ShortCircuit::And => l == Logical::False,
            ShortCircuit::Or => l == Logical::True,
        };
        if decided {
            return Ok(Value::logical(op == ShortCircuit::Or));
        }
        let r = short_circuit_operand(&self.eval(right, env)?, "y", symbol, line)?;
        let result = match op {
            ShortCircuit::And => l.and(r),
            ShortCircuit::Or => l.or(r),
        };
        Ok(Vector::logical(result).into())
    }
}

/// Reads a length-1 condition as a boolean.
fn condition_holds(value: &Value, line: usize) -> EvalResult<bool> {
    let vector = match value {
        Value::Vector(v) if v.kind() != Kind::List => v,
        Value::Null => {
            return Err(RuntimeError::InvalidCondition { details: "argument is of length zero",
                                                        line });
        },
        other => {
            return Err(RuntimeError::TypeError { details: format!("argument is not interpretable as logical: '{}'",
                                                                  other.type_name()),
                                                 line });
        },
    };
    match vector.len() {
        0 => {
            return Err(RuntimeError::InvalidCondition { details: "argument is of length zero",
                                                        line });
        },
        1 => {},
        _ => {
            return Err(RuntimeError::InvalidCondition { details: "the condition has length > 1",
                                                        line });
        },
    }
    let first = match vector.data().select(&[Some(0)]) {
        VectorData::Character(s) => match s[0].as_deref() {
            None => Logical::Na,
            Some(text) => match logical_from_str(text) {
                Logical::Na => {
                    return Err(RuntimeError::InvalidCondition { details: "argument is not interpretable as logical",
                                                                line });
                },
                l => l,
            },
        },
        data => scalar_logical(&data),
    };
    first.to_bool()
         .ok_or(RuntimeError::InvalidCondition { details: "missing value where TRUE/FALSE needed",
                                                 line })
}

fn short_circuit_operand(value: &Value, which: &str, symbol: &str, line: usize) -> EvalResult<Logical> {
    let invalid = |what: &str| RuntimeError::InvalidArgument { details: format!("invalid '{which}' {what} in 'x {symbol} y'"),
                                                               line };
    let vector = match value {
        Value::Vector(v) => v,
        _ => return Err(invalid("type")),
    };
    if vector.len() != 1 {
        return Err(invalid("length"));
    }
    match vector.data() {
        VectorData::Character(s) => Ok(s[0].as_deref().map_or(Logical::Na, logical_from_str)),
        VectorData::List(_) | VectorData::Raw(_) => Err(invalid("type")),
        data => Ok(scalar_logical(data)),
    }
}

/// Logical view of the first element of a numeric or logical vector.
fn scalar_logical(data: &VectorData) -> Logical {
    match data.select(&[Some(0)]) {
        VectorData::Logical(v) => v[0],
        VectorData::Integer(v) if v[0] == NA_INTEGER => Logical::Na,
        VectorData::Integer(v) => (v[0] != 0).into(),
        VectorData::Double(v) if is_na_real(v[0]) || v[0].is_nan() => Logical::Na,
        VectorData::Double(v) => (v[0] != 0.0).into(),
        VectorData::Complex(v) if v[0].is_na() || v[0].is_nan() => Logical::Na,
        VectorData::Complex(v) => (v[0].real != 0.0).into(),
        VectorData::Raw(v) => (v[0] != 0).into(),
        _ => Logical::Na,
    }
}
