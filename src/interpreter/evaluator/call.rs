use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult},
        matcher::{MatchedSlot, Permutation, PrepareArguments, Signature, match_evaluated},
        node::{ActualArgument, Node, ReadMode, VARARGS},
        value::{
            Value,
            core::{Builtin, Closure},
        },
    },
};

/// One actual argument after `...` has been expanded.
enum Supplied<'n> {
    /// An expression written at the call site.
    Node {
        name: Option<String>,
        node: &'n Node,
    },
    /// A value forwarded from the caller's `...`.
    Forwarded {
        name:  Option<String>,
        value: Value,
    },
    /// An empty argument.
    Empty {
        name: Option<String>,
    },
}

impl Supplied<'_> {
    fn name(&self) -> Option<String> {
        match self {
            Self::Node { name, .. } | Self::Forwarded { name, .. } | Self::Empty { name } => {
                name.clone()
            },
        }
    }

    fn is_present(&self) -> bool {
        match self {
            Self::Node { .. } => true,
            Self::Forwarded { value, .. } => !matches!(value, Value::Missing),
            Self::Empty { .. } => false,
        }
    }

    /// Text used in unused-argument messages.
    fn label(&self) -> String {
        match self {
            Self::Node { node, .. } => format!("{node:?}"),
            Self::Forwarded { value, .. } => format!("{value:?}"),
            Self::Empty { .. } => String::new(),
        }
    }
}

impl Context {
    /// Evaluates a call node.
    ///
    /// The callee is evaluated first. The actuals, with `...` expanded, form
    /// a signature that the call site's cache turns into a permutation; the
    /// matched actuals are then evaluated in formal order and bound.
    pub(crate) fn eval_call(&mut self,
                            function: &Node,
                            arguments: &[ActualArgument],
                            cache: &RefCell<PrepareArguments>,
                            env: &Environment,
                            line: usize)
                            -> EvalResult<Value> {
        let callee = self.eval(function, env)?;
        let formals = match &callee {
            Value::Closure(c) => Rc::clone(&c.formals),
            Value::Builtin(b) => Rc::clone(&b.formals),
            _ => return Err(RuntimeError::NotAFunction { line }),
        };

        let supplied = expand_arguments(arguments, env, line)?;
        let mut signature = Signature::default();
        for s in &supplied {
            signature.push(s.name(), s.is_present());
        }
        let permutation = cache.borrow_mut()
                               .prepare(&formals, &signature, &self.options, |i| supplied[i].label())
                               .map_err(|source| RuntimeError::Match { source, line })?;

        let values = self.evaluate_matched(&permutation, supplied, env)?;
        self.apply(&callee, values, line)
    }

    /// Evaluates the matched actuals in formal order.
    fn evaluate_matched(&mut self,
                        permutation: &Permutation,
                        supplied: Vec<Supplied<'_>>,
                        env: &Environment)
                        -> EvalResult<Vec<Option<Value>>> {
        let mut supplied: Vec<Option<Supplied<'_>>> = supplied.into_iter().map(Some).collect();
        let mut values = Vec::with_capacity(permutation.slots.len());
        for slot in &permutation.slots {
            values.push(match slot {
                            MatchedSlot::Actual(i) => Some(self.take_supplied(&mut supplied[*i], env)?.1),
                            MatchedSlot::Varargs(indices) => {
                                let mut collected = Vec::with_capacity(indices.len());
                                for i in indices {
                                    collected.push(self.take_supplied(&mut supplied[*i], env)?);
                                }
                                Some(Value::Varargs(Rc::new(collected)))
                            },
                            MatchedSlot::Default | MatchedSlot::Missing => None,
                        });
        }
        Ok(values)
    }

    fn take_supplied(&mut self,
                     supplied: &mut Option<Supplied<'_>>,
                     env: &Environment)
                     -> EvalResult<(Option<String>, Value)> {
        match supplied.take() {
            Some(Supplied::Node { name, node }) => Ok((name, self.eval(node, env)?)),
            Some(Supplied::Forwarded { name, value }) => Ok((name, value)),
            Some(Supplied::Empty { name }) => Ok((name, Value::Missing)),
            None => Err(RuntimeError::InvariantViolation { details: "actual argument matched twice" }),
        }
    }

    /// Invokes a function with one optional value per formal.
    fn apply(&mut self, callee: &Value, values: Vec<Option<Value>>, line: usize) -> EvalResult<Value> {
        match callee {
            Value::Closure(closure) => self.call_closure(closure, values, line),
            Value::Builtin(builtin) => self.call_builtin(builtin, values, line),
            _ => Err(RuntimeError::NotAFunction { line }),
        }
    }

    fn call_builtin(&mut self, builtin: &Builtin, values: Vec<Option<Value>>, line: usize) -> EvalResult<Value> {
        let args = values.into_iter().map(|v| v.unwrap_or(Value::Missing)).collect();
        (builtin.def.func)(self, args, line)
    }

    /// Runs a closure body in a fresh frame enclosed by the closure's
    /// environment.
    ///
    /// Supplied values are bound first; defaults of unsupplied formals are
    /// then evaluated in the new frame, in formal order.
    fn call_closure(&mut self, closure: &Closure, values: Vec<Option<Value>>, line: usize) -> EvalResult<Value> {
        self.enter(line)?;
        let result = self.run_closure(closure, values);
        self.leave();
        match result {
            Err(RuntimeError::Return { value }) => Ok(value),
            other => other,
        }
    }

    fn run_closure(&mut self, closure: &Closure, values: Vec<Option<Value>>) -> EvalResult<Value> {
        let frame = closure.env.child();
        let formals = &closure.formals;
        let mut pending = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            let name = &formals.names[index];
            match value {
                Some(value) => frame.define(name, value),
                None => {
                    frame.define(name, Value::Missing);
                    if formals.defaults[index].is_some() {
                        pending.push(index);
                    }
                },
            }
        }
        for index in pending {
            if let Some(default) = &formals.defaults[index] {
                let value = self.eval(default, &frame)?;
                frame.define(&formals.names[index], value);
            }
        }
        self.eval(&closure.body, &frame)
    }

    /// Calls a function value with evaluated arguments, as `do.call` and
    /// `lapply` do.
    ///
    /// # Errors
    /// [`RuntimeError::NotAFunction`] when `function` is not callable,
    /// [`RuntimeError::Match`] when the arguments do not match, and any error
    /// raised by the callee.
    pub fn call_function(&mut self,
                         function: &Value,
                         arguments: Vec<(Option<String>, Value)>,
                         line: usize)
                         -> EvalResult<Value> {
        let formals = match function {
            Value::Closure(c) => Rc::clone(&c.formals),
            Value::Builtin(b) => Rc::clone(&b.formals),
            _ => return Err(RuntimeError::NotAFunction { line }),
        };
        let values = match_evaluated(&formals, arguments, self.options.partial_matching)
            .map_err(|source| RuntimeError::Match { source, line })?;
        self.apply(function, values, line)
    }
}

/// Flattens the actuals of a call, splicing in the values bound to the
/// caller's `...`.
fn expand_arguments<'n>(arguments: &'n [ActualArgument],
                        env: &Environment,
                        line: usize)
                        -> EvalResult<Vec<Supplied<'n>>> {
    let mut supplied = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            ActualArgument::Value { name, node } => {
                supplied.push(Supplied::Node { name: name.clone(),
                                               node })
            },
            ActualArgument::Empty { name } => supplied.push(Supplied::Empty { name: name.clone() }),
            ActualArgument::Expand => match env.read(VARARGS, ReadMode::Value) {
                Some(Value::Varargs(values)) => {
                    supplied.extend(values.iter().map(|(name, value)| {
                                                     Supplied::Forwarded { name:  name.clone(),
                                                                           value: value.clone(), }
                                                 }));
                },
                Some(Value::Missing) => {},
                _ => {
                    return Err(RuntimeError::UnknownVariable { name: VARARGS.to_string(),
                                                               line });
                },
            },
        }
    }
    Ok(supplied)
}
