use std::{cell::RefCell, rc::Rc};

use tracing::warn;

use crate::{
    error::{Error, RuntimeError},
    interpreter::{
        connection::{Connection, NativeCall, StdoutConnection},
        environment::Environment,
        evaluator::{
            function::core::install_builtins,
            options::Options,
            warning::{Warning, WarningKind},
        },
        lowering::Lowering,
        node::{Node, ReadMode, TMP},
        value::{Value, core::Closure},
    },
    parse,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the global frame and the frame
/// of builtins above it, the options, the warning side channel, the standard
/// output connection and the optional native-call capability.
///
/// ## Usage
///
/// A `Context` is created once and reused for several programs; bindings and
/// call-site caches persist between them. It is `!Send`: every context stays
/// on the thread that created it, while independent contexts may run on
/// separate threads.
pub struct Context {
    /// The frame top-level code runs in.
    pub global:  Environment,
    base:        Environment,
    /// Evaluation options, read on every use.
    pub options: Options,
    warnings:    Vec<Warning>,
    stdout:      Rc<RefCell<dyn Connection>>,
    native:      Option<Rc<dyn NativeCall>>,
    lowering:    Lowering,
    depth:       usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with default options writing to the process
    /// standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stdout(Rc::new(RefCell::new(StdoutConnection)))
    }

    /// Creates a context whose `stdout()` connection is `stdout`.
    ///
    /// # Example
    /// ```
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// use statcore::interpreter::{connection::TextConnection, evaluator::core::Context};
    ///
    /// let out = Rc::new(RefCell::new(TextConnection::new(Vec::new())));
    /// let mut ctx = Context::with_stdout(out.clone());
    /// ctx.run("print(1:3)").unwrap();
    /// assert_eq!(out.borrow().output(), vec!["[1] 1 2 3"]);
    /// ```
    #[must_use]
    pub fn with_stdout(stdout: Rc<RefCell<dyn Connection>>) -> Self {
        let base = Environment::new();
        install_builtins(&base);
        base.define("T", Value::logical(true));
        base.define("F", Value::logical(false));
        base.define("pi", Value::double(std::f64::consts::PI));
        Self { global: base.child(),
               base,
               options: Options::default(),
               warnings: Vec::new(),
               stdout,
               native: None,
               lowering: Lowering::new(),
               depth: 0 }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Registers the target of `.Call`.
    pub fn set_native_call(&mut self, native: Rc<dyn NativeCall>) {
        self.native = Some(native);
    }

    /// The `.Call` target, if one is registered.
    #[must_use]
    pub fn native_call(&self) -> Option<Rc<dyn NativeCall>> {
        self.native.clone()
    }

    /// The connection `print` and `stdout()` write to.
    #[must_use]
    pub fn stdout(&self) -> Rc<RefCell<dyn Connection>> {
        Rc::clone(&self.stdout)
    }

    /// The frame holding the builtins.
    #[must_use]
    pub const fn base(&self) -> &Environment {
        &self.base
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Drains the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Parses, lowers and evaluates `source` in the global frame.
    ///
    /// A top-level `return(x)` ends the program with `x`.
    ///
    /// # Errors
    /// The first parse, lowering or runtime error.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::evaluator::core::Context;
    ///
    /// let mut ctx = Context::new();
    /// let v = ctx.run("x <- c(1, 2, 3)\nx[2] <- 10\nsum(x)").unwrap();
    /// assert!(v.identical(&statcore::interpreter::value::Value::double(14.0)));
    /// ```
    pub fn run(&mut self, source: &str) -> Result<Value, Error> {
        let program = parse(source)?;
        let node = self.lowering.lower_program(&program)?;
        let global = self.global.clone();
        match self.eval(&node, &global) {
            Ok(value) | Err(RuntimeError::Return { value }) => Ok(value),
            Err(e) => Err(e.into()),
        }
    }

    /// Evaluates a node in `env`.
    ///
    /// This is the main entry point for node evaluation. Non-local exits
    /// (`break`, `next`, `return`) travel on the error channel and are caught
    /// by the loop or function that owns them.
    pub fn eval(&mut self, node: &Node, env: &Environment) -> EvalResult<Value> {
        match node {
            Node::Constant { value, .. } => Ok(value.clone()),
            Node::ReadVariable { name, mode, line } => self.read_variable(name, *mode, env, *line),
            Node::WriteVariable { name, value, mode, .. } => {
                let value = self.eval(value, env)?;
                env.write(name, value.clone(), *mode, &self.global);
                Ok(value)
            },
            Node::Remove { name, .. } => {
                env.remove(name);
                Ok(Value::Null)
            },
            Node::RemoveAndAnswer { name, .. } => {
                env.remove(name)
                   .ok_or(RuntimeError::InvariantViolation { details: "replacement slot was not bound" })
            },
            Node::Call { function,
                         arguments,
                         cache,
                         line, } => self.eval_call(function, arguments, cache, env, *line),
            Node::Function { formals, body, .. } => {
                Ok(Value::Closure(Rc::new(Closure { formals: Rc::clone(formals),
                                                    body:    Rc::clone(body),
                                                    env:     env.clone(), })))
            },
            Node::Sequence { nodes, .. } => {
                let mut last = Value::Null;
                for node in nodes {
                    last = self.eval(node, env)?;
                }
                Ok(last)
            },
            Node::Replacement { steps, .. } => self.eval_replacement(steps, env),
            Node::If { condition,
                       then_branch,
                       else_branch,
                       line, } => {
                self.eval_if(condition, then_branch, else_branch.as_deref(), env, *line)
            },
            Node::While { condition, body, line } => self.eval_while(condition, body, env, *line),
            Node::Repeat { body, .. } => self.eval_repeat(body, env),
            Node::For { variable,
                        sequence,
                        body,
                        line, } => self.eval_for(variable, sequence, body, env, *line),
            Node::Break { line } => Err(RuntimeError::Break { line: *line }),
            Node::Next { line } => Err(RuntimeError::Next { line: *line }),
            Node::Logical { op, left, right, line } => {
                self.eval_short_circuit(*op, left, right, env, *line)
            },
            Node::AccessVector { vector,
                                 positions,
                                 drop,
                                 exact,
                                 kind,
                                 line, } => {
                self.eval_access_vector(vector, positions, drop.as_deref(), exact.as_deref(), *kind, env, *line)
            },
            Node::UpdateVector { vector,
                                 positions,
                                 value,
                                 kind,
                                 line, } => self.eval_update_vector(vector, positions, value, *kind, env, *line),
            Node::AccessField { object, name, kind, line } => {
                let object = self.eval(object, env)?;
                self.access_field(&object, name, *kind, *line)
            },
            Node::UpdateField { object,
                                name,
                                value,
                                kind,
                                line, } => {
                let object = self.eval(object, env)?;
                let value = self.eval(value, env)?;
                self.update_field(object, name, value, *kind, *line)
            },
        }
    }

    fn read_variable(&self,
                     name: &str,
                     mode: ReadMode,
                     env: &Environment,
                     line: usize)
                     -> EvalResult<Value> {
        match env.read(name, mode) {
            Some(Value::Missing) => Err(RuntimeError::ArgumentMissing { name: name.to_string(),
                                                                        line }),
            Some(value) => Ok(value),
            None if mode == ReadMode::Function => {
                Err(RuntimeError::UnknownFunction { name: name.to_string(),
                                                    line })
            },
            None => Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                                        line }),
        }
    }

    /// Runs the five replacement steps. When a step fails the hidden
    /// bindings are removed before the error propagates.
    fn eval_replacement(&mut self, steps: &[Node; 5], env: &Environment) -> EvalResult<Value> {
        for step in &steps[..4] {
            if let Err(e) = self.eval(step, env) {
                env.remove(TMP);
                if let Node::RemoveAndAnswer { name, .. } = &steps[4] {
                    env.remove(name);
                }
                return Err(e);
            }
        }
        self.eval(&steps[4], env)
    }

    /// Records warnings raised at `line`, applying the `warn` option.
    ///
    /// # Errors
    /// [`RuntimeError::WarningAsError`] for the first warning when
    /// `warn >= 2`.
    pub fn signal(&mut self, kinds: Vec<WarningKind>, line: usize) -> EvalResult<()> {
        for kind in kinds {
            let warning = Warning { kind, line };
            match self.options.warn {
                level if level < 0 => {},
                0 => self.warnings.push(warning),
                1 => {
                    warn!(id = warning.id(), line, "{}", warning.kind);
                    self.warnings.push(warning);
                },
                _ => return Err(RuntimeError::WarningAsError { warning }),
            }
        }
        Ok(())
    }

    /// Records one warning; see [`Context::signal`].
    pub fn signal_one(&mut self, kind: WarningKind, line: usize) -> EvalResult<()> {
        self.signal(vec![kind], line)
    }

    /// Enters a closure frame.
    pub(crate) fn enter(&mut self, line: usize) -> EvalResult<()> {
        if self.depth >= self.options.max_depth {
            return Err(RuntimeError::NestingTooDeep { line });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves a closure frame.
    pub(crate) const fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.global.clear();
        self.base.clear();
    }
}
