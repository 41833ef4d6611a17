/// Desugaring of complex assignments into the 5-slot replacement sequence.
pub mod replacement;

use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{Argument, BinaryOperator, Constant, Expr, IndexKind},
    error::LoweringError,
    interpreter::{
        matcher::PrepareArguments,
        node::{ActualArgument, Formals, Node, Position, ReadMode, ShortCircuit, VARARGS, WriteMode},
        value::{ComplexNumber, Logical, NA_INTEGER, NA_REAL, Value, Vector},
    },
};

pub type LoweringResult<T> = Result<T, LoweringError>;

/// Turns surface trees into executable nodes.
///
/// One `Lowering` may lower several programs; the names of the hidden
/// replacement slots stay unique across all of them.
#[derive(Debug, Default)]
pub struct Lowering {
    replacements: usize,
}

impl Lowering {
    /// Creates a lowering pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowers a whole program into one sequence node.
    ///
    /// # Errors
    /// The first [`LoweringError`] of any expression.
    ///
    /// # Example
    /// ```
    /// use statcore::{interpreter::lowering::Lowering, parse};
    ///
    /// let program = parse("x <- 1\nx + 2").unwrap();
    /// let node = Lowering::new().lower_program(&program).unwrap();
    /// assert_eq!(format!("{node:?}"), "[(<- x 1), (fn + x 2)]");
    /// ```
    pub fn lower_program(&mut self, program: &[Expr]) -> LoweringResult<Node> {
        let line = program.first().map_or(1, Expr::line);
        let nodes = program.iter()
                           .map(|expr| self.lower(expr))
                           .collect::<LoweringResult<Vec<_>>>()?;
        Ok(Node::Sequence { nodes, line })
    }

    /// Lowers one expression.
    ///
    /// # Errors
    /// [`LoweringError`] when an assignment target cannot be desugared.
    pub fn lower(&mut self, expr: &Expr) -> LoweringResult<Node> {
        Ok(match expr {
            Expr::Constant { value, line } => Node::Constant { value: constant_value(value),
                                                               line:  *line, },
            Expr::Symbol { name, line } => Node::ReadVariable { name: name.clone(),
                                                                mode: ReadMode::Value,
                                                                line: *line, },
            Expr::Call { function,
                         arguments,
                         line, } => {
                let function = match function.as_ref() {
                    Expr::Symbol { name, line }
                    | Expr::Constant { value: Constant::Character(Some(name)),
                                       line, } => Node::ReadVariable { name: name.clone(),
                                                                       mode: ReadMode::Function,
                                                                       line: *line, },
                    other => self.lower(other)?,
                };
                let arguments = self.lower_arguments(arguments)?;
                call_node(function, arguments, *line)
            },
            Expr::Unary { op, operand, line } => {
                let operand = self.lower(operand)?;
                builtin_call(op.function_name(), vec![operand], *line)
            },
            Expr::Binary { left, op, right, line } => {
                let left = Box::new(self.lower(left)?);
                let right = Box::new(self.lower(right)?);
                match op {
                    BinaryOperator::AndAnd => Node::Logical { op: ShortCircuit::And,
                                                              left,
                                                              right,
                                                              line: *line },
                    BinaryOperator::OrOr => Node::Logical { op: ShortCircuit::Or,
                                                            left,
                                                            right,
                                                            line: *line },
                    _ => builtin_call(op.function_name(), vec![*left, *right], *line),
                }
            },
            Expr::Function { parameters, body, line } => {
                let defaults = parameters.iter()
                                         .map(|p| p.default.as_ref().map(|d| self.lower(d)).transpose())
                                         .collect::<LoweringResult<Vec<_>>>()?;
                let names: Vec<String> = parameters.iter().map(|p| p.name.clone()).collect();
                let varargs = names.iter().position(|n| n == VARARGS);
                Node::Function { formals: Rc::new(Formals { names,
                                                            defaults,
                                                            varargs }),
                                 body:    Rc::new(self.lower(body)?),
                                 line:    *line, }
            },
            Expr::Block { expressions, line } => {
                Node::Sequence { nodes: expressions.iter()
                                                   .map(|e| self.lower(e))
                                                   .collect::<LoweringResult<Vec<_>>>()?,
                                 line:  *line, }
            },
            Expr::If { condition,
                       then_branch,
                       else_branch,
                       line, } => Node::If { condition:   Box::new(self.lower(condition)?),
                                             then_branch: Box::new(self.lower(then_branch)?),
                                             else_branch: match else_branch {
                                                 Some(e) => Some(Box::new(self.lower(e)?)),
                                                 None => None,
                                             },
                                             line:        *line, },
            Expr::For { variable,
                        sequence,
                        body,
                        line, } => Node::For { variable: variable.clone(),
                                               sequence: Box::new(self.lower(sequence)?),
                                               body:     Box::new(self.lower(body)?),
                                               line:     *line, },
            Expr::While { condition, body, line } => {
                Node::While { condition: Box::new(self.lower(condition)?),
                              body:      Box::new(self.lower(body)?),
                              line:      *line, }
            },
            Expr::Repeat { body, line } => Node::Repeat { body: Box::new(self.lower(body)?),
                                                          line: *line, },
            Expr::Break { line } => Node::Break { line: *line },
            Expr::Next { line } => Node::Next { line: *line },
            Expr::Index { object,
                          arguments,
                          kind,
                          line, } => {
                let vector = Box::new(self.lower(object)?);
                let index = self.lower_index(arguments, *kind)?;
                Node::AccessVector { vector,
                                     positions: index.positions,
                                     drop: index.drop,
                                     exact: index.exact,
                                     kind: *kind,
                                     line: *line }
            },
            Expr::Field { object,
                          name,
                          kind,
                          line, } => Node::AccessField { object: Box::new(self.lower(object)?),
                                                         name:   name.clone(),
                                                         kind:   *kind,
                                                         line:   *line, },
            Expr::Assign { target,
                           value,
                           superassign,
                           line, } => self.lower_assignment(target, value, *superassign, *line)?,
        })
    }

    /// Lowers call arguments, turning a bare `...` into an expansion.
    pub(crate) fn lower_arguments(&mut self,
                                  arguments: &[Argument])
                                  -> LoweringResult<Vec<ActualArgument>> {
        arguments.iter()
                 .map(|argument| {
                     Ok(match (&argument.name, &argument.value) {
                         (None, Some(Expr::Symbol { name, .. })) if name == VARARGS => {
                             ActualArgument::Expand
                         },
                         (name, Some(value)) => ActualArgument::Value { name: name.clone(),
                                                                        node: self.lower(value)?, },
                         (name, None) => ActualArgument::Empty { name: name.clone() },
                     })
                 })
                 .collect()
    }

    /// Splits index arguments into positions and the `drop` (for `[`) or
    /// `exact` (for `[[`) option.
    ///
    /// Only the first argument with the option's name is taken; later ones
    /// are ordinary positions.
    pub(crate) fn lower_index(&mut self,
                              arguments: &[Argument],
                              kind: IndexKind)
                              -> LoweringResult<LoweredIndex> {
        let option_name = match kind {
            IndexKind::Subset => "drop",
            IndexKind::Element => "exact",
        };
        let mut option = None;
        let mut positions = Vec::new();
        let mut taken = false;
        for argument in arguments {
            if !taken && argument.name.as_deref() == Some(option_name) {
                taken = true;
                option = match &argument.value {
                    Some(value) => Some(Box::new(self.lower(value)?)),
                    None => None,
                };
                continue;
            }
            positions.push(&argument.value);
        }
        let count = positions.len();
        let positions = positions.into_iter()
                                 .enumerate()
                                 .map(|(index, value)| {
                                     Ok(Position { node: match value {
                                                       Some(v) => Some(self.lower(v)?),
                                                       None => None,
                                                   },
                                                   index,
                                                   count })
                                 })
                                 .collect::<LoweringResult<Vec<_>>>()?;
        Ok(match kind {
            IndexKind::Subset => LoweredIndex { positions,
                                                drop: option,
                                                exact: None },
            IndexKind::Element => LoweredIndex { positions,
                                                 drop: None,
                                                 exact: option },
        })
    }

    fn lower_assignment(&mut self,
                        target: &Expr,
                        value: &Expr,
                        superassign: bool,
                        line: usize)
                        -> LoweringResult<Node> {
        let mode = if superassign { WriteMode::Super } else { WriteMode::Local };
        match target {
            Expr::Symbol { name, .. }
            | Expr::Constant { value: Constant::Character(Some(name)),
                               .. } => Ok(Node::WriteVariable { name: name.clone(),
                                                                value: Box::new(self.lower(value)?),
                                                                mode,
                                                                line }),
            Expr::Constant { .. } => Err(LoweringError::InvalidAssignmentTarget { line }),
            _ => self.lower_replacement(target, value, mode, line),
        }
    }

    pub(crate) const fn next_replacement(&mut self) -> usize {
        self.replacements += 1;
        self.replacements
    }
}

/// The parts of an index expression after lowering.
pub(crate) struct LoweredIndex {
    pub positions: Vec<Position>,
    pub drop:      Option<Box<Node>>,
    pub exact:     Option<Box<Node>>,
}

/// Builds a call node with an empty argument cache.
pub(crate) fn call_node(function: Node, arguments: Vec<ActualArgument>, line: usize) -> Node {
    Node::Call { function: Box::new(function),
                 arguments,
                 cache: RefCell::new(PrepareArguments::default()),
                 line }
}

/// Builds a call of the function `name` with positional arguments.
pub(crate) fn builtin_call(name: &str, arguments: Vec<Node>, line: usize) -> Node {
    call_node(Node::ReadVariable { name: name.to_string(),
                                   mode: ReadMode::Function,
                                   line },
              arguments.into_iter()
                       .map(|node| ActualArgument::Value { name: None, node })
                       .collect(),
              line)
}

fn constant_value(constant: &Constant) -> Value {
    match constant {
        Constant::Null => Value::Null,
        Constant::Logical(Some(b)) => Value::logical(*b),
        Constant::Logical(None) => Vector::logical(Logical::Na).into(),
        Constant::Integer(i) => Value::integer(i.unwrap_or(NA_INTEGER)),
        Constant::Double(d) => Value::double(d.unwrap_or(NA_REAL)),
        Constant::Imaginary(x) => Vector::complex(ComplexNumber::new(0.0, *x)).into(),
        Constant::Character(s) => Vector::character(s.as_deref()).into(),
    }
}
