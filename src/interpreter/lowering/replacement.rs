use tracing::debug;

use crate::{
    ast::{Argument, Constant, Expr, FieldKind, IndexKind},
    error::LoweringError,
    interpreter::{
        lowering::{Lowering, LoweringResult, call_node},
        node::{ActualArgument, Node, ReadMode, TMP, WriteMode},
    },
};

/// The shapes a replacement receiver can take.
///
/// A receiver chain such as `names(x$a)[2]` is a sequence of these, read
/// from the outside in, that must end in a [`Receiver::Variable`].
#[derive(Debug, Clone, Copy)]
pub enum Receiver<'a> {
    /// `x`, or the string `"x"`.
    Variable {
        name: &'a str,
    },
    /// `object[...]` or `object[[...]]`.
    Index {
        object:    &'a Expr,
        arguments: &'a [Argument],
        kind:      IndexKind,
        line:      usize,
    },
    /// `object$name` or `object@name`.
    Field {
        object: &'a Expr,
        name:   &'a str,
        kind:   FieldKind,
        line:   usize,
    },
    /// `f(object, extra...)`, updated through `f<-`.
    Call {
        function: &'a str,
        object:   &'a Expr,
        extra:    &'a [Argument],
        line:     usize,
    },
}

impl<'a> Receiver<'a> {
    /// Classifies one link of a receiver chain.
    ///
    /// # Errors
    /// [`LoweringError::UnsupportedReceiverShape`] for anything that is not a
    /// variable, an index, a field access or a call of a named function
    /// with at least one argument.
    pub fn classify(expr: &'a Expr) -> LoweringResult<Self> {
        match expr {
            Expr::Symbol { name, .. }
            | Expr::Constant { value: Constant::Character(Some(name)),
                               .. } => Ok(Self::Variable { name }),
            Expr::Index { object,
                          arguments,
                          kind,
                          line, } => Ok(Self::Index { object,
                                                      arguments,
                                                      kind: *kind,
                                                      line: *line }),
            Expr::Field { object,
                          name,
                          kind,
                          line, } => Ok(Self::Field { object,
                                                      name,
                                                      kind: *kind,
                                                      line: *line }),
            Expr::Call { function,
                         arguments,
                         line, } => match (function.as_ref(), arguments.split_first()) {
                (Expr::Symbol { name, .. }
                 | Expr::Constant { value: Constant::Character(Some(name)),
                                    .. },
                 Some((Argument { value: Some(object), .. }, extra))) => {
                    Ok(Self::Call { function: name,
                                    object,
                                    extra,
                                    line: *line })
                },
                _ => Err(unsupported(expr)),
            },
            _ => Err(unsupported(expr)),
        }
    }

    /// The expression one link further in, `None` for the variable itself.
    #[must_use]
    pub const fn object(self) -> Option<&'a Expr> {
        match self {
            Self::Variable { .. } => None,
            Self::Index { object, .. } | Self::Field { object, .. } | Self::Call { object, .. } => {
                Some(object)
            },
        }
    }
}

fn unsupported(expr: &Expr) -> LoweringError {
    LoweringError::UnsupportedReceiverShape { shape: expr.describe(),
                                              line:  expr.line(), }
}

/// Follows a receiver chain down to the name of the variable it updates.
///
/// # Errors
/// [`LoweringError::UnsupportedReceiverShape`] when the chain does not end
/// in a variable.
///
/// # Example
/// ```
/// use statcore::{interpreter::lowering::replacement::root_variable, parse};
///
/// let program = parse("names(x$a)[2]").unwrap();
/// assert_eq!(root_variable(&program[0]).unwrap(), "x");
/// ```
pub fn root_variable(target: &Expr) -> LoweringResult<&str> {
    let mut receiver = Receiver::classify(target)?;
    loop {
        match receiver {
            Receiver::Variable { name } => return Ok(name),
            other => {
                if let Some(object) = other.object() {
                    receiver = Receiver::classify(object)?;
                }
            },
        }
    }
}

impl Lowering {
    /// Lowers `target <- value` for a non-variable target into the 5-slot
    /// replacement sequence.
    pub(super) fn lower_replacement(&mut self,
                                    target: &Expr,
                                    value: &Expr,
                                    mode: WriteMode,
                                    line: usize)
                                    -> LoweringResult<Node> {
        let root = root_variable(target)?.to_string();
        let rhs_name = format!("*rhs*{}", self.next_replacement());
        let rhs = self.lower(value)?;
        let rebuilt = self.rebuild(target,
                                   Node::ReadVariable { name: rhs_name.clone(),
                                                        mode: ReadMode::Value,
                                                        line })?;
        let receiver_read = match mode {
            WriteMode::Local => ReadMode::Value,
            WriteMode::Super => ReadMode::Super,
        };
        debug!(receiver = %target.describe(), root = %root, slot = %rhs_name, "lowered replacement");

        let steps = [Node::WriteVariable { name: rhs_name.clone(),
                                           value: Box::new(rhs),
                                           mode: WriteMode::Local,
                                           line },
                     Node::WriteVariable { name: TMP.to_string(),
                                           value: Box::new(Node::ReadVariable { name: root.clone(),
                                                                                mode: receiver_read,
                                                                                line }),
                                           mode: WriteMode::Local,
                                           line },
                     Node::WriteVariable { name: root,
                                           value: Box::new(rebuilt),
                                           mode,
                                           line },
                     Node::Remove { name: TMP.to_string(),
                                    line },
                     Node::RemoveAndAnswer { name: rhs_name,
                                             line }];
        Ok(Node::Replacement { steps: Box::new(steps),
                               line })
    }

    /// Threads `value` from the innermost receiver outwards: each link
    /// updates the structure read from `*tmp*` and hands the result to the
    /// next link, until the variable is reached.
    fn rebuild(&mut self, target: &Expr, value: Node) -> LoweringResult<Node> {
        match Receiver::classify(target)? {
            Receiver::Variable { .. } => Ok(value),
            Receiver::Index { object,
                              arguments,
                              kind,
                              line, } => {
                let vector = Box::new(self.getter(object)?);
                let index = self.lower_index(arguments, kind)?;
                let updated = Node::UpdateVector { vector,
                                                   positions: index.positions,
                                                   value: Box::new(value),
                                                   kind,
                                                   line };
                self.rebuild(object, updated)
            },
            Receiver::Field { object,
                              name,
                              kind,
                              line, } => {
                let updated = Node::UpdateField { object: Box::new(self.getter(object)?),
                                                  name: name.to_string(),
                                                  value: Box::new(value),
                                                  kind,
                                                  line };
                self.rebuild(object, updated)
            },
            Receiver::Call { function,
                             object,
                             extra,
                             line, } => {
                let mut arguments = vec![ActualArgument::Value { name: None,
                                                                 node: self.getter(object)?, }];
                arguments.extend(self.lower_arguments(extra)?);
                arguments.push(ActualArgument::Value { name: Some("value".to_string()),
                                                       node: value, });
                let updated = call_node(Node::ReadVariable { name: format!("{function}<-"),
                                                             mode: ReadMode::Function,
                                                             line },
                                        arguments,
                                        line);
                self.rebuild(object, updated)
            },
        }
    }

    /// Re-reads a receiver link with its variable replaced by `*tmp*`.
    fn getter(&mut self, expr: &Expr) -> LoweringResult<Node> {
        match Receiver::classify(expr)? {
            Receiver::Variable { .. } => Ok(Node::ReadVariable { name: TMP.to_string(),
                                                                 mode: ReadMode::Value,
                                                                 line: expr.line(), }),
            Receiver::Index { object,
                              arguments,
                              kind,
                              line, } => {
                let vector = Box::new(self.getter(object)?);
                let index = self.lower_index(arguments, kind)?;
                Ok(Node::AccessVector { vector,
                                        positions: index.positions,
                                        drop: index.drop,
                                        exact: index.exact,
                                        kind,
                                        line })
            },
            Receiver::Field { object,
                              name,
                              kind,
                              line, } => Ok(Node::AccessField { object: Box::new(self.getter(object)?),
                                                                name: name.to_string(),
                                                                kind,
                                                                line }),
            Receiver::Call { function,
                             object,
                             extra,
                             line, } => {
                let mut arguments = vec![ActualArgument::Value { name: None,
                                                                 node: self.getter(object)?, }];
                arguments.extend(self.lower_arguments(extra)?);
                Ok(call_node(Node::ReadVariable { name: function.to_string(),
                                                  mode: ReadMode::Function,
                                                  line },
                             arguments,
                             line))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn lower(source: &str) -> Result<String, LoweringError> {
        let program = parse(source).expect("parses");
        Lowering::new().lower_program(&program).map(|node| format!("{node:?}"))
    }

    #[test]
    fn variable_receiver() {
        assert_eq!(lower("names(x) <- y").unwrap(),
                   "[[(<- *rhs*1 y), (<- *tmp* x), (<- x (fn names<- *tmp* value=*rhs*1)), (rm \
                    *tmp*), (rm-answer *rhs*1)]]");
    }

    #[test]
    fn nested_index_threads_inner_to_outer() {
        assert_eq!(lower("names(x[1])[2] <- \"b\"").unwrap(),
                   "[[(<- *rhs*1 \"b\"), (<- *tmp* x), (<- x ([<- *tmp* 1 (fn names<- ([ *tmp* \
                    1) value=([<- (fn names ([ *tmp* 1)) 2 *rhs*1)))), (rm *tmp*), (rm-answer \
                    *rhs*1)]]");
    }

    #[test]
    fn field_and_slot_receivers() {
        assert!(lower("x$a <- 1").unwrap().contains("(<- x ($<- *tmp* a *rhs*1))"));
        assert!(lower("x@s <- 1").unwrap().contains("(<- x (@<- *tmp* s *rhs*1))"));
    }

    #[test]
    fn call_receiver_updates_inner_result() {
        assert!(lower("f(g(x)) <- 1").unwrap()
                                     .contains("(<- x (fn g<- *tmp* value=(fn f<- (fn g *tmp*) \
                                                value=*rhs*1)))"));
    }

    #[test]
    fn superassignment_reads_receiver_from_parent() {
        let lowered = lower("x[1] <<- 2").unwrap();
        assert!(lowered.contains("(<- *tmp* super x)"));
        assert!(lowered.contains("(<<- x ([<- *tmp* 1 *rhs*1))"));
    }

    #[test]
    fn string_root_is_a_variable() {
        assert!(lower("\"x\"[1] <- 2").unwrap().contains("(<- x ([<- *tmp* 1 *rhs*1))"));
    }

    #[test]
    fn hidden_slots_are_unique() {
        let lowered = lower("x[1] <- 1\ny[2] <- 2").unwrap();
        assert!(lowered.contains("*rhs*1"));
        assert!(lowered.contains("*rhs*2"));
    }

    #[test]
    fn unsupported_receivers() {
        assert_eq!(lower("f()[1] <- 2").unwrap_err().id(), "UNSUPPORTED_RECEIVER_SHAPE");
        assert_eq!(lower("(1 + x)[1] <- 2").unwrap_err().id(), "UNSUPPORTED_RECEIVER_SHAPE");
        assert_eq!(lower("1 <- 2").unwrap_err().id(), "INVALID_LHS");
    }

    #[test]
    fn drop_first_occurrence_wins() {
        let lowered = lower("x[1, drop = FALSE, drop = TRUE]").unwrap();
        assert_eq!(lowered, "[([ x 1 TRUE)]");
    }
}
