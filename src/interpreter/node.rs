use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::{FieldKind, IndexKind},
    interpreter::{matcher::PrepareArguments, value::Value},
};

/// Name of the hidden variable holding the receiver during a replacement.
pub const TMP: &str = "*tmp*";
/// Name of the variadic formal.
pub const VARARGS: &str = "...";

/// The formal parameter list of a function.
#[derive(Debug, Default)]
pub struct Formals {
    /// Parameter names in declaration order.
    pub names:    Vec<String>,
    /// Lowered default expressions, one per name.
    pub defaults: Vec<Option<Node>>,
    /// Index of `...` in `names`, if present.
    pub varargs:  Option<usize>,
}

impl Formals {
    /// Formals without defaults, as used by builtins.
    #[must_use]
    pub fn from_names(names: &[&str]) -> Self {
        Self { names:    names.iter().map(ToString::to_string).collect(),
               defaults: names.iter().map(|_| None).collect(),
               varargs:  names.iter().position(|n| *n == VARARGS), }
    }

    /// Number of formals, `...` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the function takes no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Where a variable read starts looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// The current frame, then its parents.
    Value,
    /// Like `Value`, skipping bindings that are not functions.
    Function,
    /// The parent of the current frame, as the receiver read of `<<-`.
    Super,
}

/// Where a variable write lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The current frame.
    Local,
    /// The nearest enclosing frame that binds the name, else the global one.
    Super,
}

/// The two short-circuit operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortCircuit {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// One argument as written at a call site.
#[derive(Debug)]
pub enum ActualArgument {
    /// An expression, possibly named.
    Value {
        /// The argument name.
        name: Option<String>,
        /// The lowered expression.
        node: Node,
    },
    /// An empty argument such as the second one in `f(1, )`.
    Empty {
        /// The argument name of `f(x = )`.
        name: Option<String>,
    },
    /// `...` passed on from the caller.
    Expand,
}

/// One position of an index expression.
///
/// A position is resolved against the whole vector when `count == 1`, or
/// against `dim[index]` when the index has `count` positions in total.
#[derive(Debug)]
pub struct Position {
    /// The lowered position, `None` for an empty position (all elements).
    pub node:  Option<Node>,
    /// Zero-based index of this position.
    pub index: usize,
    /// Total number of positions.
    pub count: usize,
}

/// The lowered, executable form of the program.
pub enum Node {
    /// A literal value.
    Constant {
        value: Value,
        line:  usize,
    },
    /// Reads a variable.
    ReadVariable {
        name: String,
        mode: ReadMode,
        line: usize,
    },
    /// Evaluates `value` and binds it to `name`; answers the value.
    WriteVariable {
        name:  String,
        value: Box<Self>,
        mode:  WriteMode,
        line:  usize,
    },
    /// Removes a local binding; answers `NULL`.
    Remove {
        name: String,
        line: usize,
    },
    /// Removes a local binding and answers the value it held.
    RemoveAndAnswer {
        name: String,
        line: usize,
    },
    /// A call with its per-site argument cache.
    Call {
        function:  Box<Self>,
        arguments: Vec<ActualArgument>,
        cache:     RefCell<PrepareArguments>,
        line:      usize,
    },
    /// A function definition; evaluates to a closure over the current frame.
    Function {
        formals: Rc<Formals>,
        body:    Rc<Self>,
        line:    usize,
    },
    /// Evaluates nodes in order and answers the last (`NULL` if empty).
    Sequence {
        nodes: Vec<Self>,
        line:  usize,
    },
    /// The desugared form of a complex assignment.
    ///
    /// 1. `*rhs*N <- rhs`
    /// 2. `*tmp* <- receiver variable`
    /// 3. `receiver variable <- rebuilt value`
    /// 4. remove `*tmp*`
    /// 5. remove `*rhs*N`, answering its value
    Replacement {
        steps: Box<[Self; 5]>,
        line:  usize,
    },
    If {
        condition:   Box<Self>,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
        line:        usize,
    },
    While {
        condition: Box<Self>,
        body:      Box<Self>,
        line:      usize,
    },
    Repeat {
        body: Box<Self>,
        line: usize,
    },
    For {
        variable: String,
        sequence: Box<Self>,
        body:     Box<Self>,
        line:     usize,
    },
    Break {
        line: usize,
    },
    Next {
        line: usize,
    },
    /// `&&` and `||`, which evaluate the right operand only when needed.
    Logical {
        op:    ShortCircuit,
        left:  Box<Self>,
        right: Box<Self>,
        line:  usize,
    },
    /// `x[...]` and `x[[...]]`.
    AccessVector {
        vector:    Box<Self>,
        positions: Vec<Position>,
        drop:      Option<Box<Self>>,
        exact:     Option<Box<Self>>,
        kind:      IndexKind,
        line:      usize,
    },
    /// The value of `x[...] <- value` and `x[[...]] <- value`, without the
    /// write back.
    UpdateVector {
        vector:    Box<Self>,
        positions: Vec<Position>,
        value:     Box<Self>,
        kind:      IndexKind,
        line:      usize,
    },
    /// `x$name` and `x@name`.
    AccessField {
        object: Box<Self>,
        name:   String,
        kind:   FieldKind,
        line:   usize,
    },
    /// The value of `x$name <- value` and `x@name <- value`, without the
    /// write back.
    UpdateField {
        object: Box<Self>,
        name:   String,
        value:  Box<Self>,
        kind:   FieldKind,
        line:   usize,
    },
}

impl Node {
    /// The source line of the node.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Constant { line, .. }
            | Self::ReadVariable { line, .. }
            | Self::WriteVariable { line, .. }
            | Self::Remove { line, .. }
            | Self::RemoveAndAnswer { line, .. }
            | Self::Call { line, .. }
            | Self::Function { line, .. }
            | Self::Sequence { line, .. }
            | Self::Replacement { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::Repeat { line, .. }
            | Self::For { line, .. }
            | Self::Break { line }
            | Self::Next { line }
            | Self::Logical { line, .. }
            | Self::AccessVector { line, .. }
            | Self::UpdateVector { line, .. }
            | Self::AccessField { line, .. }
            | Self::UpdateField { line, .. } => *line,
        }
    }
}

/// Prints the tree in a compact prefix form, used by tests and `tracing`
/// output.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { value, .. } => write!(f, "{value:?}"),
            Self::ReadVariable { name, mode, .. } => match mode {
                ReadMode::Value => write!(f, "{name}"),
                ReadMode::Function => write!(f, "fn {name}"),
                ReadMode::Super => write!(f, "super {name}"),
            },
            Self::WriteVariable { name, value, mode, .. } => match mode {
                WriteMode::Local => write!(f, "(<- {name} {value:?})"),
                WriteMode::Super => write!(f, "(<<- {name} {value:?})"),
            },
            Self::Remove { name, .. } => write!(f, "(rm {name})"),
            Self::RemoveAndAnswer { name, .. } => write!(f, "(rm-answer {name})"),
            Self::Call { function, arguments, .. } => {
                write!(f, "({function:?}")?;
                for argument in arguments {
                    match argument {
                        ActualArgument::Value { name: Some(name), node } => {
                            write!(f, " {name}={node:?}")?;
                        },
                        ActualArgument::Value { name: None, node } => write!(f, " {node:?}")?,
                        ActualArgument::Empty { name: Some(name) } => write!(f, " {name}=")?,
                        ActualArgument::Empty { name: None } => write!(f, " _")?,
                        ActualArgument::Expand => write!(f, " ...")?,
                    }
                }
                write!(f, ")")
            },
            Self::Function { formals, body, .. } => {
                write!(f, "(function ({}) {body:?})", formals.names.join(" "))
            },
            Self::Sequence { nodes, .. } => f.debug_list().entries(nodes).finish(),
            Self::Replacement { steps, .. } => f.debug_list().entries(steps.iter()).finish(),
            Self::If { condition,
                       then_branch,
                       else_branch,
                       .. } => match else_branch {
                Some(e) => write!(f, "(if {condition:?} {then_branch:?} {e:?})"),
                None => write!(f, "(if {condition:?} {then_branch:?})"),
            },
            Self::While { condition, body, .. } => write!(f, "(while {condition:?} {body:?})"),
            Self::Repeat { body, .. } => write!(f, "(repeat {body:?})"),
            Self::For { variable,
                        sequence,
                        body,
                        .. } => write!(f, "(for {variable} {sequence:?} {body:?})"),
            Self::Break { .. } => write!(f, "break"),
            Self::Next { .. } => write!(f, "next"),
            Self::Logical { op, left, right, .. } => match op {
                ShortCircuit::And => write!(f, "(&& {left:?} {right:?})"),
                ShortCircuit::Or => write!(f, "(|| {left:?} {right:?})"),
            },
            Self::AccessVector { vector,
                                 positions,
                                 kind,
                                 .. } => {
                write!(f, "({} {vector:?}", index_name(*kind, false))?;
                write_positions(f, positions)?;
                write!(f, ")")
            },
            Self::UpdateVector { vector,
                                 positions,
                                 value,
                                 kind,
                                 .. } => {
                write!(f, "({} {vector:?}", index_name(*kind, true))?;
                write_positions(f, positions)?;
                write!(f, " {value:?})")
            },
            Self::AccessField { object, name, kind, .. } => match kind {
                FieldKind::Dollar => write!(f, "($ {object:?} {name})"),
                FieldKind::Slot => write!(f, "(@ {object:?} {name})"),
            },
            Self::UpdateField { object,
                                name,
                                value,
                                kind,
                                .. } => match kind {
                FieldKind::Dollar => write!(f, "($<- {object:?} {name} {value:?})"),
                FieldKind::Slot => write!(f, "(@<- {object:?} {name} {value:?})"),
            },
        }
    }
}

const fn index_name(kind: IndexKind, update: bool) -> &'static str {
    match (kind, update) {
        (IndexKind::Subset, false) => "[",
        (IndexKind::Subset, true) => "[<-",
        (IndexKind::Element, false) => "[[",
        (IndexKind::Element, true) => "[[<-",
    }
}

fn write_positions(f: &mut fmt::Formatter<'_>, positions: &[Position]) -> fmt::Result {
    for position in positions {
        match &position.node {
            Some(node) => write!(f, " {node:?}")?,
            None => write!(f, " _")?,
        }
    }
    Ok(())
}
