use std::fmt::{self, Display};

/// A literal constant as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// `NULL`
    Null,
    /// `TRUE`, `FALSE` or `NA`.
    Logical(Option<bool>),
    /// An integer literal such as `1L`, or `NA_integer_` (`None`).
    Integer(Option<i32>),
    /// A numeric literal, `Inf`, `NaN`, or `NA_real_` (`None`).
    Double(Option<f64>),
    /// An imaginary literal such as `2i`.
    Imaginary(f64),
    /// A string literal, or `NA_character_` (`None`).
    Character(Option<String>),
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-x`
    Minus,
    /// `+x`
    Plus,
    /// `!x`
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
    /// `%%`
    Mod,
    /// `%/%`
    IntDiv,
    /// `:`
    Range,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&`
    And,
    /// `|`
    Or,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
}

impl BinaryOperator {
    /// The name of the function a binary operation calls.
    #[must_use]
    pub const fn function_name(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Mod => "%%",
            Self::IntDiv => "%/%",
            Self::Range => ":",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&",
            Self::Or => "|",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

impl UnaryOperator {
    /// The name of the function a unary operation calls.
    #[must_use]
    pub const fn function_name(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "!",
        }
    }
}

/// One argument of a call or index expression.
///
/// `value` is `None` for an empty argument, as in `x[1, ]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// The name given with `name = value`.
    pub name:  Option<String>,
    /// The argument expression.
    pub value: Option<Expr>,
}

/// One formal parameter of a function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The parameter name (`...` for the variadic formal).
    pub name:    String,
    /// The default expression, if any.
    pub default: Option<Expr>,
}

/// Distinguishes `x[i]` from `x[[i]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// `[`, which selects a sub-vector.
    Subset,
    /// `[[`, which selects one element.
    Element,
}

/// Distinguishes `x$name` from `x@name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `$`, a list element by name.
    Dollar,
    /// `@`, an attribute (slot) by name.
    Slot,
}

/// Represents any expression in the language.
///
/// Every node records the line on which it starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal.
    Constant {
        /// The literal value.
        value: Constant,
        /// The source line.
        line:  usize,
    },
    /// A variable reference.
    Symbol {
        /// The variable name.
        name: String,
        /// The source line.
        line: usize,
    },
    /// A function call `f(args)`.
    Call {
        /// The called expression.
        function:  Box<Self>,
        /// The arguments as written.
        arguments: Vec<Argument>,
        /// The source line.
        line:      usize,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Self>,
        /// The source line.
        line:    usize,
    },
    /// A binary operation.
    Binary {
        /// The left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// The right operand.
        right: Box<Self>,
        /// The source line.
        line:  usize,
    },
    /// `function(params) body`
    Function {
        /// The formal parameters.
        parameters: Vec<Parameter>,
        /// The function body.
        body:       Box<Self>,
        /// The source line.
        line:       usize,
    },
    /// `{ ... }`
    Block {
        /// The expressions of the block, in order.
        expressions: Vec<Self>,
        /// The source line.
        line:        usize,
    },
    /// `if (cond) a else b`
    If {
        /// The condition.
        condition:   Box<Self>,
        /// The branch taken when the condition is `TRUE`.
        then_branch: Box<Self>,
        /// The optional `else` branch.
        else_branch: Option<Box<Self>>,
        /// The source line.
        line:        usize,
    },
    /// `for (var in seq) body`
    For {
        /// The loop variable.
        variable: String,
        /// The iterated expression.
        sequence: Box<Self>,
        /// The loop body.
        body:     Box<Self>,
        /// The source line.
        line:     usize,
    },
    /// `while (cond) body`
    While {
        /// The condition.
        condition: Box<Self>,
        /// The loop body.
        body:      Box<Self>,
        /// The source line.
        line:      usize,
    },
    /// `repeat body`
    Repeat {
        /// The loop body.
        body: Box<Self>,
        /// The source line.
        line: usize,
    },
    /// `break`
    Break {
        /// The source line.
        line: usize,
    },
    /// `next`
    Next {
        /// The source line.
        line: usize,
    },
    /// `x[args]` or `x[[args]]`
    Index {
        /// The indexed expression.
        object:    Box<Self>,
        /// The positions and named options.
        arguments: Vec<Argument>,
        /// `[` or `[[`.
        kind:      IndexKind,
        /// The source line.
        line:      usize,
    },
    /// `x$name` or `x@name`
    Field {
        /// The accessed expression.
        object: Box<Self>,
        /// The field name.
        name:   String,
        /// `$` or `@`.
        kind:   FieldKind,
        /// The source line.
        line:   usize,
    },
    /// `target <- value`, `target = value`, `value -> target` and the
    /// `<<-` forms.
    Assign {
        /// The assignment target.
        target:      Box<Self>,
        /// The assigned expression.
        value:       Box<Self>,
        /// `true` for `<<-` and `->>`.
        superassign: bool,
        /// The source line.
        line:        usize,
    },
}

impl Expr {
    /// The line the expression starts on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Constant { line, .. }
            | Self::Symbol { line, .. }
            | Self::Call { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Function { line, .. }
            | Self::Block { line, .. }
            | Self::If { line, .. }
            | Self::For { line, .. }
            | Self::While { line, .. }
            | Self::Repeat { line, .. }
            | Self::Break { line }
            | Self::Next { line }
            | Self::Index { line, .. }
            | Self::Field { line, .. }
            | Self::Assign { line, .. } => *line,
        }
    }

    /// A short description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Constant { value, .. } => match value {
                Constant::Null => "NULL".to_string(),
                Constant::Character(Some(s)) => format!("\"{s}\""),
                other => format!("{other:?}"),
            },
            Self::Symbol { name, .. } => name.clone(),
            Self::Call { function, .. } => format!("{}(...)", function.describe()),
            Self::Unary { op, operand, .. } => {
                format!("{}{}", op.function_name(), operand.describe())
            },
            Self::Binary { left, op, right, .. } => {
                format!("{} {op} {}", left.describe(), right.describe())
            },
            Self::Function { .. } => "function(...)".to_string(),
            Self::Block { .. } => "{...}".to_string(),
            Self::If { .. } => "if".to_string(),
            Self::For { .. } => "for".to_string(),
            Self::While { .. } => "while".to_string(),
            Self::Repeat { .. } => "repeat".to_string(),
            Self::Break { .. } => "break".to_string(),
            Self::Next { .. } => "next".to_string(),
            Self::Index { object, kind, .. } => match kind {
                IndexKind::Subset => format!("{}[...]", object.describe()),
                IndexKind::Element => format!("{}[[...]]", object.describe()),
            },
            Self::Field { object, name, kind, .. } => match kind {
                FieldKind::Dollar => format!("{}${name}", object.describe()),
                FieldKind::Slot => format!("{}@{name}", object.describe()),
            },
            Self::Assign { target, .. } => format!("{} <- ...", target.describe()),
        }
    }
}
