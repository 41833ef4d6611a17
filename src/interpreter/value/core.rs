use std::{cell::RefCell, fmt, rc::Rc};

use crate::interpreter::{
    connection::Connection,
    environment::Environment,
    evaluator::function::core::BuiltinDef,
    node::{Formals, Node},
    value::{
        format::{CHARACTER_DIGITS, format_elements},
        kind::Kind,
        vector::{Vector, VectorData},
    },
};

/// Represents a runtime value in the interpreter.
///
/// Vectors are shared through `Rc` and copied on write: an update clones the
/// storage only when another binding still refers to it.
#[derive(Clone)]
pub enum Value {
    /// `NULL`, the zero-length value of no kind.
    Null,
    /// A vector of any kind.
    Vector(Rc<Vector>),
    /// A user-defined function.
    Closure(Rc<Closure>),
    /// A function implemented in Rust.
    Builtin(Rc<Builtin>),
    /// Marker bound to a formal that received no argument and has no
    /// default.
    Missing,
    /// The arguments collected by a `...` formal.
    Varargs(Rc<Vec<(Option<String>, Self)>>),
    /// A connection.
    Connection(Rc<RefCell<dyn Connection>>),
    /// A foreign object.
    External(Rc<dyn ExternalObject>),
}

/// A function defined with `function(...)`, closed over its environment.
pub struct Closure {
    /// Formal parameters with their default expressions.
    pub formals: Rc<Formals>,
    /// The function body.
    pub body:    Rc<Node>,
    /// The environment the function was created in.
    pub env:     Environment,
}

/// A builtin bound to its formal parameter list.
pub struct Builtin {
    /// Name, formals and implementation.
    pub def:     &'static BuiltinDef,
    /// Formals built from `def`, shared so call sites can key on identity.
    pub formals: Rc<Formals>,
}

/// An object owned by the embedder.
///
/// The only thing the core asks of it is a name for `typeof` and an optional
/// vector view used by coercion.
pub trait ExternalObject {
    /// Name reported by `typeof`.
    fn type_name(&self) -> &'static str {
        "externalptr"
    }

    /// Vector view of the object, if it has one.
    fn as_vector(&self) -> Option<Vector> {
        None
    }
}

impl Value {
    /// Length-1 logical vector.
    #[must_use]
    pub fn logical(b: bool) -> Self {
        Vector::logical(b.into()).into()
    }

    /// Length-1 integer vector.
    #[must_use]
    pub fn integer(i: i32) -> Self {
        Vector::integer(i).into()
    }

    /// Length-1 double vector.
    #[must_use]
    pub fn double(d: f64) -> Self {
        Vector::double(d).into()
    }

    /// Length-1 character vector.
    #[must_use]
    pub fn character(s: &str) -> Self {
        Vector::character(Some(s)).into()
    }

    /// A list without names.
    #[must_use]
    pub fn list(elements: Vec<Self>) -> Self {
        VectorData::List(elements).into()
    }

    /// The vector inside, if this is a vector.
    #[must_use]
    pub const fn as_vector(&self) -> Option<&Rc<Vector>> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` for closures and builtins.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Closure(_) | Self::Builtin(_))
    }

    /// Length as reported by `length()`.
    #[must_use]
    pub fn length(&self) -> usize {
        match self {
            Self::Vector(v) => v.len(),
            Self::Varargs(v) => v.len(),
            Self::Null | Self::Missing => 0,
            Self::Closure(_) | Self::Builtin(_) | Self::Connection(_) | Self::External(_) => 1,
        }
    }

    /// Name reported by `typeof`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Vector(v) => v.kind().type_name(),
            Self::Closure(_) => "closure",
            Self::Builtin(_) => "builtin",
            Self::Missing => "symbol",
            Self::Varargs(_) => "...",
            Self::Connection(_) => "connection",
            Self::External(e) => e.type_name(),
        }
    }

    /// Structural identity as `identical()` sees it.
    ///
    /// Functions, connections and foreign objects are identical only to
    /// themselves.
    #[must_use]
    pub fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Missing, Self::Missing) => true,
            (Self::Vector(a), Self::Vector(b)) => Rc::ptr_eq(a, b) || a.identical(b),
            (Self::Closure(a), Self::Closure(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a.def.name == b.def.name,
            (Self::Varargs(a), Self::Varargs(b)) => {
                a.len() == b.len()
                && a.iter().zip(b.iter()).all(|((na, va), (nb, vb))| na == nb && va.identical(vb))
            },
            (Self::Connection(a), Self::Connection(b)) => Rc::ptr_eq(a, b),
            (Self::External(a), Self::External(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Vector(v) => {
                let mut cells = format_elements(v.data(), CHARACTER_DIGITS);
                if matches!(v.kind(), Kind::Integer) {
                    for cell in cells.iter_mut().filter(|c| *c != "NA") {
                        cell.push('L');
                    }
                }
                match (v.kind(), cells.len()) {
                    (Kind::List, _) => write!(f, "list({})", cells.join(", ")),
                    (kind, 0) => write!(f, "{}(0)", kind.type_name()),
                    (_, 1) => write!(f, "{}", cells[0]),
                    _ => write!(f, "c({})", cells.join(", ")),
                }
            },
            Self::Closure(_) => write!(f, "<closure>"),
            Self::Builtin(b) => write!(f, "<builtin {}>", b.def.name),
            Self::Missing => write!(f, "<missing>"),
            Self::Varargs(v) => f.debug_list().entries(v.iter()).finish(),
            Self::Connection(_) => write!(f, "<connection>"),
            Self::External(e) => write!(f, "<{}>", e.type_name()),
        }
    }
}
