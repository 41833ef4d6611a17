use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::{
            core::{Context, EvalResult},
            function::{apply, attributes, coerce, conditions, construct, io, operators, reduce},
        },
        node::Formals,
        value::core::{Builtin, Value},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives one value per formal, in formal order. Formals the
/// call did not supply arrive as [`Value::Missing`]; a `...` formal arrives
/// as [`Value::Varargs`].
pub type BuiltinFn = fn(&mut Context, Vec<Value>, usize) -> EvalResult<Value>;

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the formal parameter names, matched like those of a closure,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (the metadata a builtin value points at),
/// - `BUILTIN_TABLE` (static table installed into the base environment),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                formals: [$($formal:literal),* $(,)?],
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Name, formals and implementation of a builtin.
        pub struct BuiltinDef {
            /// Name the builtin is bound to.
            pub name:    &'static str,
            /// Formal parameter names.
            pub formals: &'static [&'static str],
            /// Implementation.
            pub func:    BuiltinFn,
        }
        /// Every builtin, in installation order.
        pub static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, formals: &[$($formal),*], func: $func },
            )*
        ];
        /// Names of every builtin.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "+"             => { formals: ["e1", "e2"], func: operators::plus },
    "-"             => { formals: ["e1", "e2"], func: operators::minus },
    "*"             => { formals: ["e1", "e2"], func: operators::times },
    "/"             => { formals: ["e1", "e2"], func: operators::divide },
    "^"             => { formals: ["e1", "e2"], func: operators::power },
    "%%"            => { formals: ["e1", "e2"], func: operators::modulo },
    "%/%"           => { formals: ["e1", "e2"], func: operators::int_divide },
    "=="            => { formals: ["e1", "e2"], func: operators::equal },
    "!="            => { formals: ["e1", "e2"], func: operators::not_equal },
    "<"             => { formals: ["e1", "e2"], func: operators::less },
    "<="            => { formals: ["e1", "e2"], func: operators::less_equal },
    ">"             => { formals: ["e1", "e2"], func: operators::greater },
    ">="            => { formals: ["e1", "e2"], func: operators::greater_equal },
    "&"             => { formals: ["e1", "e2"], func: operators::and },
    "|"             => { formals: ["e1", "e2"], func: operators::or },
    ":"             => { formals: ["from", "to"], func: operators::colon },
    "!"             => { formals: ["x"], func: operators::not },
    "c"             => { formals: ["..."], func: construct::c },
    "list"          => { formals: ["..."], func: construct::list },
    "vector"        => { formals: ["mode", "length"], func: construct::vector },
    "logical"       => { formals: ["length"], func: construct::logical },
    "integer"       => { formals: ["length"], func: construct::integer },
    "numeric"       => { formals: ["length"], func: construct::double },
    "double"        => { formals: ["length"], func: construct::double },
    "complex"       => { formals: ["length.out"], func: construct::complex },
    "character"     => { formals: ["length"], func: construct::character },
    "raw"           => { formals: ["length"], func: construct::raw },
    "seq_len"       => { formals: ["length.out"], func: construct::seq_len },
    "length"        => { formals: ["x"], func: attributes::length },
    "names"         => { formals: ["x"], func: attributes::names },
    "names<-"       => { formals: ["x", "value"], func: attributes::set_names },
    "dim"           => { formals: ["x"], func: attributes::dim },
    "dim<-"         => { formals: ["x", "value"], func: attributes::set_dim },
    "attr"          => { formals: ["x", "which", "exact"], func: attributes::attr },
    "attr<-"        => { formals: ["x", "which", "value"], func: attributes::set_attr },
    "is.na"         => { formals: ["x"], func: attributes::is_na },
    "is.null"       => { formals: ["x"], func: attributes::is_null },
    "typeof"        => { formals: ["x"], func: attributes::type_of },
    "identical"     => { formals: ["x", "y"], func: attributes::identical },
    "as.logical"    => { formals: ["x", "..."], func: coerce::as_logical },
    "as.integer"    => { formals: ["x", "..."], func: coerce::as_integer },
    "as.double"     => { formals: ["x", "..."], func: coerce::as_double },
    "as.numeric"    => { formals: ["x", "..."], func: coerce::as_double },
    "as.complex"    => { formals: ["x", "..."], func: coerce::as_complex },
    "as.character"  => { formals: ["x", "..."], func: coerce::as_character },
    "as.raw"        => { formals: ["x"], func: coerce::as_raw },
    "as.vector"     => { formals: ["x", "mode"], func: coerce::as_vector },
    "sum"           => { formals: ["...", "na.rm"], func: reduce::sum },
    "prod"          => { formals: ["...", "na.rm"], func: reduce::prod },
    "min"           => { formals: ["...", "na.rm"], func: reduce::min },
    "max"           => { formals: ["...", "na.rm"], func: reduce::max },
    "stopifnot"     => { formals: ["..."], func: conditions::stopifnot },
    "stop"          => { formals: ["..."], func: conditions::stop },
    "warning"       => { formals: ["..."], func: conditions::warning },
    "return"        => { formals: ["value"], func: apply::return_value },
    "invisible"     => { formals: ["x"], func: apply::invisible },
    "options"       => { formals: ["..."], func: conditions::options },
    "do.call"       => { formals: ["what", "args"], func: apply::do_call },
    "lapply"        => { formals: ["X", "FUN", "..."], func: apply::lapply },
    "print"         => { formals: ["x", "..."], func: io::print },
    "stdout"        => { formals: [], func: io::stdout },
    "textConnection" => { formals: ["object"], func: io::text_connection },
    "readLines"     => { formals: ["con", "n"], func: io::read_lines },
    "writeLines"    => { formals: ["text", "con", "sep"], func: io::write_lines },
    "flush"         => { formals: ["con"], func: io::flush },
    "close"         => { formals: ["con", "..."], func: io::close },
    ".Call"         => { formals: [".NAME", "..."], func: io::native_call },
}

/// Binds every builtin in `env`.
///
/// Each builtin gets its own shared [`Formals`], so call sites can key their
/// argument caches on the callee's identity.
pub fn install_builtins(env: &Environment) {
    for def in BUILTIN_TABLE {
        let builtin = Builtin { def,
                                formals: Rc::new(Formals::from_names(def.formals)) };
        env.define(def.name, Value::Builtin(Rc::new(builtin)));
    }
}

/// Splits the matched arguments into a fixed-size array.
///
/// The matcher hands a builtin exactly one value per formal, so a length
/// mismatch means the table and the implementation disagree.
pub(super) fn take<const N: usize>(args: Vec<Value>) -> EvalResult<[Value; N]> {
    args.try_into()
        .map_err(|_| RuntimeError::InvariantViolation { details: "builtin received the wrong number of arguments" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, name) in BUILTIN_FUNCTIONS.iter().enumerate() {
            assert!(!BUILTIN_FUNCTIONS[i + 1..].contains(name), "{name} defined twice");
        }
    }

    #[test]
    fn installed_builtins_are_functions() {
        let env = Environment::new();
        install_builtins(&env);
        for name in BUILTIN_FUNCTIONS {
            assert!(env.get_local(name).is_some_and(|v| v.is_function()), "{name}");
        }
    }
}
