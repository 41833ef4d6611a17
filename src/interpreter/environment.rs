use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::Rc,
};

use crate::interpreter::{
    node::{ReadMode, WriteMode},
    value::Value,
};

/// One frame of variable bindings.
#[derive(Default)]
struct Frame {
    vars:   HashMap<String, Value>,
    parent: Option<Environment>,
}

/// A shared, mutable scope with a link to its enclosing scope.
///
/// Cloning an `Environment` clones the handle, not the bindings.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    /// Creates a frame with no parent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty frame enclosed by `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame { vars:   HashMap::new(),
                                          parent: Some(self.clone()), })))
    }

    /// The enclosing frame.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.clone()
    }

    /// Looks a name up in this frame only.
    #[must_use]
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.0.borrow().vars.get(name).cloned()
    }

    /// Looks a name up according to `mode`:
    /// - `Value`: this frame, then its parents;
    /// - `Function`: like `Value`, skipping bindings that are not functions;
    /// - `Super`: starting at the parent frame.
    #[must_use]
    pub fn read(&self, name: &str, mode: ReadMode) -> Option<Value> {
        let mut frame = match mode {
            ReadMode::Value | ReadMode::Function => Some(self.clone()),
            ReadMode::Super => self.parent(),
        };
        while let Some(env) = frame {
            if let Some(value) = env.get_local(name)
               && (mode != ReadMode::Function || value.is_function())
            {
                return Some(value);
            }
            frame = env.parent();
        }
        None
    }

    /// Binds `name` according to `mode`:
    /// - `Local`: in this frame;
    /// - `Super`: in the nearest enclosing frame that binds it, else in
    ///   `global`.
    pub fn write(&self, name: &str, value: Value, mode: WriteMode, global: &Self) {
        match mode {
            WriteMode::Local => self.define(name, value),
            WriteMode::Super => {
                let mut frame = self.parent();
                while let Some(env) = frame {
                    if env.0.borrow().vars.contains_key(name) {
                        env.define(name, value);
                        return;
                    }
                    frame = env.parent();
                }
                global.define(name, value);
            },
        }
    }

    /// Binds `name` in this frame.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().vars.insert(name.to_string(), value);
    }

    /// Removes a binding from this frame, returning its value.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.0.borrow_mut().vars.remove(name)
    }

    /// Names bound in this frame, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().vars.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drops every binding of the frame.
    ///
    /// Closures stored in a frame hold the frame itself; clearing breaks the
    /// cycle when a context is torn down.
    pub fn clear(&self) {
        let vars = std::mem::take(&mut self.0.borrow_mut().vars);
        drop(vars);
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<environment {:p}>", Rc::as_ptr(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_lookup_and_shadowing() {
        let global = Environment::new();
        global.define("x", Value::double(1.0));
        let local = global.child();
        assert!(local.read("x", ReadMode::Value).is_some());
        local.define("x", Value::double(2.0));
        assert!(local.read("x", ReadMode::Value).unwrap().identical(&Value::double(2.0)));
        assert!(local.read("x", ReadMode::Super).unwrap().identical(&Value::double(1.0)));
    }

    #[test]
    fn super_write_targets_binding_frame_or_global() {
        let global = Environment::new();
        let outer = global.child();
        outer.define("n", Value::integer(1));
        let inner = outer.child();
        inner.write("n", Value::integer(2), WriteMode::Super, &global);
        assert!(outer.get_local("n").unwrap().identical(&Value::integer(2)));
        inner.write("m", Value::integer(3), WriteMode::Super, &global);
        assert!(global.get_local("m").is_some());
        assert!(inner.get_local("m").is_none());
    }

    #[test]
    fn function_lookup_skips_values() {
        let global = Environment::new();
        let local = global.child();
        local.define("c", Value::double(1.0));
        assert!(local.read("c", ReadMode::Function).is_none());
    }
}
