use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    error::MatchError,
    interpreter::{evaluator::options::Options, node::Formals, value::Value},
};

/// Where the value of one formal comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedSlot {
    /// The actual argument at this call position.
    Actual(usize),
    /// The actuals collected by `...`, in call order.
    Varargs(Vec<usize>),
    /// Nothing was supplied; the formal has a default.
    Default,
    /// Nothing was supplied and there is no default.
    Missing,
}

/// The result of matching: one slot per formal, in formal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    /// Slots indexed like the callee's formals.
    pub slots: Vec<MatchedSlot>,
}

/// The shape of a call after `...` expansion: the name of each actual and
/// whether it is present or empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    /// Argument names; `None` for positional arguments.
    pub names:   Vec<Option<String>>,
    /// `false` for empty arguments such as the second in `f(1, , 3)`.
    pub present: Vec<bool>,
}

impl Signature {
    /// Appends one actual argument.
    pub fn push(&mut self, name: Option<String>, present: bool) {
        self.names.push(name.filter(|n| !n.is_empty()));
        self.present.push(present);
    }

    /// Number of actual arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the call has no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Binds actual arguments to formal parameters.
///
/// Matching runs in the classic order:
/// 1. exact names, for every formal except `...`;
/// 2. unique prefixes, for formals before `...` (when `partial` is set);
/// 3. positions, filling unbound formals before `...` in order;
/// 4. `...` collects every remaining actual in call order;
/// 5. unbound formals become [`MatchedSlot::Default`] or
///    [`MatchedSlot::Missing`]. So do formals bound to an empty actual.
///
/// `label` renders actual `i` for error messages.
///
/// # Errors
/// - [`MatchError::MultipleActualArguments`] when one formal is bound twice.
/// - [`MatchError::AmbiguousPartialMatch`] when a name prefixes several
///   formals.
/// - [`MatchError::UnusedArgument`] / [`MatchError::UnusedArguments`] when
///   actuals remain and the callee has no `...`.
///
/// # Example
/// ```
/// use statcore::interpreter::{
///     matcher::{MatchedSlot, Signature, match_arguments},
///     node::Formals,
/// };
///
/// let formals = Formals::from_names(&["a", "b", "..."]);
/// let mut signature = Signature::default();
/// signature.push(Some("b".to_string()), true);
/// signature.push(None, true);
/// signature.push(None, true);
///
/// let permutation = match_arguments(&formals, &signature, true, |i| i.to_string()).unwrap();
/// assert_eq!(permutation.slots,
///            vec![MatchedSlot::Actual(1), MatchedSlot::Actual(0), MatchedSlot::Varargs(vec![2])]);
/// ```
pub fn match_arguments(formals: &Formals,
                       signature: &Signature,
                       partial: bool,
                       label: impl Fn(usize) -> String)
                       -> Result<Permutation, MatchError> {
    let dots = formals.varargs;
    let before_dots = dots.unwrap_or(formals.len());
    let mut bound: Vec<Option<usize>> = vec![None; formals.len()];
    let mut used = vec![false; signature.len()];

    for (i, name) in signature.names.iter().enumerate() {
        let Some(name) = name else { continue };
        if let Some(f) = formals.names
                                .iter()
                                .enumerate()
                                .position(|(f, formal)| formal == name && Some(f) != dots)
        {
            if bound[f].is_some() {
                return Err(MatchError::MultipleActualArguments { formal: name.clone() });
            }
            bound[f] = Some(i);
            used[i] = true;
        }
    }

    if partial {
        let mut partially_bound = vec![false; formals.len()];
        for (i, name) in signature.names.iter().enumerate() {
            let Some(name) = name else { continue };
            if used[i] {
                continue;
            }
            let mut candidates = (0..before_dots).filter(|&f| {
                                                     formals.names[f].starts_with(name.as_str())
                                                     && (bound[f].is_none() || partially_bound[f])
                                                 });
            let Some(f) = candidates.next() else { continue };
            if candidates.next().is_some() {
                return Err(MatchError::AmbiguousPartialMatch { position: i + 1,
                                                               name:     name.clone(), });
            }
            if partially_bound[f] {
                return Err(MatchError::MultipleActualArguments { formal: formals.names[f].clone() });
            }
            trace!(actual = %name, formal = %formals.names[f], "partial argument match");
            bound[f] = Some(i);
            partially_bound[f] = true;
            used[i] = true;
        }
    }

    let mut next_formal = 0;
    for i in 0..signature.len() {
        if used[i] || signature.names[i].is_some() {
            continue;
        }
        while next_formal < before_dots && bound[next_formal].is_some() {
            next_formal += 1;
        }
        if next_formal >= before_dots {
            break;
        }
        bound[next_formal] = Some(i);
        used[i] = true;
    }

    let rest: Vec<usize> = (0..signature.len()).filter(|&i| !used[i]).collect();
    if dots.is_none() && !rest.is_empty() {
        let labels: Vec<String> = rest.iter()
                                      .map(|&i| match &signature.names[i] {
                                          Some(name) => format!("{name} = {}", label(i)),
                                          None => label(i),
                                      })
                                      .collect();
        return Err(if labels.len() == 1 {
                       MatchError::UnusedArgument { argument: labels.join(", ") }
                   } else {
                       MatchError::UnusedArguments { arguments: labels.join(", ") }
                   });
    }

    let mut rest = Some(rest);
    let slots = (0..formals.len()).map(|f| {
                                      if Some(f) == dots {
                                          return MatchedSlot::Varargs(rest.take().unwrap_or_default());
                                      }
                                      match bound[f] {
                                          Some(i) if signature.present[i] => MatchedSlot::Actual(i),
                                          _ if formals.defaults[f].is_some() => MatchedSlot::Default,
                                          _ => MatchedSlot::Missing,
                                      }
                                  })
                                  .collect();
    trace!(?slots, "matched arguments");
    Ok(Permutation { slots })
}

/// Matches already evaluated arguments, as used by calls issued from Rust
/// (`do.call`, `lapply`).
///
/// Returns one entry per formal: the supplied value, `Value::Varargs` for
/// `...`, or `None` when nothing was supplied.
///
/// # Errors
/// The same errors as [`match_arguments`].
pub fn match_evaluated(formals: &Formals,
                       arguments: Vec<(Option<String>, Value)>,
                       partial: bool)
                       -> Result<Vec<Option<Value>>, MatchError> {
    let mut signature = Signature::default();
    for (name, value) in &arguments {
        signature.push(name.clone(), !matches!(value, Value::Missing));
    }
    let permutation = match_arguments(formals, &signature, partial, |i| format!("{:?}", arguments[i].1))?;
    let mut arguments: Vec<Option<(Option<String>, Value)>> = arguments.into_iter().map(Some).collect();
    Ok(permutation.slots
                  .into_iter()
                  .map(|slot| match slot {
                      MatchedSlot::Actual(i) => arguments[i].take().map(|(_, value)| value),
                      MatchedSlot::Varargs(indices) => {
                          let collected = indices.into_iter().filter_map(|i| arguments[i].take()).collect();
                          Some(Value::Varargs(Rc::new(collected)))
                      },
                      MatchedSlot::Default | MatchedSlot::Missing => None,
                  })
                  .collect())
}

/// One cached call shape.
#[derive(Debug)]
pub struct CacheEntry {
    formals:     Rc<Formals>,
    signature:   Signature,
    permutation: Rc<Permutation>,
}

/// Per-call-site memo of argument matching.
///
/// A site starts `Uninitialized`, caches up to
/// [`Options::argument_cache_size`] distinct shapes (callee formals plus
/// call signature), and turns `Generic` on the next unseen shape, after
/// which it matches on every call.
#[derive(Debug, Default)]
pub enum PrepareArguments {
    /// No call has gone through the site yet.
    #[default]
    Uninitialized,
    /// Known shapes and their permutations.
    Cached(Vec<CacheEntry>),
    /// Too many shapes; every call is matched afresh.
    Generic,
}

impl PrepareArguments {
    /// Returns the permutation for a call shape, from the cache when the
    /// shape was seen before.
    ///
    /// # Errors
    /// Any [`MatchError`] of [`match_arguments`]; failed matches are not
    /// cached.
    pub fn prepare(&mut self,
                   formals: &Rc<Formals>,
                   signature: &Signature,
                   options: &Options,
                   label: impl Fn(usize) -> String)
                   -> Result<Rc<Permutation>, MatchError> {
        if let Self::Cached(entries) = self
           && let Some(entry) = entries.iter()
                                       .find(|e| Rc::ptr_eq(&e.formals, formals) && e.signature == *signature)
        {
            trace!("argument cache hit");
            return Ok(Rc::clone(&entry.permutation));
        }

        let permutation = Rc::new(match_arguments(formals, signature, options.partial_matching, label)?);
        let entry = || CacheEntry { formals:     Rc::clone(formals),
                                    signature:   signature.clone(),
                                    permutation: Rc::clone(&permutation), };
        match self {
            Self::Uninitialized if options.argument_cache_size > 0 => {
                debug!("call site cached its first argument shape");
                *self = Self::Cached(vec![entry()]);
            },
            Self::Cached(entries) if entries.len() < options.argument_cache_size => {
                entries.push(entry());
                debug!(shapes = entries.len(), "call site cached another argument shape");
            },
            Self::Uninitialized | Self::Cached(_) => {
                debug!(limit = options.argument_cache_size, "call site is now generic");
                *self = Self::Generic;
            },
            Self::Generic => {},
        }
        Ok(permutation)
    }

    /// Number of cached shapes.
    #[must_use]
    pub fn cached_shapes(&self) -> usize {
        match self {
            Self::Cached(entries) => entries.len(),
            Self::Uninitialized | Self::Generic => 0,
        }
    }

    /// Whether the site gave up caching.
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::Generic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(names: &[Option<&str>]) -> Signature {
        let mut signature = Signature::default();
        for name in names {
            signature.push(name.map(str::to_string), true);
        }
        signature
    }

    fn matched(formals: &[&str], names: &[Option<&str>]) -> Result<Vec<MatchedSlot>, MatchError> {
        match_arguments(&Formals::from_names(formals), &signature(names), true, |i| i.to_string())
            .map(|p| p.slots)
    }

    #[test]
    fn exact_then_positional_then_dots() {
        assert_eq!(matched(&["a", "b", "..."], &[Some("b"), None, None]).unwrap(),
                   vec![MatchedSlot::Actual(1), MatchedSlot::Actual(0), MatchedSlot::Varargs(vec![2])]);
    }

    #[test]
    fn partial_match_before_dots_only() {
        assert_eq!(matched(&["value", "..."], &[Some("val")]).unwrap(),
                   vec![MatchedSlot::Actual(0), MatchedSlot::Varargs(vec![])]);
        assert_eq!(matched(&["...", "na.rm"], &[Some("na")]).unwrap(),
                   vec![MatchedSlot::Varargs(vec![0]), MatchedSlot::Missing]);
    }

    #[test]
    fn ambiguous_and_duplicate_names() {
        assert_eq!(matched(&["alpha", "also"], &[Some("al")]).unwrap_err(),
                   MatchError::AmbiguousPartialMatch { position: 1,
                                                       name:     "al".to_string(), });
        assert_eq!(matched(&["x"], &[Some("x"), Some("x")]).unwrap_err(),
                   MatchError::MultipleActualArguments { formal: "x".to_string() });
    }

    #[test]
    fn unused_arguments() {
        assert_eq!(matched(&["x"], &[None, Some("y")]).unwrap_err().id(), "UNUSED_ARGUMENT");
        assert_eq!(matched(&[], &[None, None]).unwrap_err(),
                   MatchError::UnusedArguments { arguments: "0, 1".to_string() });
    }

    #[test]
    fn empty_actual_counts_as_missing() {
        let mut signature = signature(&[None]);
        signature.push(None, false);
        let permutation = match_arguments(&Formals::from_names(&["a", "b"]), &signature, true, |i| {
                              i.to_string()
                          }).unwrap();
        assert_eq!(permutation.slots, vec![MatchedSlot::Actual(0), MatchedSlot::Missing]);
    }

    #[test]
    fn cache_goes_generic_after_limit() {
        let formals = Rc::new(Formals::from_names(&["a", "..."]));
        let options = Options::default();
        let mut cache = PrepareArguments::default();
        for n in 0..=options.argument_cache_size {
            let names = vec![None; n + 1];
            let cached = cache.prepare(&formals, &signature(&names), &options, |i| i.to_string())
                              .unwrap();
            let fresh = match_arguments(&formals, &signature(&names), true, |i| i.to_string()).unwrap();
            assert_eq!(*cached, fresh);
        }
        assert!(cache.is_generic());
    }

    #[test]
    fn cache_keys_on_callee_identity() {
        let first = Rc::new(Formals::from_names(&["a"]));
        let second = Rc::new(Formals::from_names(&["a"]));
        let options = Options::default();
        let mut cache = PrepareArguments::default();
        cache.prepare(&first, &signature(&[None]), &options, |i| i.to_string()).unwrap();
        cache.prepare(&first, &signature(&[None]), &options, |i| i.to_string()).unwrap();
        assert_eq!(cache.cached_shapes(), 1);
        cache.prepare(&second, &signature(&[None]), &options, |i| i.to_string()).unwrap();
        assert_eq!(cache.cached_shapes(), 2);
    }
}
