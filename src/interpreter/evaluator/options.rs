/// Default upper bound on cached call shapes per call site.
pub const ARGUMENT_CACHE_SIZE: usize = 4;
/// Default evaluation nesting limit.
pub const MAX_DEPTH: usize = 512;

/// Evaluation options.
///
/// Read by the evaluator on every use, so changes made through the
/// `options()` builtin take effect immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Warning level: `0` collects warnings, `1` also logs each one as it is
    /// raised, `2` or more turns warnings into errors. Negative values drop
    /// warnings.
    pub warn:                i32,
    /// Number of distinct call shapes a call site caches before it falls
    /// back to matching on every call.
    pub argument_cache_size: usize,
    /// Whether named arguments may match formals by unique prefix.
    pub partial_matching:    bool,
    /// Maximum closure nesting depth.
    pub max_depth:           usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { warn:                0,
               argument_cache_size: ARGUMENT_CACHE_SIZE,
               partial_matching:    true,
               max_depth:           MAX_DEPTH, }
    }
}
