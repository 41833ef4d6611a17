use std::fmt::{self, Display};

/// The kinds of non-fatal conditions the core can signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// Text that did not parse as a number became NA.
    NasIntroducedByCoercion,
    /// A double outside the integer range became NA.
    NasIntroducedByCoercionIntRange,
    /// A value outside `0..=255` became `00`.
    OutOfRangeRaw,
    /// Integer arithmetic overflowed.
    IntegerOverflow,
    /// An integer `sum` overflowed.
    IntegerOverflowSum,
    /// `min`/`max` saw no non-missing element.
    NoNonMissing {
        /// `"min"` or `"max"`.
        op:     &'static str,
        /// The returned start value, `"Inf"` or `"-Inf"`.
        result: &'static str,
    },
    /// Character `min`/`max` saw no non-missing element.
    NoNonMissingCharacter {
        /// `"min"` or `"max"`.
        op: &'static str,
    },
    /// Operand lengths of a binary operation do not divide each other.
    LengthNotMultiple,
    /// Replacement length does not divide the number of replaced items.
    ReplacementNotMultiple,
    /// `$<-` turned an atomic vector into a list.
    CoercingLhsToList,
    /// Raised by `warning()`.
    User(String),
}

impl WarningKind {
    /// Stable identifier of the warning kind.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::NasIntroducedByCoercion => "NA_INTRODUCED_COERCION",
            Self::NasIntroducedByCoercionIntRange => "NA_INTRODUCED_COERCION_INT",
            Self::OutOfRangeRaw => "OUT_OF_RANGE",
            Self::IntegerOverflow => "INTEGER_OVERFLOW",
            Self::IntegerOverflowSum => "INTEGER_OVERFLOW_USE_SUM_NUMERIC",
            Self::NoNonMissing { op: "min", .. } => "NO_NONMISSING_MIN",
            Self::NoNonMissing { .. } => "NO_NONMISSING_MAX",
            Self::NoNonMissingCharacter { .. } => "NO_NONMISSING_CHARACTER",
            Self::LengthNotMultiple => "LENGTH_NOT_MULTI",
            Self::ReplacementNotMultiple => "NOT_MULTIPLE_REPLACEMENT",
            Self::CoercingLhsToList => "COERCING_LHS_TO_LIST",
            Self::User(_) => "USER",
        }
    }
}

impl Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NasIntroducedByCoercion => write!(f, "NAs introduced by coercion"),
            Self::NasIntroducedByCoercionIntRange => {
                write!(f, "NAs introduced by coercion to integer range")
            },
            Self::OutOfRangeRaw => {
                write!(f, "out-of-range values treated as 0 in coercion to raw")
            },
            Self::IntegerOverflow => write!(f, "NAs produced by integer overflow"),
            Self::IntegerOverflowSum => {
                write!(f, "integer overflow - use sum(as.numeric(.))")
            },
            Self::NoNonMissing { op, result } => {
                write!(f, "no non-missing arguments to {op}; returning {result}")
            },
            Self::NoNonMissingCharacter { op } => {
                write!(f, "no non-missing arguments to {op}; returning NA")
            },
            Self::LengthNotMultiple => {
                write!(f, "longer object length is not a multiple of shorter object length")
            },
            Self::ReplacementNotMultiple => {
                write!(f, "number of items to replace is not a multiple of replacement length")
            },
            Self::CoercingLhsToList => write!(f, "Coercing LHS to a list"),
            Self::User(message) => write!(f, "{message}"),
        }
    }
}

/// A warning recorded on the side channel, with the line of the call that
/// raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// What happened.
    pub kind: WarningKind,
    /// The source line of the raising call.
    pub line: usize,
}

impl Warning {
    /// Stable identifier of the warning kind.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning on line {}: {}", self.line, self.kind)
    }
}
