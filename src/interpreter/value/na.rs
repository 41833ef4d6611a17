use std::ops::Not;

/// NA for integer vectors.
pub const NA_INTEGER: i32 = i32::MIN;

/// Low word of the NaN payload that marks a double as NA rather than NaN.
const NA_REAL_PAYLOAD: u32 = 1954;

/// NA for double vectors.
///
/// A NaN carrying a fixed payload. Ordinary NaN values produced by
/// arithmetic are a different value and are never reported as NA.
pub const NA_REAL: f64 = f64::from_bits(0x7FF0_0000_0000_07A2);

/// Returns `true` when `x` is the double NA sentinel.
///
/// Only the low word of the payload is inspected, so a quieted copy of the
/// sentinel still counts as NA.
///
/// # Example
/// ```
/// use statcore::interpreter::value::{NA_REAL, is_na_real};
///
/// assert!(is_na_real(NA_REAL));
/// assert!(!is_na_real(f64::NAN));
/// assert!(!is_na_real(1.0));
/// ```
#[must_use]
pub fn is_na_real(x: f64) -> bool {
    #[allow(clippy::cast_possible_truncation)]
    let low = x.to_bits() as u32;
    x.is_nan() && low == NA_REAL_PAYLOAD
}

/// A three-valued logical element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logical {
    /// `FALSE`
    False,
    /// `TRUE`
    True,
    /// `NA`
    Na,
}

impl Logical {
    /// Returns `true` for `NA`.
    #[must_use]
    pub const fn is_na(self) -> bool {
        matches!(self, Self::Na)
    }

    /// Returns `Some(bool)` for a non-NA value.
    #[must_use]
    pub const fn to_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Na => None,
        }
    }

    /// Three-valued conjunction: `FALSE` wins over `NA`.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Na,
        }
    }

    /// Three-valued disjunction: `TRUE` wins over `NA`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Na,
        }
    }

    /// Integer view: `TRUE` is 1, `FALSE` is 0, `NA` is the integer NA.
    #[must_use]
    pub const fn to_integer(self) -> i32 {
        match self {
            Self::True => 1,
            Self::False => 0,
            Self::Na => NA_INTEGER,
        }
    }
}

impl From<bool> for Logical {
    fn from(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }
}

impl Not for Logical {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Na => Self::Na,
        }
    }
}
