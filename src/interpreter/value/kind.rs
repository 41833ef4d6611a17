use std::fmt::{self, Display};

/// The element kind of a vector.
///
/// Variants are declared in promotion order, so the derived `Ord` gives the
/// kind that two vectors are combined into: `max(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Bytes without NA.
    Raw,
    /// `TRUE`, `FALSE` and `NA`.
    Logical,
    /// 32-bit integers.
    Integer,
    /// Doubles.
    Double,
    /// Complex numbers.
    Complex,
    /// Strings.
    Character,
    /// Heterogeneous elements.
    List,
}

impl Kind {
    /// The name reported by `typeof`.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Logical => "logical",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Complex => "complex",
            Self::Character => "character",
            Self::List => "list",
        }
    }

    /// Parses a mode name as accepted by `vector()` and `as.vector()`.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::value::Kind;
    ///
    /// assert_eq!(Kind::from_mode("numeric"), Some(Kind::Double));
    /// assert_eq!(Kind::from_mode("list"), Some(Kind::List));
    /// assert_eq!(Kind::from_mode("closure"), None);
    /// ```
    #[must_use]
    pub fn from_mode(mode: &str) -> Option<Self> {
        Some(match mode {
            "raw" => Self::Raw,
            "logical" => Self::Logical,
            "integer" => Self::Integer,
            "double" | "numeric" => Self::Double,
            "complex" => Self::Complex,
            "character" => Self::Character,
            "list" => Self::List,
            _ => return None,
        })
    }

    /// Returns `true` for the kinds that take part in arithmetic.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Logical | Self::Integer | Self::Double | Self::Complex)
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
