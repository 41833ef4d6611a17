use crate::{
    error::CoercionError,
    interpreter::{
        evaluator::warning::WarningKind,
        value::{
            ComplexNumber, NA_INTEGER, NA_REAL, Vector, VectorData,
            complex::NA_COMPLEX,
            is_na_real,
            vector::{double_sequence_at, integer_sequence_at},
        },
    },
};

/// The aggregate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// `sum`
    Sum,
    /// `prod`
    Prod,
    /// `min`
    Min,
    /// `max`
    Max,
}

/// How an operator folds: start values, result typing and the warnings it
/// raises.
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceSemantics {
    /// Start value of the integer fold.
    pub int_start:         i32,
    /// Start value of the double fold, and the result for empty input.
    pub double_start:      f64,
    /// Whether logical, integer and `NULL` input produce an integer result.
    pub null_int:          bool,
    /// Raised when nothing is left to fold.
    pub empty_warning:     Option<WarningKind>,
    /// Raised when the operator itself produces NA (integer overflow).
    pub na_result_warning: Option<WarningKind>,
    /// Whether complex input is accepted.
    pub supports_complex:  bool,
    /// Whether character input is accepted.
    pub supports_string:   bool,
}

impl ReduceOp {
    /// The name of the builtin.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Prod => "prod",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// The fold parameters of the operator.
    #[must_use]
    pub const fn semantics(self) -> ReduceSemantics {
        match self {
            Self::Sum => ReduceSemantics { int_start:         0,
                                           double_start:      0.0,
                                           null_int:          true,
                                           empty_warning:     None,
                                           na_result_warning: Some(WarningKind::IntegerOverflowSum),
                                           supports_complex:  true,
                                           supports_string:   false, },
            Self::Prod => ReduceSemantics { int_start:         1,
                                            double_start:      1.0,
                                            null_int:          false,
                                            empty_warning:     None,
                                            na_result_warning: None,
                                            supports_complex:  true,
                                            supports_string:   false, },
            Self::Min => ReduceSemantics { int_start:         i32::MAX,
                                           double_start:      f64::INFINITY,
                                           null_int:          false,
                                           empty_warning:     Some(WarningKind::NoNonMissing { op:     "min",
                                                                                                result: "Inf", }),
                                           na_result_warning: None,
                                           supports_complex:  false,
                                           supports_string:   true, },
            Self::Max => ReduceSemantics { int_start:         i32::MIN + 1,
                                           double_start:      f64::NEG_INFINITY,
                                           null_int:          false,
                                           empty_warning:     Some(WarningKind::NoNonMissing { op:     "max",
                                                                                                result: "-Inf", }),
                                           na_result_warning: None,
                                           supports_complex:  false,
                                           supports_string:   true, },
        }
    }

    const fn is_extremum(self) -> bool {
        matches!(self, Self::Min | Self::Max)
    }
}

/// Folds a vector into a length-1 vector.
///
/// - `na_rm` drops NA (and, for doubles, NaN) elements before folding.
/// - `finite` additionally drops infinite elements of integer, double and
///   complex input; logical input ignores it.
/// - Without `na_rm`, the first NA element ends the fold with an NA result;
///   NaN keeps propagating through the arithmetic instead.
/// - Strided input is folded element by element without materializing and
///   gives the same result as its dense form.
///
/// Warnings (empty input, integer overflow) are appended to `warnings`.
///
/// # Errors
/// [`CoercionError::InvalidTypeArgument`] for raw and list input, for
/// complex input to `min`/`max`, and for character input to `sum`/`prod`.
///
/// # Example
/// ```
/// use statcore::interpreter::{
///     reduction::{ReduceOp, reduce},
///     value::{Vector, VectorData},
/// };
///
/// let v = Vector::new(VectorData::Double(vec![1.0, 2.5, 3.0]));
/// let mut warnings = Vec::new();
/// let total = reduce(&v, ReduceOp::Sum, false, false, &mut warnings).unwrap();
/// assert!(matches!(total.data(), VectorData::Double(d) if d == &[6.5]));
/// ```
pub fn reduce(vector: &Vector,
              op: ReduceOp,
              na_rm: bool,
              finite: bool,
              warnings: &mut Vec<WarningKind>)
              -> Result<Vector, CoercionError> {
    let semantics = op.semantics();
    let invalid = |type_name| Err(CoercionError::InvalidTypeArgument { type_name });
    Ok(match vector.data() {
        VectorData::Logical(v) => {
            fold_integers(v.iter().map(|l| l.to_integer()), op, &semantics, na_rm, warnings)
        },
        VectorData::Integer(v) => {
            fold_integers(v.iter().copied(), op, &semantics, na_rm || finite, warnings)
        },
        VectorData::IntegerSequence { start, stride, len } => {
            fold_integers((0..*len).map(|i| integer_sequence_at(*start, *stride, i)),
                          op,
                          &semantics,
                          na_rm || finite,
                          warnings)
        },
        VectorData::Double(v) => {
            fold_doubles(v.iter().copied(), op, &semantics, na_rm, finite, warnings)
        },
        VectorData::DoubleSequence { start, stride, len } => {
            fold_doubles((0..*len).map(|i| double_sequence_at(*start, *stride, i)),
                         op,
                         &semantics,
                         na_rm,
                         finite,
                         warnings)
        },
        VectorData::Complex(v) => {
            if !semantics.supports_complex {
                return invalid("complex");
            }
            fold_complex(v, op, &semantics, na_rm, finite)
        },
        VectorData::Character(v) => {
            if !semantics.supports_string {
                return invalid("character");
            }
            fold_strings(v, op, na_rm, warnings)
        },
        VectorData::Raw(_) => return invalid("raw"),
        VectorData::List(_) => return invalid("list"),
    })
}

/// Result of folding `NULL`: the empty fold of the operator.
#[must_use]
pub fn reduce_null(op: ReduceOp, warnings: &mut Vec<WarningKind>) -> Vector {
    fold_integers(std::iter::empty(), op, &op.semantics(), false, warnings)
}

fn empty_result(semantics: &ReduceSemantics, warnings: &mut Vec<WarningKind>) -> Vector {
    if let Some(w) = &semantics.empty_warning {
        warnings.push(w.clone());
    }
    Vector::double(semantics.double_start)
}

fn fold_integers(values: impl Iterator<Item = i32>,
                 op: ReduceOp,
                 semantics: &ReduceSemantics,
                 skip_na: bool,
                 warnings: &mut Vec<WarningKind>)
                 -> Vector {
    let na_result = || {
        if semantics.null_int || op.is_extremum() {
            Vector::integer(NA_INTEGER)
        } else {
            Vector::double(NA_REAL)
        }
    };
    let mut int_acc = semantics.int_start;
    let mut double_acc = semantics.double_start;
    let mut seen = false;
    for x in values {
        if x == NA_INTEGER {
            if skip_na {
                continue;
            }
            return na_result();
        }
        seen = true;
        match op {
            ReduceOp::Sum => match int_acc.checked_add(x) {
                Some(sum) if sum != NA_INTEGER => int_acc = sum,
                _ => {
                    if let Some(w) = &semantics.na_result_warning {
                        warnings.push(w.clone());
                    }
                    return na_result();
                },
            },
            ReduceOp::Prod => double_acc *= f64::from(x),
            ReduceOp::Min => int_acc = int_acc.min(x),
            ReduceOp::Max => int_acc = int_acc.max(x),
        }
    }
    match op {
        ReduceOp::Sum => Vector::integer(int_acc),
        ReduceOp::Prod => Vector::double(double_acc),
        ReduceOp::Min | ReduceOp::Max if seen => Vector::integer(int_acc),
        ReduceOp::Min | ReduceOp::Max => empty_result(semantics, warnings),
    }
}

fn fold_doubles(values: impl Iterator<Item = f64>,
                op: ReduceOp,
                semantics: &ReduceSemantics,
                na_rm: bool,
                finite: bool,
                warnings: &mut Vec<WarningKind>)
                -> Vector {
    let mut acc = semantics.double_start;
    let mut seen = false;
    let mut nan_seen = false;
    for x in values {
        if x.is_nan() {
            if na_rm || finite {
                continue;
            }
            if is_na_real(x) {
                return Vector::double(NA_REAL);
            }
        } else if finite && x.is_infinite() {
            continue;
        }
        seen = true;
        match op {
            ReduceOp::Sum => acc += x,
            ReduceOp::Prod => acc *= x,
            ReduceOp::Min | ReduceOp::Max if x.is_nan() => nan_seen = true,
            ReduceOp::Min => acc = acc.min(x),
            ReduceOp::Max => acc = acc.max(x),
        }
    }
    if op.is_extremum() {
        if nan_seen {
            return Vector::double(f64::NAN);
        }
        if !seen {
            return empty_result(semantics, warnings);
        }
    }
    Vector::double(acc)
}

fn fold_complex(values: &[ComplexNumber],
                op: ReduceOp,
                semantics: &ReduceSemantics,
                na_rm: bool,
                finite: bool)
                -> Vector {
    let mut acc = ComplexNumber::from(semantics.double_start);
    for c in values {
        if c.is_na() {
            if na_rm || finite {
                continue;
            }
            return Vector::complex(NA_COMPLEX);
        }
        if finite && !c.is_finite() {
            continue;
        }
        match op {
            ReduceOp::Prod => acc *= *c,
            _ => acc += *c,
        }
    }
    Vector::complex(acc)
}

fn fold_strings(values: &[Option<String>],
                op: ReduceOp,
                na_rm: bool,
                warnings: &mut Vec<WarningKind>)
                -> Vector {
    let mut best: Option<&str> = None;
    for s in values {
        let Some(s) = s.as_deref() else {
            if na_rm {
                continue;
            }
            return Vector::character(None);
        };
        best = Some(match (best, op) {
            (None, _) => s,
            (Some(b), ReduceOp::Min) if s < b => s,
            (Some(b), ReduceOp::Max) if s > b => s,
            (Some(b), _) => b,
        });
    }
    best.map_or_else(|| {
            warnings.push(WarningKind::NoNonMissingCharacter { op: op.name() });
            Vector::character(None)
        },
        |s| Vector::character(Some(s)))
}
