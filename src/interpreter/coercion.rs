use crate::{
    error::CoercionError,
    interpreter::{
        evaluator::warning::WarningKind,
        value::{
            Attributes, ComplexNumber, Kind, Logical, NA_INTEGER, NA_REAL, Value, Vector,
            VectorData,
            complex::NA_COMPLEX,
            format::{CHARACTER_DIGITS, format_double},
            is_na_real,
            vector::{DIM, DIMNAMES, NAMES},
        },
    },
};

/// Which attributes survive a coercion.
///
/// The three flags are independent: `names`, the dimension pair (`dim` and
/// `dimnames`), and every other attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PreservePolicy {
    /// Keep `names`.
    pub names:      bool,
    /// Keep `dim` and `dimnames`.
    pub dimensions: bool,
    /// Keep every other attribute.
    pub attributes: bool,
}

impl PreservePolicy {
    /// Drop everything, as the `as.*` builtins do.
    pub const NONE: Self = Self { names:      false,
                                  dimensions: false,
                                  attributes: false, };
    /// Keep everything, as arithmetic does for its operands.
    pub const ALL: Self = Self { names:      true,
                                 dimensions: true,
                                 attributes: true, };

    fn keeps(self, name: &str) -> bool {
        match name {
            NAMES => self.names,
            DIM | DIMNAMES => self.dimensions,
            _ => self.attributes,
        }
    }

    /// Copies the attributes this policy keeps.
    #[must_use]
    pub fn filter(self, attributes: &Attributes) -> Attributes {
        let mut kept = attributes.clone();
        kept.retain(|name| self.keeps(name));
        kept
    }
}

/// Records which warnings a single coercion has raised so each is reported
/// at most once.
#[derive(Default)]
struct Raised {
    na_introduced: bool,
    int_range:     bool,
    raw_range:     bool,
}

impl Raised {
    fn flush(self, warnings: &mut Vec<WarningKind>) {
        if self.na_introduced {
            warnings.push(WarningKind::NasIntroducedByCoercion);
        }
        if self.int_range {
            warnings.push(WarningKind::NasIntroducedByCoercionIntRange);
        }
        if self.raw_range {
            warnings.push(WarningKind::OutOfRangeRaw);
        }
    }
}

/// Converts a value into a vector of `target` kind.
///
/// `NULL` becomes a zero-length vector. Foreign objects are converted
/// through their vector view. Functions and other non-vector values fail
/// with [`CoercionError::InvalidTypeArgument`]. Conversion warnings are
/// appended to `warnings`, each kind at most once per call.
///
/// # Errors
/// Returns a [`CoercionError`] when the value has no defined conversion.
///
/// # Example
/// ```
/// use statcore::interpreter::{
///     coercion::{PreservePolicy, coerce},
///     value::{Kind, Value},
/// };
///
/// let mut warnings = Vec::new();
/// let v = coerce(&Value::character("12"), Kind::Integer, PreservePolicy::NONE, &mut warnings).unwrap();
/// assert_eq!(v.kind(), Kind::Integer);
/// assert!(warnings.is_empty());
/// ```
pub fn coerce(value: &Value,
              target: Kind,
              policy: PreservePolicy,
              warnings: &mut Vec<WarningKind>)
              -> Result<Vector, CoercionError> {
    match value {
        Value::Null => Ok(Vector::empty(target)),
        Value::Vector(v) => coerce_vector(v, target, policy, warnings),
        Value::External(e) => match e.as_vector() {
            Some(v) => coerce_vector(&v, target, policy, warnings),
            None => Err(CoercionError::CannotCoerceExternalObject),
        },
        other => Err(CoercionError::InvalidTypeArgument { type_name: other.type_name() }),
    }
}

/// Converts a vector into `target` kind; see [`coerce`].
///
/// Coercing to the vector's own kind keeps its elements untouched, strided
/// storage included, so the operation is idempotent.
///
/// # Errors
/// Returns [`CoercionError::CannotCoerceListElement`] when a list element
/// does not reduce to a single value.
pub fn coerce_vector(vector: &Vector,
                     target: Kind,
                     policy: PreservePolicy,
                     warnings: &mut Vec<WarningKind>)
                     -> Result<Vector, CoercionError> {
    let attributes = policy.filter(vector.attributes());
    if vector.kind() == target {
        return Ok(Vector::with_attributes(vector.data().clone(), attributes));
    }
    let mut raised = Raised::default();
    let data = convert(&vector.data().to_dense(), target, &mut raised, warnings)?;
    raised.flush(warnings);
    Ok(Vector::with_attributes(data, attributes))
}

fn convert(data: &VectorData,
           target: Kind,
           raised: &mut Raised,
           warnings: &mut Vec<WarningKind>)
           -> Result<VectorData, CoercionError> {
    if let VectorData::List(elements) = data {
        return from_list(elements, target, warnings);
    }
    Ok(match target {
        Kind::Logical => VectorData::Logical(map_dense(data, |e| e.to_logical())),
        Kind::Integer => VectorData::Integer(map_dense(data, |e| e.to_integer(raised))),
        Kind::Double => VectorData::Double(map_dense(data, |e| e.to_double(raised))),
        Kind::Complex => VectorData::Complex(map_dense(data, |e| e.to_complex(raised))),
        Kind::Character => VectorData::Character(map_dense(data, |e| e.to_character())),
        Kind::Raw => VectorData::Raw(map_dense(data, |e| e.to_raw(raised))),
        Kind::List => VectorData::List(map_dense(data, |e| e.into_value())),
    })
}

/// One atomic element, borrowed from its vector.
#[derive(Clone, Copy)]
enum Scalar<'a> {
    Logical(Logical),
    Integer(i32),
    Double(f64),
    Complex(ComplexNumber),
    Character(Option<&'a str>),
    Raw(u8),
}

fn map_dense<T>(data: &VectorData, mut f: impl FnMut(Scalar<'_>) -> T) -> Vec<T> {
    match data {
        VectorData::Logical(v) => v.iter().map(|x| f(Scalar::Logical(*x))).collect(),
        VectorData::Integer(v) => v.iter().map(|x| f(Scalar::Integer(*x))).collect(),
        VectorData::Double(v) => v.iter().map(|x| f(Scalar::Double(*x))).collect(),
        VectorData::Complex(v) => v.iter().map(|x| f(Scalar::Complex(*x))).collect(),
        VectorData::Character(v) => v.iter().map(|x| f(Scalar::Character(x.as_deref()))).collect(),
        VectorData::Raw(v) => v.iter().map(|x| f(Scalar::Raw(*x))).collect(),
        VectorData::IntegerSequence { .. } | VectorData::DoubleSequence { .. } => {
            map_dense(&data.to_dense(), f)
        },
        VectorData::List(_) => Vec::new(),
    }
}

impl Scalar<'_> {
    fn to_logical(self) -> Logical {
        match self {
            Self::Logical(l) => l,
            Self::Integer(i) => {
                if i == NA_INTEGER {
                    Logical::Na
                } else {
                    (i != 0).into()
                }
            },
            Self::Double(d) => logical_from_double(d),
            Self::Complex(c) => logical_from_double(c.real),
            Self::Character(s) => s.map_or(Logical::Na, logical_from_str),
            Self::Raw(b) => (b != 0).into(),
        }
    }

    fn to_integer(self, raised: &mut Raised) -> i32 {
        match self {
            Self::Logical(l) => l.to_integer(),
            Self::Integer(i) => i,
            Self::Double(d) => integer_from_double(d, raised),
            Self::Complex(c) => {
                if c.is_na() {
                    NA_INTEGER
                } else {
                    integer_from_double(c.real, raised)
                }
            },
            Self::Character(None) => NA_INTEGER,
            Self::Character(Some(s)) => match parse_double(s) {
                Some(d) if is_na_real(d) => NA_INTEGER,
                Some(d) => integer_from_double(d, raised),
                None => {
                    raised.na_introduced = true;
                    NA_INTEGER
                },
            },
            Self::Raw(b) => i32::from(b),
        }
    }

    fn to_double(self, raised: &mut Raised) -> f64 {
        match self {
            Self::Logical(l) => {
                if l.is_na() {
                    NA_REAL
                } else {
                    f64::from(l.to_integer())
                }
            },
            Self::Integer(i) => {
                if i == NA_INTEGER {
                    NA_REAL
                } else {
                    f64::from(i)
                }
            },
            Self::Double(d) => d,
            Self::Complex(c) => {
                if c.is_na() {
                    NA_REAL
                } else {
                    c.real
                }
            },
            Self::Character(None) => NA_REAL,
            Self::Character(Some(s)) => parse_double(s).unwrap_or_else(|| {
                                                           raised.na_introduced = true;
                                                           NA_REAL
                                                       }),
            Self::Raw(b) => f64::from(b),
        }
    }

    fn to_complex(self, raised: &mut Raised) -> ComplexNumber {
        match self {
            Self::Complex(c) => c,
            Self::Character(None) => NA_COMPLEX,
            Self::Character(Some(s)) => parse_complex(s).unwrap_or_else(|| {
                                                            raised.na_introduced = true;
                                                            NA_COMPLEX
                                                        }),
            other => ComplexNumber::from(other.to_double(raised)),
        }
    }

    fn to_character(self) -> Option<String> {
        match self {
            Self::Logical(l) => l.to_bool().map(|b| if b { "TRUE" } else { "FALSE" }.to_string()),
            Self::Integer(i) => (i != NA_INTEGER).then(|| i.to_string()),
            Self::Double(d) => (!is_na_real(d)).then(|| format_double(d, CHARACTER_DIGITS)),
            Self::Complex(c) => (!c.is_na()).then(|| c.to_string()),
            Self::Character(s) => s.map(str::to_string),
            Self::Raw(b) => Some(format!("{b:02x}")),
        }
    }

    fn to_raw(self, raised: &mut Raised) -> u8 {
        let as_int = match self {
            Self::Raw(b) => return b,
            other => other.to_integer(raised),
        };
        u8::try_from(as_int).unwrap_or_else(|_| {
                                raised.raw_range = true;
                                0
                            })
    }

    fn into_value(self) -> Value {
        match self {
            Self::Logical(l) => Vector::logical(l).into(),
            Self::Integer(i) => Vector::integer(i).into(),
            Self::Double(d) => Vector::double(d).into(),
            Self::Complex(c) => Vector::complex(c).into(),
            Self::Character(s) => Vector::character(s).into(),
            Self::Raw(b) => VectorData::Raw(vec![b]).into(),
        }
    }
}

fn logical_from_double(d: f64) -> Logical {
    if d.is_nan() { Logical::Na } else { (d != 0.0).into() }
}

/// Parses a logical token: `TRUE`, `T`, `true`, `True`, `1` and the
/// `FALSE` counterparts. Anything else is NA.
///
/// # Example
/// ```
/// use statcore::interpreter::{coercion::logical_from_str, value::Logical};
///
/// assert_eq!(logical_from_str("T"), Logical::True);
/// assert_eq!(logical_from_str("false"), Logical::False);
/// assert_eq!(logical_from_str("1"), Logical::True);
/// assert_eq!(logical_from_str("0"), Logical::False);
/// assert_eq!(logical_from_str("yes"), Logical::Na);
/// ```
#[must_use]
pub fn logical_from_str(s: &str) -> Logical {
    match s {
        "TRUE" | "T" | "true" | "True" | "1" => Logical::True,
        "FALSE" | "F" | "false" | "False" | "0" => Logical::False,
        _ => Logical::Na,
    }
}

fn integer_from_double(d: f64, raised: &mut Raised) -> i32 {
    if d.is_nan() {
        return NA_INTEGER;
    }
    if d >= 2_147_483_648.0 || d <= -2_147_483_648.0 {
        raised.int_range = true;
        return NA_INTEGER;
    }
    #[allow(clippy::cast_possible_truncation)]
    let i = d.trunc() as i32;
    i
}

/// Parses a number the way character-to-double coercion does.
///
/// Surrounding whitespace is ignored. `NA` yields the double NA; `Inf`,
/// `NaN` and hexadecimal literals are accepted. Returns `None` when the text
/// is not a number.
///
/// # Example
/// ```
/// use statcore::interpreter::{coercion::parse_double, value::is_na_real};
///
/// assert_eq!(parse_double(" 2.5 "), Some(2.5));
/// assert_eq!(parse_double("0x10"), Some(16.0));
/// assert_eq!(parse_double("-Inf"), Some(f64::NEG_INFINITY));
/// assert!(parse_double("NA").is_some_and(is_na_real));
/// assert_eq!(parse_double("abc"), None);
/// ```
#[must_use]
pub fn parse_double(s: &str) -> Option<f64> {
    let s = s.trim();
    if s == "NA" {
        return Some(NA_REAL);
    }
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        #[allow(clippy::cast_precision_loss)]
        let value = u64::from_str_radix(hex, 16).ok()? as f64;
        value
    } else {
        if body.is_empty() || body.starts_with(['+', '-']) {
            return None;
        }
        body.parse::<f64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_complex(s: &str) -> Option<ComplexNumber> {
    let s = s.trim();
    if let Some(d) = parse_double(s) {
        return Some(ComplexNumber::from(d));
    }
    let body = s.strip_suffix('i')?;
    let split = body.char_indices()
                    .skip(1)
                    .filter(|&(i, c)| {
                        matches!(c, '+' | '-') && !matches!(body.as_bytes()[i - 1], b'e' | b'E')
                    })
                    .map(|(i, _)| i)
                    .last();
    match split {
        Some(i) => Some(ComplexNumber::new(parse_double(&body[..i])?, parse_double(&body[i..])?)),
        None => Some(ComplexNumber::new(0.0, parse_double(body)?)),
    }
}

fn from_list(elements: &[Value],
             target: Kind,
             warnings: &mut Vec<WarningKind>)
             -> Result<VectorData, CoercionError> {
    if target == Kind::List {
        return Ok(VectorData::List(elements.to_vec()));
    }
    let mut out = VectorData::empty(target);
    for element in elements {
        let single = match element {
            Value::Vector(v) if v.kind() == Kind::List || v.is_empty() => {
                VectorData::na_filled(target, 1)
            },
            Value::Vector(v) if v.len() == 1 => {
                coerce_vector(v, target, PreservePolicy::NONE, warnings)?.into_data()
            },
            Value::Null => VectorData::na_filled(target, 1),
            _ => return Err(CoercionError::CannotCoerceListElement { target }),
        };
        out.append(single);
    }
    Ok(out)
}

/// First element of `value` as a logical, or `None` when `value` is not an
/// atomic vector with at least one element.
#[must_use]
pub fn logical_scalar(value: &Value) -> Option<Logical> {
    scalar(value, Kind::Logical).and_then(|v| v.logicals().map(|l| l[0]))
}

/// First element of `value` as an integer (possibly NA).
#[must_use]
pub fn integer_scalar(value: &Value) -> Option<i32> {
    match scalar(value, Kind::Integer)?.into_data() {
        VectorData::Integer(v) => Some(v[0]),
        _ => None,
    }
}

/// First element of `value` as a double (possibly NA).
#[must_use]
pub fn double_scalar(value: &Value) -> Option<f64> {
    match scalar(value, Kind::Double)?.into_data() {
        VectorData::Double(v) => Some(v[0]),
        _ => None,
    }
}

/// First element of `value` as a string; `Some(None)` for NA.
#[must_use]
pub fn string_scalar(value: &Value) -> Option<Option<String>> {
    match scalar(value, Kind::Character)?.into_data() {
        VectorData::Character(mut v) => Some(v.swap_remove(0)),
        _ => None,
    }
}

fn scalar(value: &Value, kind: Kind) -> Option<Vector> {
    let v = value.as_vector()?;
    if v.is_empty() || v.kind() == Kind::List {
        return None;
    }
    let first = v.data().select(&[Some(0)]);
    coerce_vector(&Vector::new(first), kind, PreservePolicy::NONE, &mut Vec::new()).ok()
}
