use std::rc::Rc;

use crate::interpreter::value::{
    complex::{ComplexNumber, NA_COMPLEX, same_double},
    core::Value,
    kind::Kind,
    na::{Logical, NA_INTEGER, NA_REAL, is_na_real},
};

/// Attribute name holding element names.
pub const NAMES: &str = "names";
/// Attribute name holding dimensions.
pub const DIM: &str = "dim";
/// Attribute name holding dimension names.
pub const DIMNAMES: &str = "dimnames";
/// Attribute name holding the class vector.
pub const CLASS: &str = "class";

/// Element storage of a vector.
///
/// The two sequence variants are strided vectors: they stand for
/// `start, start + stride, ...` without storing the elements. Every
/// operation that reads elements gives the same values for a sequence and
/// for its materialized form.
#[derive(Debug, Clone)]
pub enum VectorData {
    /// Logical elements.
    Logical(Vec<Logical>),
    /// Integer elements; NA is [`NA_INTEGER`].
    Integer(Vec<i32>),
    /// Double elements; NA is [`NA_REAL`].
    Double(Vec<f64>),
    /// Complex elements.
    Complex(Vec<ComplexNumber>),
    /// String elements; NA is `None`.
    Character(Vec<Option<String>>),
    /// Bytes.
    Raw(Vec<u8>),
    /// Arbitrary values.
    List(Vec<Value>),
    /// `start + i * stride` for `i < len`, as integers.
    IntegerSequence {
        /// First element.
        start:  i32,
        /// Difference between neighbours.
        stride: i32,
        /// Number of elements.
        len:    usize,
    },
    /// `start + i * stride` for `i < len`, as doubles.
    DoubleSequence {
        /// First element.
        start:  f64,
        /// Difference between neighbours.
        stride: f64,
        /// Number of elements.
        len:    usize,
    },
}

/// Element `i` of an integer sequence.
///
/// Sequences are only built when every element fits in `i32`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn integer_sequence_at(start: i32, stride: i32, i: usize) -> i32 {
    (start as i64 + i as i64 * stride as i64) as i32
}

/// Element `i` of a double sequence.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn double_sequence_at(start: f64, stride: f64, i: usize) -> f64 {
    (i as f64).mul_add(stride, start)
}

impl VectorData {
    /// The kind of the elements.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Logical(_) => Kind::Logical,
            Self::Integer(_) | Self::IntegerSequence { .. } => Kind::Integer,
            Self::Double(_) | Self::DoubleSequence { .. } => Kind::Double,
            Self::Complex(_) => Kind::Complex,
            Self::Character(_) => Kind::Character,
            Self::Raw(_) => Kind::Raw,
            Self::List(_) => Kind::List,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Logical(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Complex(v) => v.len(),
            Self::Character(v) => v.len(),
            Self::Raw(v) => v.len(),
            Self::List(v) => v.len(),
            Self::IntegerSequence { len, .. } | Self::DoubleSequence { len, .. } => *len,
        }
    }

    /// Returns `true` when there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for the strided variants.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::IntegerSequence { .. } | Self::DoubleSequence { .. })
    }

    /// Returns the dense form of the data.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::value::VectorData;
    ///
    /// let seq = VectorData::IntegerSequence { start: 3, stride: -1, len: 3 };
    /// assert!(matches!(seq.to_dense(), VectorData::Integer(v) if v == vec![3, 2, 1]));
    /// ```
    #[must_use]
    pub fn to_dense(&self) -> Self {
        match self {
            Self::IntegerSequence { start, stride, len } => {
                Self::Integer((0..*len).map(|i| integer_sequence_at(*start, *stride, i)).collect())
            },
            Self::DoubleSequence { start, stride, len } => {
                Self::Double((0..*len).map(|i| double_sequence_at(*start, *stride, i)).collect())
            },
            other => other.clone(),
        }
    }

    /// Zero-length data of `kind`.
    #[must_use]
    pub const fn empty(kind: Kind) -> Self {
        match kind {
            Kind::Raw => Self::Raw(Vec::new()),
            Kind::Logical => Self::Logical(Vec::new()),
            Kind::Integer => Self::Integer(Vec::new()),
            Kind::Double => Self::Double(Vec::new()),
            Kind::Complex => Self::Complex(Vec::new()),
            Kind::Character => Self::Character(Vec::new()),
            Kind::List => Self::List(Vec::new()),
        }
    }

    /// `len` elements of `kind`, all NA (`NULL` for lists, `00` for raw).
    #[must_use]
    pub fn na_filled(kind: Kind, len: usize) -> Self {
        match kind {
            Kind::Raw => Self::Raw(vec![0; len]),
            Kind::Logical => Self::Logical(vec![Logical::Na; len]),
            Kind::Integer => Self::Integer(vec![NA_INTEGER; len]),
            Kind::Double => Self::Double(vec![NA_REAL; len]),
            Kind::Complex => Self::Complex(vec![NA_COMPLEX; len]),
            Kind::Character => Self::Character(vec![None; len]),
            Kind::List => Self::List(vec![Value::Null; len]),
        }
    }

    /// `len` default elements of `kind`, as `vector(mode, length)` creates
    /// them: `FALSE`, `0`, `""`, `00` or `NULL`.
    #[must_use]
    pub fn zeroed(kind: Kind, len: usize) -> Self {
        match kind {
            Kind::Raw => Self::Raw(vec![0; len]),
            Kind::Logical => Self::Logical(vec![Logical::False; len]),
            Kind::Integer => Self::Integer(vec![0; len]),
            Kind::Double => Self::Double(vec![0.0; len]),
            Kind::Complex => Self::Complex(vec![ComplexNumber::ZERO; len]),
            Kind::Character => Self::Character(vec![Some(String::new()); len]),
            Kind::List => Self::List(vec![Value::Null; len]),
        }
    }

    /// Returns `true` when any element is NA. Double NaN is not NA.
    #[must_use]
    pub fn has_na(&self) -> bool {
        match self {
            Self::Logical(v) => v.iter().any(|l| l.is_na()),
            Self::Integer(v) => v.contains(&NA_INTEGER),
            Self::Double(v) => v.iter().any(|d| is_na_real(*d)),
            Self::Complex(v) => v.iter().any(|c| c.is_na()),
            Self::Character(v) => v.iter().any(Option::is_none),
            Self::Raw(_)
            | Self::List(_)
            | Self::IntegerSequence { .. }
            | Self::DoubleSequence { .. } => false,
        }
    }

    /// Gathers elements by index. `None` and out-of-range indices produce
    /// the kind's NA element.
    #[must_use]
    pub fn select(&self, indices: &[Option<usize>]) -> Self {
        fn pick<T: Clone>(v: &[T], indices: &[Option<usize>], na: &T) -> Vec<T> {
            indices.iter()
                   .map(|i| i.and_then(|i| v.get(i)).unwrap_or(na).clone())
                   .collect()
        }
        let len = self.len();
        match self {
            Self::Logical(v) => Self::Logical(pick(v, indices, &Logical::Na)),
            Self::Integer(v) => Self::Integer(pick(v, indices, &NA_INTEGER)),
            Self::Double(v) => Self::Double(pick(v, indices, &NA_REAL)),
            Self::Complex(v) => Self::Complex(pick(v, indices, &NA_COMPLEX)),
            Self::Character(v) => Self::Character(pick(v, indices, &None)),
            Self::Raw(v) => Self::Raw(pick(v, indices, &0)),
            Self::List(v) => Self::List(pick(v, indices, &Value::Null)),
            Self::IntegerSequence { start, stride, .. } => {
                Self::Integer(indices.iter()
                                     .map(|i| match i {
                                         Some(i) if *i < len => integer_sequence_at(*start, *stride, *i),
                                         _ => NA_INTEGER,
                                     })
                                     .collect())
            },
            Self::DoubleSequence { start, stride, .. } => {
                Self::Double(indices.iter()
                                    .map(|i| match i {
                                        Some(i) if *i < len => double_sequence_at(*start, *stride, *i),
                                        _ => NA_REAL,
                                    })
                                    .collect())
            },
        }
    }

    /// Writes `source[k % source.len()]` into each `targets[k]`, growing
    /// with NA elements when a target lies past the end.
    ///
    /// Both sides must already have the same kind; `source` must not be
    /// empty when `targets` is not.
    pub fn assign(&mut self, targets: &[usize], source: &Self) {
        fn put<T: Clone>(v: &mut Vec<T>, targets: &[usize], src: &[T], na: &T) {
            for (k, &t) in targets.iter().enumerate() {
                if t >= v.len() {
                    v.resize(t + 1, na.clone());
                }
                v[t] = src[k % src.len()].clone();
            }
        }
        if self.is_sequence() {
            *self = self.to_dense();
        }
        let source = source.to_dense();
        match (self, &source) {
            (Self::Logical(v), Self::Logical(s)) => put(v, targets, s, &Logical::Na),
            (Self::Integer(v), Self::Integer(s)) => put(v, targets, s, &NA_INTEGER),
            (Self::Double(v), Self::Double(s)) => put(v, targets, s, &NA_REAL),
            (Self::Complex(v), Self::Complex(s)) => put(v, targets, s, &NA_COMPLEX),
            (Self::Character(v), Self::Character(s)) => put(v, targets, s, &None),
            (Self::Raw(v), Self::Raw(s)) => put(v, targets, s, &0),
            (Self::List(v), Self::List(s)) => put(v, targets, s, &Value::Null),
            _ => {},
        }
    }

    /// Grows the data to `len` elements with NA padding.
    pub fn extend_to(&mut self, len: usize) {
        if len <= self.len() {
            return;
        }
        let missing = len - self.len();
        let pad = Self::na_filled(self.kind(), missing);
        self.append(pad);
    }

    /// Appends `other`, which must be of the same kind.
    pub fn append(&mut self, other: Self) {
        if self.is_sequence() {
            *self = self.to_dense();
        }
        match (self, other.to_dense()) {
            (Self::Logical(v), Self::Logical(o)) => v.extend(o),
            (Self::Integer(v), Self::Integer(o)) => v.extend(o),
            (Self::Double(v), Self::Double(o)) => v.extend(o),
            (Self::Complex(v), Self::Complex(o)) => v.extend(o),
            (Self::Character(v), Self::Character(o)) => v.extend(o),
            (Self::Raw(v), Self::Raw(o)) => v.extend(o),
            (Self::List(v), Self::List(o)) => v.extend(o),
            _ => {},
        }
    }

    /// Removes the elements at the given (sorted, unique) indices.
    pub fn remove(&mut self, indices: &[usize]) {
        fn drop_at<T>(v: &mut Vec<T>, indices: &[usize]) {
            let mut i = 0;
            v.retain(|_| {
                let keep = indices.binary_search(&i).is_err();
                i += 1;
                keep
            });
        }
        if self.is_sequence() {
            *self = self.to_dense();
        }
        match self {
            Self::Logical(v) => drop_at(v, indices),
            Self::Integer(v) => drop_at(v, indices),
            Self::Double(v) => drop_at(v, indices),
            Self::Complex(v) => drop_at(v, indices),
            Self::Character(v) => drop_at(v, indices),
            Self::Raw(v) => drop_at(v, indices),
            Self::List(v) => drop_at(v, indices),
            Self::IntegerSequence { .. } | Self::DoubleSequence { .. } => {},
        }
    }

    /// Element-wise identity as `identical()` sees it.
    #[must_use]
    pub fn identical(&self, other: &Self) -> bool {
        if self.kind() != other.kind() || self.len() != other.len() {
            return false;
        }
        match (self.to_dense(), other.to_dense()) {
            (Self::Logical(a), Self::Logical(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => {
                a.iter().zip(&b).all(|(x, y)| same_double(*x, *y))
            },
            (Self::Complex(a), Self::Complex(b)) => {
                a.iter().zip(&b).all(|(x, y)| x.identical(*y))
            },
            (Self::Character(a), Self::Character(b)) => a == b,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::List(a), Self::List(b)) => a.iter().zip(&b).all(|(x, y)| x.identical(y)),
            _ => false,
        }
    }
}

/// Ordered attribute list of a vector.
///
/// Setting an attribute to `NULL` removes it. Insertion order is kept so
/// attributes print and compare in the order they were set.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    entries: Vec<(String, Value)>,
}

impl Attributes {
    /// Returns the attribute called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Sets or (for `NULL`) removes the attribute called `name`.
    pub fn set(&mut self, name: &str, value: Value) {
        if matches!(value, Value::Null) {
            self.entries.retain(|(n, _)| n != name);
            return;
        }
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns `true` when no attribute is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the attributes for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|(n, _)| keep(n));
    }

    fn identical(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
        && self.iter()
               .all(|(name, value)| other.get(name).is_some_and(|o| o.identical(value)))
    }
}

/// A vector: elements of one kind, a completeness flag and attributes.
///
/// `complete == true` guarantees that no element is NA. The flag is
/// recomputed whenever the elements are replaced.
#[derive(Debug, Clone)]
pub struct Vector {
    data:       VectorData,
    complete:   bool,
    attributes: Attributes,
}

impl Vector {
    /// Wraps `data` without attributes.
    #[must_use]
    pub fn new(data: VectorData) -> Self {
        let complete = !data.has_na();
        Self { data,
               complete,
               attributes: Attributes::default() }
    }

    /// Wraps `data` with the given attributes.
    #[must_use]
    pub fn with_attributes(data: VectorData, attributes: Attributes) -> Self {
        let mut v = Self::new(data);
        v.attributes = attributes;
        v
    }

    /// Zero-length vector of `kind`.
    #[must_use]
    pub fn empty(kind: Kind) -> Self {
        Self::new(VectorData::empty(kind))
    }

    /// Strided integer vector `start, start + stride, ...`.
    ///
    /// Returns `None` when the last element would not fit in an `i32` or
    /// would collide with the integer NA.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::value::Vector;
    ///
    /// let v = Vector::integer_sequence(1, 1, 10).unwrap();
    /// assert_eq!(v.len(), 10);
    /// assert!(v.is_complete());
    /// assert!(Vector::integer_sequence(i32::MAX, 1, 2).is_none());
    /// ```
    #[must_use]
    pub fn integer_sequence(start: i32, stride: i32, len: usize) -> Option<Self> {
        if len > 0 {
            if start == NA_INTEGER {
                return None;
            }
            let last = i64::from(start) + i64::try_from(len - 1).ok()? * i64::from(stride);
            if last <= i64::from(i32::MIN) || last > i64::from(i32::MAX) {
                return None;
            }
        }
        Some(Self::new(VectorData::IntegerSequence { start, stride, len }))
    }

    /// Strided double vector `start, start + stride, ...`.
    #[must_use]
    pub fn double_sequence(start: f64, stride: f64, len: usize) -> Self {
        Self::new(VectorData::DoubleSequence { start, stride, len })
    }

    /// Length-1 logical vector.
    #[must_use]
    pub fn logical(value: Logical) -> Self {
        Self::new(VectorData::Logical(vec![value]))
    }

    /// Length-1 integer vector.
    #[must_use]
    pub fn integer(value: i32) -> Self {
        Self::new(VectorData::Integer(vec![value]))
    }

    /// Length-1 double vector.
    #[must_use]
    pub fn double(value: f64) -> Self {
        Self::new(VectorData::Double(vec![value]))
    }

    /// Length-1 complex vector.
    #[must_use]
    pub fn complex(value: ComplexNumber) -> Self {
        Self::new(VectorData::Complex(vec![value]))
    }

    /// Length-1 character vector.
    #[must_use]
    pub fn character(value: Option<&str>) -> Self {
        Self::new(VectorData::Character(vec![value.map(str::to_string)]))
    }

    /// The element storage.
    #[must_use]
    pub const fn data(&self) -> &VectorData {
        &self.data
    }

    /// Consumes the vector, returning its storage.
    #[must_use]
    pub fn into_data(self) -> VectorData {
        self.data
    }

    /// Edits the storage in place and recomputes completeness.
    pub fn update_data(&mut self, edit: impl FnOnce(&mut VectorData)) {
        edit(&mut self.data);
        self.complete = !self.data.has_na();
    }

    /// The element kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.data.kind()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` when no element is NA.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// The attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the attributes.
    pub const fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Element names, when a `names` attribute is set.
    #[must_use]
    pub fn names(&self) -> Option<&[Option<String>]> {
        match self.attributes.get(NAMES) {
            Some(Value::Vector(v)) => match v.data() {
                VectorData::Character(names) => Some(names),
                _ => None,
            },
            _ => None,
        }
    }

    /// Sets (or with `None` clears) the element names.
    pub fn set_names(&mut self, names: Option<Vec<Option<String>>>) {
        let value = names.map_or(Value::Null, |n| {
                             Value::from(Self::new(VectorData::Character(n)))
                         });
        self.attributes.set(NAMES, value);
    }

    /// Extents of each dimension, when a `dim` attribute is set.
    #[must_use]
    pub fn dim(&self) -> Option<Vec<usize>> {
        match self.attributes.get(DIM) {
            Some(Value::Vector(v)) => match v.data().to_dense() {
                VectorData::Integer(d) => d.iter().map(|x| usize::try_from(*x).ok()).collect(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Elements of a logical vector; `None` for other kinds.
    #[must_use]
    pub fn logicals(&self) -> Option<&[Logical]> {
        match &self.data {
            VectorData::Logical(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a character vector; `None` for other kinds.
    #[must_use]
    pub fn strings(&self) -> Option<&[Option<String>]> {
        match &self.data {
            VectorData::Character(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a list; `None` for other kinds.
    #[must_use]
    pub fn elements(&self) -> Option<&[Value]> {
        match &self.data {
            VectorData::List(v) => Some(v),
            _ => None,
        }
    }

    /// Structural identity, attributes included.
    #[must_use]
    pub fn identical(&self, other: &Self) -> bool {
        self.data.identical(&other.data) && self.attributes.identical(&other.attributes)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Self::Vector(Rc::new(v))
    }
}

impl From<VectorData> for Value {
    fn from(data: VectorData) -> Self {
        Self::Vector(Rc::new(Vector::new(data)))
    }
}
