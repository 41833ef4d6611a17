use std::{fmt, ops};

use crate::interpreter::value::{
    format::format_double,
    na::{NA_REAL, is_na_real},
};

/// The complex NA: both parts are the double NA.
pub const NA_COMPLEX: ComplexNumber = ComplexNumber::new(NA_REAL, NA_REAL);

/// One element of a complex vector.
#[derive(Debug, Clone, Copy)]
pub struct ComplexNumber {
    pub real:      f64,
    pub imaginary: f64,
}

impl ComplexNumber {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const UNIT: Self = Self::new(1.0, 0.0);

    /// # Example
    /// ```
    /// use statcore::interpreter::value::complex::ComplexNumber;
    /// let z = ComplexNumber::new(5.0, -1.0);
    /// assert_eq!((z.real, z.imaginary), (5.0, -1.0));
    /// ```
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// A complex value is NA as soon as one of its parts is.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::value::{NA_REAL, complex::ComplexNumber};
    /// assert!(ComplexNumber::new(0.0, NA_REAL).is_na());
    /// assert!(!ComplexNumber::new(f64::NAN, 0.0).is_na());
    /// ```
    #[must_use]
    pub fn is_na(self) -> bool {
        is_na_real(self.real) || is_na_real(self.imaginary)
    }

    /// NaN in either part, NA included.
    #[must_use]
    pub const fn is_nan(self) -> bool {
        self.real.is_nan() || self.imaginary.is_nan()
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }

    /// Modulus.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::value::complex::ComplexNumber;
    /// assert_eq!(ComplexNumber::new(-6.0, 8.0).modulus(), 10.0);
    /// ```
    #[must_use]
    pub fn modulus(self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    /// `z^w` computed in polar form. Any `z` to the zero power is `1`; zero
    /// to a positive real power is `0`, and to any other power NaN.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::value::complex::ComplexNumber;
    /// let i = ComplexNumber::new(0.0, 1.0);
    /// let minus_one = i.pow(ComplexNumber::new(2.0, 0.0));
    /// assert!((minus_one.real + 1.0).abs() < 1e-12);
    /// assert!(minus_one.imaginary.abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn pow(self, exponent: Self) -> Self {
        if exponent == Self::ZERO {
            return Self::UNIT;
        }
        if self == Self::ZERO {
            let positive_real = exponent.imaginary == 0.0 && exponent.real > 0.0;
            return if positive_real { Self::ZERO } else { Self::new(f64::NAN, f64::NAN) };
        }
        let log_modulus = self.modulus().ln();
        let phase = self.imaginary.atan2(self.real);
        let radius = exponent.real.mul_add(log_modulus, -(exponent.imaginary * phase)).exp();
        let angle = exponent.imaginary.mul_add(log_modulus, exponent.real * phase);
        let (sin, cos) = angle.sin_cos();
        Self::new(radius * cos, radius * sin)
    }

    /// Equality as `identical()` sees it.
    #[must_use]
    pub fn identical(self, other: Self) -> bool {
        same_double(self.real, other.real) && same_double(self.imaginary, other.imaginary)
    }
}

/// Double equality as `identical()` sees it: NA only matches NA, any two
/// NaNs match, and signed zeros are equal.
///
/// # Example
/// ```
/// use statcore::interpreter::value::{NA_REAL, complex::same_double};
/// assert!(same_double(f64::NAN, f64::NAN));
/// assert!(!same_double(NA_REAL, f64::NAN));
/// assert!(same_double(0.0, -0.0));
/// ```
#[must_use]
pub fn same_double(a: f64, b: f64) -> bool {
    match (is_na_real(a), is_na_real(b)) {
        (true, true) => true,
        (false, false) => a == b || (a.is_nan() && b.is_nan()),
        _ => false,
    }
}

impl fmt::Display for ComplexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_na() {
            return f.write_str("NA");
        }
        let (sign, imaginary) = if self.imaginary.is_sign_negative() && !self.imaginary.is_nan() {
            ('-', -self.imaginary)
        } else {
            ('+', self.imaginary)
        };
        write!(f, "{}{sign}{}i", format_double(self.real, 15), format_double(imaginary, 15))
    }
}

impl From<f64> for ComplexNumber {
    fn from(value: f64) -> Self {
        if is_na_real(value) { NA_COMPLEX } else { Self::new(value, 0.0) }
    }
}

impl PartialEq for ComplexNumber {
    fn eq(&self, other: &Self) -> bool {
        (self.real, self.imaginary) == (other.real, other.imaginary)
    }
}

impl ops::Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.real, -self.imaginary)
    }
}

impl ops::Add for ComplexNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.real + rhs.real, self.imaginary + rhs.imaginary)
    }
}

impl ops::Sub for ComplexNumber {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b, c, d) = (self.real, self.imaginary, rhs.real, rhs.imaginary);
        Self::new(a.mul_add(c, -(b * d)), a.mul_add(d, b * c))
    }
}

impl ops::Div for ComplexNumber {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let (a, b, c, d) = (self.real, self.imaginary, rhs.real, rhs.imaginary);
        let scale = c.mul_add(c, d * d);
        Self::new(a.mul_add(c, b * d) / scale, b.mul_add(c, -(a * d)) / scale)
    }
}

impl ops::AddAssign for ComplexNumber {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::MulAssign for ComplexNumber {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
