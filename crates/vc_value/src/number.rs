use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::TextError;

// -----------------------------------------------------------------------------
// Number

/// An arbitrary-precision JSON number.
///
/// The number keeps the exact literal it was parsed or created from, so
/// integers of any length and decimals of any precision survive a round trip
/// through text untouched. Conversions to native integers and floats are
/// checked and return `None` when the literal does not fit.
///
/// Equality compares literals: `1`, `1.0` and `1e0` are different numbers.
///
/// # Examples
///
/// ```
/// use vc_value::Number;
///
/// let n = Number::from(42_u8);
/// assert_eq!(n.as_i64(), Some(42));
/// assert_eq!(n.as_u64(), Some(42));
///
/// let f = Number::from_f64(2.0).unwrap();
/// assert!(f.is_f64());
/// assert_eq!(f.as_u64(), Some(2));
///
/// let big: Number = "123456789012345678901234567890".parse().unwrap();
/// assert_eq!(big.as_u64(), None);
/// assert_eq!(big.as_str(), "123456789012345678901234567890");
///
/// assert!(Number::from_f64(f64::NAN).is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Number {
    inner: serde_json::Number,
}

// Exclusive upper bounds of the integer ranges, as floats.
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Number {
    /// Creates a number from a finite float, returns `None` for NaN or infinity.
    #[inline]
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Self::from_inner)
    }

    /// Creates a number from a 128-bit signed integer.
    #[inline]
    pub fn from_i128(value: i128) -> Option<Self> {
        serde_json::Number::from_i128(value).map(Self::from_inner)
    }

    /// Creates a number from a 128-bit unsigned integer.
    #[inline]
    pub fn from_u128(value: u128) -> Option<Self> {
        serde_json::Number::from_u128(value).map(Self::from_inner)
    }

    #[inline]
    pub(crate) const fn from_inner(inner: serde_json::Number) -> Self {
        Self { inner }
    }

    #[inline]
    pub(crate) fn into_inner(self) -> serde_json::Number {
        self.inner
    }

    #[inline]
    pub(crate) fn inner(&self) -> &serde_json::Number {
        &self.inner
    }

    /// Returns the literal text of the number.
    ///
    /// Parsed exponents are normalized to carry a sign, so `1e5` reads back as
    /// `1e+5`.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns `true` if the literal is an integer that fits `u64`.
    #[inline]
    pub fn is_u64(&self) -> bool {
        self.inner.is_u64()
    }

    /// Returns `true` if the literal is an integer that fits `i64`.
    #[inline]
    pub fn is_i64(&self) -> bool {
        self.inner.is_i64()
    }

    /// Returns `true` if the literal has a fraction or an exponent and its
    /// value is inside the finite `f64` range.
    #[inline]
    pub fn is_f64(&self) -> bool {
        self.inner.is_f64()
    }

    /// Returns the number as `u64` if it is exactly representable.
    ///
    /// Fractional literals with no fractional part inside the range, such as
    /// `2.0` or `1e2`, are accepted.
    pub fn as_u64(&self) -> Option<u64> {
        self.inner.as_u64().or_else(|| {
            let f = self.integral_f64()?;
            (0.0..U64_BOUND).contains(&f).then_some(f as u64)
        })
    }

    /// Returns the number as `i64` if it is exactly representable.
    ///
    /// Fractional literals with no fractional part inside the range are
    /// accepted.
    pub fn as_i64(&self) -> Option<i64> {
        self.inner.as_i64().or_else(|| {
            let f = self.integral_f64()?;
            (-I64_BOUND..I64_BOUND).contains(&f).then_some(f as i64)
        })
    }

    /// Returns the number as `u128` if it is an integer literal that fits.
    #[inline]
    pub fn as_u128(&self) -> Option<u128> {
        self.inner.as_u128()
    }

    /// Returns the number as `i128` if it is an integer literal that fits.
    #[inline]
    pub fn as_i128(&self) -> Option<i128> {
        self.inner.as_i128()
    }

    /// Returns the nearest `f64`, or `None` if the number is outside the
    /// finite `f64` range.
    ///
    /// Digits beyond `f64` precision are rounded here; callers asking for a
    /// float have opted into that.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        self.inner.as_f64()
    }

    fn integral_f64(&self) -> Option<f64> {
        self.inner.as_f64().filter(|f| f.fract() == 0.0)
    }
}

impl FromStr for Number {
    type Err = TextError;

    /// Parses a single JSON number literal.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        serde_json::Number::from_str(text)
            .map(Self::from_inner)
            .map_err(|e| TextError::Syntax {
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            })
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}

impl fmt::Display for Number {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::from_inner(serde_json::Number::from(value))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Number;

    #[test]
    fn signed_and_unsigned_agree() {
        assert_eq!(Number::from(7_i32), Number::from(7_u64));
        assert!(Number::from(7_i64).is_u64());
        assert!(!Number::from(-7_i64).is_u64());
    }

    #[test]
    fn extremes_are_exact() {
        assert_eq!(Number::from(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Number::from(u64::MAX).as_i64(), None);
        assert_eq!(Number::from(i64::MIN).as_i64(), Some(i64::MIN));
        assert_eq!(Number::from(i64::MIN).as_u64(), None);
    }

    #[test]
    fn integral_floats_coerce() {
        let n = Number::from_f64(-3.0).unwrap();
        assert_eq!(n.as_i64(), Some(-3));
        assert_eq!(n.as_u64(), None);

        let n = Number::from_f64(3.5).unwrap();
        assert_eq!(n.as_i64(), None);
        assert_eq!(n.as_f64(), Some(3.5));

        let n: Number = "1e2".parse().unwrap();
        assert_eq!(n.as_u64(), Some(100));
    }

    #[test]
    fn float_is_not_int() {
        assert_ne!(Number::from_f64(1.0).unwrap(), Number::from(1_u8));
        assert!(Number::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn wide_literals_keep_every_digit() {
        let n: Number = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(n.to_string(), "123456789012345678901234567890");
        assert_eq!(n.as_u64(), None);
        assert_eq!(n.as_u128(), Some(123_456_789_012_345_678_901_234_567_890));

        let n: Number = "0.10000000000000000000000000001".parse().unwrap();
        assert_eq!(n.as_str(), "0.10000000000000000000000000001");
        assert_eq!(n.as_f64(), Some(0.1));

        let n = Number::from_i128(i128::MIN).unwrap();
        assert_eq!(n.as_i128(), Some(i128::MIN));
        assert_eq!(n.as_i64(), None);
    }

    #[test]
    fn beyond_f64_range() {
        let n: Number = "1e400".parse().unwrap();
        assert_eq!(n.as_f64(), None);
        assert_eq!(n.as_u64(), None);
        assert!(!n.is_f64());
    }

    #[test]
    fn malformed_literal() {
        assert!("1.".parse::<Number>().is_err());
        assert!("0x10".parse::<Number>().is_err());
        assert!("NaN".parse::<Number>().is_err());
    }
}
