use crate::error::ParseFileNumberError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// A frame or tile number: an integer or a fixed-precision decimal (subframe).
///
/// Values are always normalized, so `1.50`, `1.5` and `01.5` are the same
/// number and render the same way. Arithmetic is exact; there is no
/// floating point anywhere in a progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct FileNumber(Decimal);

impl FileNumber {
    pub const ZERO: FileNumber = FileNumber(Decimal::ZERO);
    pub const ONE: FileNumber = FileNumber(Decimal::ONE);

    /// Create a file number, dropping trailing fractional zeros
    pub fn new(value: Decimal) -> Self {
        FileNumber(value.normalize())
    }

    pub fn from_int(n: i64) -> Self {
        FileNumber(Decimal::from(n))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_integer(&self) -> bool {
        self.0.scale() == 0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Number of digits after the decimal point
    pub fn fraction_digits(&self) -> u32 {
        self.0.scale()
    }

    /// The value as an `i64`, if it is an integer that fits
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.0.to_i64()
        } else {
            None
        }
    }

    pub fn abs(self) -> Self {
        FileNumber(self.0.abs())
    }

    pub fn checked_add(self, other: FileNumber) -> Option<FileNumber> {
        self.0.checked_add(other.0).map(FileNumber::new)
    }

    pub fn checked_sub(self, other: FileNumber) -> Option<FileNumber> {
        self.0.checked_sub(other.0).map(FileNumber::new)
    }

    /// `self * k`, used to address the k-th term of a progression
    pub fn checked_scale(self, k: u64) -> Option<FileNumber> {
        self.0.checked_mul(Decimal::from(k)).map(FileNumber::new)
    }

    /// Align two numbers on a common scale and return their integer mantissas.
    ///
    /// `1.5` and `0.25` become `(150, 25)`. Returns `None` if the aligned
    /// mantissas do not fit in an `i128`.
    pub fn aligned_mantissas(self, other: FileNumber) -> Option<(i128, i128)> {
        let scale = self.0.scale().max(other.0.scale());
        let lift = |d: Decimal| -> Option<i128> {
            let factor = 10i128.checked_pow(scale - d.scale())?;
            d.mantissa().checked_mul(factor)
        };
        Some((lift(self.0)?, lift(other.0)?))
    }
}

impl From<Decimal> for FileNumber {
    fn from(value: Decimal) -> Self {
        FileNumber::new(value)
    }
}

impl From<FileNumber> for Decimal {
    fn from(n: FileNumber) -> Self {
        n.0
    }
}

impl From<i64> for FileNumber {
    fn from(n: i64) -> Self {
        FileNumber::from_int(n)
    }
}

impl From<i32> for FileNumber {
    fn from(n: i32) -> Self {
        FileNumber::from_int(n as i64)
    }
}

impl From<u32> for FileNumber {
    fn from(n: u32) -> Self {
        FileNumber::from_int(n as i64)
    }
}

impl FromStr for FileNumber {
    type Err = ParseFileNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.contains(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-')) {
            return Err(ParseFileNumberError::new(s));
        }
        Decimal::from_str_exact(s)
            .map(FileNumber::new)
            .map_err(|_| ParseFileNumberError::new(s))
    }
}

impl Add for FileNumber {
    type Output = FileNumber;

    fn add(self, other: FileNumber) -> FileNumber {
        FileNumber::new(self.0 + other.0)
    }
}

impl Sub for FileNumber {
    type Output = FileNumber;

    fn sub(self, other: FileNumber) -> FileNumber {
        FileNumber::new(self.0 - other.0)
    }
}

impl Neg for FileNumber {
    type Output = FileNumber;

    fn neg(self) -> FileNumber {
        FileNumber::new(-self.0)
    }
}

impl fmt::Display for FileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> FileNumber {
        s.parse().unwrap()
    }

    #[test]
    fn test_normalization() {
        assert_eq!(num("1.50"), num("1.5"));
        assert_eq!(num("1.0").to_string(), "1");
        assert_eq!(num("0010").to_string(), "10");
        assert!(num("2.000").is_integer());
        assert!(!num("2.5").is_integer());
    }

    #[test]
    fn test_negative_zero() {
        let zero = num("-0");
        assert_eq!(zero, FileNumber::ZERO);
        assert!(!zero.is_negative());
        assert_eq!(zero.to_string(), "0");
    }

    #[test]
    fn test_exact_arithmetic() {
        let mut value = num("1");
        for _ in 0..6 {
            value = value + num("0.3");
        }
        assert_eq!(value, num("2.8"));
        assert_eq!(num("0.1") + num("0.2"), num("0.3"));
        assert_eq!(num("1") - num("1.5"), num("-0.5"));
        assert_eq!(num("0.3").checked_scale(4), Some(num("1.2")));
    }

    #[test]
    fn test_ordering() {
        let mut values = vec![num("10"), num("-1"), num("1.5"), num("1")];
        values.sort();
        assert_eq!(values, vec![num("-1"), num("1"), num("1.5"), num("10")]);
    }

    #[test]
    fn test_aligned_mantissas() {
        assert_eq!(num("1.5").aligned_mantissas(num("0.25")), Some((150, 25)));
        assert_eq!(num("-3").aligned_mantissas(num("2")), Some((-3, 2)));
    }

    #[test]
    fn test_to_i64() {
        assert_eq!(num("1001").to_i64(), Some(1001));
        assert_eq!(num("-4").to_i64(), Some(-4));
        assert_eq!(num("1.5").to_i64(), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<FileNumber>().is_err());
        assert!("abc".parse::<FileNumber>().is_err());
        assert!("1e5".parse::<FileNumber>().is_err());
        assert!("1.2.3".parse::<FileNumber>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&num("1.50")).unwrap();
        assert_eq!(json, "\"1.5\"");
        let back: FileNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, num("1.5"));
    }
}
