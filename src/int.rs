//! Arbitrary precision integers.

use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Possible errors that can arise during parsing an integer literal.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum IntParseError {
    Empty,
    InvalidDigit(char),
    MisplacedUnderscore,
}

impl Display for IntParseError {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            IntParseError::Empty => write!(f, "cannot parse integer from empty digits"),
            IntParseError::InvalidDigit(c) => write!(f, "invalid digit '{}' found in integer", c),
            IntParseError::MisplacedUnderscore => write!(f, "underscore must separate two digits"),
        }
    }
}

impl Error for IntParseError {}

/// An integer of any size, stored as a sign and a minimal big-endian magnitude.
///
/// Zero has an empty magnitude and is never negative.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Int {
    negative: bool,
    magnitude: Vec<u8>,
}

impl Int {
    /// Creates an integer from a sign and a big-endian magnitude, which need not be minimal.
    #[inline]
    pub fn from_magnitude(negative: bool, magnitude: &[u8]) -> Self {
        let start = magnitude.iter().position(|b| *b != 0).unwrap_or(magnitude.len());
        let magnitude = magnitude[start..].to_vec();
        Self {
            negative: negative && !magnitude.is_empty(),
            magnitude,
        }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Minimal big-endian magnitude; empty for zero.
    #[inline]
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    #[inline]
    pub fn to_i64(&self) -> Option<i64> {
        if self.magnitude.len() > 8 {
            return None;
        }
        let abs = self.magnitude.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);
        if self.negative {
            0i64.checked_sub_unsigned(abs)
        } else {
            i64::try_from(abs).ok()
        }
    }

    fn parse_radix(digits: &str, radix: u32) -> Result<Vec<u8>, IntParseError> {
        if digits.is_empty() {
            return Err(IntParseError::Empty);
        }
        if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
            return Err(IntParseError::MisplacedUnderscore);
        }

        let mut magnitude: Vec<u8> = Vec::new();
        for c in digits.chars().filter(|c| *c != '_') {
            let digit = c.to_digit(radix).ok_or(IntParseError::InvalidDigit(c))?;
            let mut carry = digit;
            for byte in magnitude.iter_mut().rev() {
                let v = *byte as u32 * radix + carry;
                *byte = v as u8;
                carry = v >> 8;
            }
            while carry > 0 {
                magnitude.insert(0, carry as u8);
                carry >>= 8;
            }
        }
        Ok(magnitude)
    }
}

impl FromStr for Int {
    type Err = IntParseError;

    /// Parses a decimal, `0x` hexadecimal or `0b` binary literal with optional `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let prefix = unsigned.get(..2).map(str::to_ascii_lowercase);
        let magnitude = match prefix.as_deref() {
            Some("0x") => Int::parse_radix(&unsigned[2..], 16)?,
            Some("0b") => Int::parse_radix(&unsigned[2..], 2)?,
            _ => Int::parse_radix(unsigned, 10)?,
        };
        Ok(Int::from_magnitude(negative, &magnitude))
    }
}

impl Display for Int {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        let mut digits = Vec::new();
        let mut value = self.magnitude.clone();
        while !value.is_empty() {
            let mut remainder = 0u32;
            for byte in value.iter_mut() {
                let v = (remainder << 8) | *byte as u32;
                *byte = (v / 10) as u8;
                remainder = v % 10;
            }
            digits.push(b'0' + remainder as u8);
            let start = value.iter().position(|b| *b != 0).unwrap_or(value.len());
            value.drain(..start);
        }

        if self.negative {
            f.write_str("-")?;
        }
        for digit in digits.iter().rev() {
            write!(f, "{}", *digit as char)?;
        }
        Ok(())
    }
}

impl PartialOrd for Int {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Int {
    fn cmp(&self, other: &Self) -> Ordering {
        let abs = self
            .magnitude
            .len()
            .cmp(&other.magnitude.len())
            .then_with(|| self.magnitude.cmp(&other.magnitude));
        match (self.negative, other.negative) {
            (false, false) => abs,
            (true, true) => abs.reverse(),
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
        }
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Int {
                #[inline]
                fn from(value: $ty) -> Self {
                    Int::from_magnitude(false, &value.to_be_bytes())
                }
            }
        )*
    };
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Int {
                #[inline]
                fn from(value: $ty) -> Self {
                    Int::from_magnitude(value < 0, &value.unsigned_abs().to_be_bytes())
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitive() {
        assert_eq!(Int::from(0u8).magnitude(), &[] as &[u8]);
        assert_eq!(Int::from(255u32).magnitude(), &[0xFF]);
        assert_eq!(Int::from(256i64).magnitude(), &[0x01, 0x00]);

        let min = Int::from(i64::MIN);
        assert!(min.is_negative());
        assert_eq!(min.magnitude(), &[0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(min.to_i64(), Some(i64::MIN));
        assert_eq!(Int::from(u64::MAX).to_i64(), None);
    }

    #[test]
    fn test_parse() {
        fn assert_parse(s: &str, expected: Int) {
            assert_eq!(s.parse::<Int>().unwrap(), expected);
        }

        assert_parse("0", Int::zero());
        assert_parse("-0", Int::zero());
        assert_parse("123", Int::from(123));
        assert_parse("-1_000", Int::from(-1000));
        assert_parse("0xFF", Int::from(255));
        assert_parse("-0X1_00", Int::from(-256));
        assert_parse("0b1010", Int::from(10));
        assert_parse("18446744073709551616", Int::from(u64::MAX as u128 + 1));

        assert_eq!("".parse::<Int>().unwrap_err(), IntParseError::Empty);
        assert_eq!("0x".parse::<Int>().unwrap_err(), IntParseError::Empty);
        assert_eq!("12a".parse::<Int>().unwrap_err(), IntParseError::InvalidDigit('a'));
        assert_eq!("0b2".parse::<Int>().unwrap_err(), IntParseError::InvalidDigit('2'));
        assert_eq!("1__0".parse::<Int>().unwrap_err(), IntParseError::MisplacedUnderscore);
        assert_eq!("_1".parse::<Int>().unwrap_err(), IntParseError::MisplacedUnderscore);
    }

    #[test]
    fn test_display() {
        assert_eq!(Int::zero().to_string(), "0");
        assert_eq!(Int::from(-42).to_string(), "-42");
        assert_eq!(Int::from(u128::MAX).to_string(), u128::MAX.to_string());
        assert_eq!(Int::from(i128::MIN).to_string(), i128::MIN.to_string());
    }

    #[test]
    fn test_ord() {
        assert!(Int::from(-2) < Int::from(-1));
        assert!(Int::from(-1) < Int::zero());
        assert!(Int::from(255) < Int::from(256));
    }
}
