//! Fixed-point codec.
//!
//! This module implements bit-exact conversion between signed integers and
//! their two's complement representation as strings of `'0'` and `'1'`
//! characters at an arbitrary bit width between 1 and 64 bits. This is the
//! format in which coefficients, input samples and output samples are
//! exchanged with the RTL simulation.
//!
//! # Examples
//! ```
//! use firmodel::codec::{decode, encode, BitWidth, OverflowPolicy};
//! # fn main() -> Result<(), firmodel::Error> {
//! let width = BitWidth::new(8)?;
//! let bits = encode(-3, width, OverflowPolicy::Reject)?;
//! assert_eq!(bits.as_str(), "11111101");
//! assert_eq!(decode("11111101", width)?, -3);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};

pub use firmodel_json::OverflowPolicy;

/// Bit width.
///
/// Number of bits used to represent a fixed-point value. Only widths between 1
/// and 64 bits are supported.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BitWidth(u32);

impl BitWidth {
    /// Maximum supported bit width.
    pub const MAX_BITS: u32 = 64;

    /// Creates a bit width.
    ///
    /// Returns [`Error::UnsupportedWidth`] if `bits` is zero or larger than
    /// [`BitWidth::MAX_BITS`].
    pub fn new(bits: u32) -> Result<BitWidth> {
        if !(1..=Self::MAX_BITS).contains(&bits) {
            return Err(Error::UnsupportedWidth(bits));
        }
        Ok(BitWidth(bits))
    }

    // Only used for compile-time constants known to be in range.
    pub(crate) const fn from_const(bits: u32) -> BitWidth {
        assert!(bits >= 1 && bits <= Self::MAX_BITS);
        BitWidth(bits)
    }

    /// Gives the number of bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Gives the minimum signed value representable with this width,
    /// `-2^(bits-1)`.
    pub fn min_value(self) -> i64 {
        i64::MIN >> (Self::MAX_BITS - self.0)
    }

    /// Gives the maximum signed value representable with this width,
    /// `2^(bits-1)-1`.
    pub fn max_value(self) -> i64 {
        i64::MAX >> (Self::MAX_BITS - self.0)
    }

    /// Returns `true` if `value` is in the signed range of this width.
    pub fn contains(self, value: i64) -> bool {
        (self.min_value()..=self.max_value()).contains(&value)
    }

    /// Wraps `value` modulo `2^bits` into the signed range of this width.
    ///
    /// This keeps the `bits` least significant bits and sign-extends them, as
    /// truncating a hardware register does.
    pub fn wrap(self, value: i64) -> i64 {
        let shift = Self::MAX_BITS - self.0;
        (value << shift) >> shift
    }

    /// Clamps `value` to the signed range of this width.
    pub fn saturate(self, value: i64) -> i64 {
        value.clamp(self.min_value(), self.max_value())
    }

    /// Gives the scale factor `2^(bits-1)` of a Q(bits-1) format.
    ///
    /// This is the scale that maps the real interval `[-1, 1)` onto the signed
    /// range of this width.
    pub fn scale(self) -> f64 {
        // bits <= 64, so the exponent always fits in an i32
        2.0f64.powi(self.0 as i32 - 1)
    }

    /// Applies an overflow policy to `value`.
    ///
    /// The result is guaranteed to be in the signed range of this width.
    pub fn fit(self, value: i64, policy: OverflowPolicy) -> Result<i64> {
        if self.contains(value) {
            return Ok(value);
        }
        match policy {
            OverflowPolicy::Wrap => {
                let wrapped = self.wrap(value);
                tracing::warn!(value, wrapped, width = self.0, "value wrapped around");
                Ok(wrapped)
            }
            OverflowPolicy::Saturate => Ok(self.saturate(value)),
            OverflowPolicy::Reject => Err(Error::Overflow {
                value,
                width: self.0,
            }),
        }
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = Error;

    fn try_from(bits: u32) -> Result<BitWidth> {
        BitWidth::new(bits)
    }
}

impl std::fmt::Display for BitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{} bits", self.0)
    }
}

/// Signed fixed-point value.
///
/// An integer together with the bit width it is represented with. The integer
/// is always within the signed range of the width. Values are immutable once
/// created.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SignedFixed {
    value: i64,
    width: BitWidth,
}

impl SignedFixed {
    /// Creates a signed fixed-point value.
    ///
    /// Returns [`Error::Overflow`] if `value` does not fit in `width`.
    pub fn new(value: i64, width: BitWidth) -> Result<SignedFixed> {
        SignedFixed::with_policy(value, width, OverflowPolicy::Reject)
    }

    /// Creates a signed fixed-point value, handling out of range values
    /// according to an overflow policy.
    pub fn with_policy(value: i64, width: BitWidth, policy: OverflowPolicy) -> Result<SignedFixed> {
        Ok(SignedFixed {
            value: width.fit(value, policy)?,
            width,
        })
    }

    /// Gives the integer value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Gives the bit width.
    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Gives the two's complement binary string of the value.
    pub fn to_binary(&self) -> BinaryString {
        let bits = (0..self.width.bits())
            .rev()
            .map(|k| if (self.value as u64 >> k) & 1 == 0 { '0' } else { '1' })
            .collect();
        BinaryString {
            bits,
            width: self.width,
        }
    }

    /// Creates a signed fixed-point value from its binary string.
    pub fn from_binary(bits: &BinaryString) -> SignedFixed {
        SignedFixed {
            value: bits.decode(),
            width: bits.width,
        }
    }
}

/// Binary string.
///
/// Two's complement representation of a [`SignedFixed`], most significant bit
/// first. The string has exactly as many characters as its bit width.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BinaryString {
    bits: String,
    width: BitWidth,
}

impl BinaryString {
    /// Parses a binary string with a given bit width.
    ///
    /// Strings shorter than `width` are zero-extended on the left. Returns
    /// [`Error::InvalidWidth`] if the string is longer than `width`,
    /// [`Error::EmptyString`] if it is empty, and [`Error::InvalidDigit`] if
    /// it contains characters other than `'0'` and `'1'`.
    pub fn parse(s: &str, width: BitWidth) -> Result<BinaryString> {
        if s.is_empty() {
            return Err(Error::EmptyString);
        }
        // s is ASCII once its characters are validated, so s.len() counts bits
        if let Some((position, character)) =
            s.chars().enumerate().find(|&(_, c)| c != '0' && c != '1')
        {
            return Err(Error::InvalidDigit {
                character,
                position,
            });
        }
        let width_bits = width.bits() as usize;
        if s.len() > width_bits {
            return Err(Error::InvalidWidth {
                length: s.len(),
                width: width.bits(),
            });
        }
        let mut bits = "0".repeat(width_bits - s.len());
        bits.push_str(s);
        Ok(BinaryString { bits, width })
    }

    /// Gives the string of `'0'` and `'1'` characters.
    pub fn as_str(&self) -> &str {
        &self.bits
    }

    /// Gives the bit width.
    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Decodes the string as a two's complement integer.
    pub fn decode(&self) -> i64 {
        let n = self
            .bits
            .bytes()
            .fold(0u64, |n, b| (n << 1) | u64::from(b == b'1'));
        let sign_bit = 1u64 << (self.width.bits() - 1);
        let magnitude = n & (sign_bit - 1);
        if n & sign_bit == 0 {
            magnitude as i64
        } else {
            // wrapping_sub handles the 64-bit case, where sign_bit as i64 is
            // i64::MIN
            (magnitude as i64).wrapping_sub(sign_bit as i64)
        }
    }
}

impl std::fmt::Display for BinaryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        f.write_str(&self.bits)
    }
}

impl AsRef<str> for BinaryString {
    fn as_ref(&self) -> &str {
        &self.bits
    }
}

/// Encodes an integer as a two's complement binary string of a given width.
///
/// Values outside of the signed range of `width` are handled according to
/// `policy`.
pub fn encode(value: i64, width: BitWidth, policy: OverflowPolicy) -> Result<BinaryString> {
    Ok(SignedFixed::with_policy(value, width, policy)?.to_binary())
}

/// Decodes a two's complement binary string of a given width.
///
/// Fails with [`Error::InvalidWidth`] if `bits` is longer than `width`.
pub fn decode(bits: &str, width: BitWidth) -> Result<i64> {
    Ok(BinaryString::parse(bits, width)?.decode())
}

#[cfg(test)]
mod test {
    use super::*;

    fn width(bits: u32) -> BitWidth {
        BitWidth::new(bits).unwrap()
    }

    #[test]
    fn decode_examples() {
        assert_eq!(decode("10000000", width(8)), Ok(-128));
        assert_eq!(decode("01111111", width(8)), Ok(127));
        assert_eq!(decode("00000000", width(8)), Ok(0));
        assert_eq!(decode("11111111", width(8)), Ok(-1));
        // short strings are zero-extended
        assert_eq!(decode("101", width(8)), Ok(5));
    }

    #[test]
    fn decode_too_long() {
        assert_eq!(
            decode("101", width(2)),
            Err(Error::InvalidWidth {
                length: 3,
                width: 2
            })
        );
    }

    #[test]
    fn decode_malformed() {
        assert_eq!(decode("", width(8)), Err(Error::EmptyString));
        assert_eq!(
            decode("01x1", width(8)),
            Err(Error::InvalidDigit {
                character: 'x',
                position: 2
            })
        );
    }

    #[test]
    fn decode_64_bits() {
        let min = format!("1{}", "0".repeat(63));
        let max = format!("0{}", "1".repeat(63));
        assert_eq!(decode(&min, width(64)), Ok(i64::MIN));
        assert_eq!(decode(&max, width(64)), Ok(i64::MAX));
        assert_eq!(decode(&"1".repeat(64), width(64)), Ok(-1));
    }

    #[test]
    fn round_trip() {
        for bits in 1..=12 {
            let w = width(bits);
            for v in w.min_value()..=w.max_value() {
                let encoded = encode(v, w, OverflowPolicy::Reject).unwrap();
                assert_eq!(encoded.as_str().len(), bits as usize);
                assert_eq!(decode(encoded.as_str(), w), Ok(v));
            }
        }
        let w = width(64);
        for v in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX - 1, i64::MAX] {
            let encoded = encode(v, w, OverflowPolicy::Reject).unwrap();
            assert_eq!(decode(encoded.as_str(), w), Ok(v));
        }
    }

    #[test]
    fn width_range() {
        assert_eq!(BitWidth::new(0), Err(Error::UnsupportedWidth(0)));
        assert_eq!(BitWidth::new(65), Err(Error::UnsupportedWidth(65)));
        assert_eq!(width(1).min_value(), -1);
        assert_eq!(width(1).max_value(), 0);
        assert_eq!(width(8).min_value(), -128);
        assert_eq!(width(8).max_value(), 127);
        assert_eq!(width(64).min_value(), i64::MIN);
        assert_eq!(width(64).max_value(), i64::MAX);
        assert_eq!(width(8).scale(), 128.0);
    }

    #[test]
    fn encode_overflow() {
        let w = width(8);
        assert_eq!(
            encode(128, w, OverflowPolicy::Wrap).unwrap().as_str(),
            "10000000"
        );
        assert_eq!(
            encode(300, w, OverflowPolicy::Wrap).unwrap().as_str(),
            "00101100"
        );
        assert_eq!(
            encode(-129, w, OverflowPolicy::Wrap).unwrap().as_str(),
            "01111111"
        );
        assert_eq!(
            encode(128, w, OverflowPolicy::Saturate).unwrap().as_str(),
            "01111111"
        );
        assert_eq!(
            encode(-1000, w, OverflowPolicy::Saturate).unwrap().as_str(),
            "10000000"
        );
        assert_eq!(
            encode(128, w, OverflowPolicy::Reject),
            Err(Error::Overflow {
                value: 128,
                width: 8
            })
        );
    }

    #[test]
    fn signed_fixed_binary() {
        let x = SignedFixed::new(-5, width(4)).unwrap();
        let bits = x.to_binary();
        assert_eq!(bits.to_string(), "1011");
        assert_eq!(SignedFixed::from_binary(&bits), x);
        let parsed = BinaryString::parse("11", width(4)).unwrap();
        assert_eq!(parsed.as_str(), "0011");
        assert_eq!(SignedFixed::from_binary(&parsed).value(), 3);
    }
}
