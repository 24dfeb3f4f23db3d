//! Arbitrary-precision integer and decimal serializers.

use core::fmt;

use num::BigInt;

use super::{
    Serializer,
    primitive::{BigEndian, I32Serializer, read_length_prefixed, write_length_prefixed},
};
use crate::{ByteBuf, CodecError};

// BIG INTEGER
// ================================================================================================

/// Serializer for arbitrary-precision integers.
///
/// The value is written as its minimal two's-complement big-endian byte
/// representation behind the standard 4-byte length prefix, so sign and
/// magnitude round-trip exactly at any precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BigIntSerializer;

impl BigIntSerializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<BigInt> for BigIntSerializer {
    fn encode(&self, value: &BigInt, target: &mut ByteBuf) -> Result<(), CodecError> {
        write_length_prefixed(&value.to_signed_bytes_be(), target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<BigInt, CodecError> {
        Ok(BigInt::from_signed_bytes_be(read_length_prefixed(source)?))
    }
}

// DECIMAL
// ================================================================================================

/// An arbitrary-precision decimal: an unscaled integer and a base-10 scale,
/// representing `unscaled * 10^-scale`.
///
/// Equality compares both parts, so `1.0` (unscaled 10, scale 1) and `1.00`
/// (unscaled 100, scale 2) are distinct values — mirroring their distinct
/// byte encodings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    unscaled: BigInt,
    scale: i32,
}

impl Decimal {
    /// Creates a decimal representing `unscaled * 10^-scale`.
    pub const fn new(unscaled: BigInt, scale: i32) -> Self {
        Self { unscaled, scale }
    }

    /// Returns the unscaled integer part.
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Returns the base-10 scale.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Splits the decimal into its unscaled integer and scale.
    pub fn into_parts(self) -> (BigInt, i32) {
        (self.unscaled, self.scale)
    }
}

impl From<BigInt> for Decimal {
    fn from(unscaled: BigInt) -> Self {
        Self::new(unscaled, 0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.unscaled.to_str_radix(10);
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", s.as_str()),
        };
        if self.scale <= 0 {
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            write!(f, "{sign}{digits}{zeros}")
        } else {
            let scale = self.scale as usize;
            if digits.len() > scale {
                let (int_part, frac_part) = digits.split_at(digits.len() - scale);
                write!(f, "{sign}{int_part}.{frac_part}")
            } else {
                let zeros = "0".repeat(scale - digits.len());
                write!(f, "{sign}0.{zeros}{digits}")
            }
        }
    }
}

/// Serializer for [Decimal] values: the unscaled integer in the
/// [BigIntSerializer] layout, followed by a 4-byte big-endian signed scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecimalSerializer;

impl DecimalSerializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<Decimal> for DecimalSerializer {
    fn encode(&self, value: &Decimal, target: &mut ByteBuf) -> Result<(), CodecError> {
        BigIntSerializer.encode(&value.unscaled, target)?;
        I32Serializer::<BigEndian>::new().encode(&value.scale, target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<Decimal, CodecError> {
        let unscaled = BigIntSerializer.decode(source)?;
        let scale = I32Serializer::<BigEndian>::new().decode(source)?;
        Ok(Decimal::new(unscaled, scale))
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn big_int_round_trip() {
        let ser = BigIntSerializer::new();
        for value in [
            BigInt::from(0),
            BigInt::from(-1),
            BigInt::from(127),
            BigInt::from(128),
            BigInt::from(-128),
            BigInt::from(-129),
            BigInt::from(i64::MAX) * BigInt::from(i64::MAX),
            -(BigInt::from(10).pow(50)),
        ] {
            let bytes = ser.encode_to_vec(&value).unwrap();
            assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn big_int_known_vector() {
        let ser = BigIntSerializer::new();
        let value =
            BigInt::parse_bytes(b"1234567890123456789012345678901234567890", 10).unwrap();
        let bytes = ser.encode_to_vec(&value).unwrap();
        assert_eq!(hex::encode(&bytes), "0000001103a0c92075c0dbf3b8acbc5f96ce3f0ad2");
        assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
    }

    #[test]
    fn big_int_layout_is_minimal_twos_complement() {
        let ser = BigIntSerializer::new();
        // 255 needs a leading zero byte to stay positive
        assert_eq!(ser.encode_to_vec(&BigInt::from(255)).unwrap(), [0, 0, 0, 2, 0x00, 0xFF]);
        assert_eq!(ser.encode_to_vec(&BigInt::from(-1)).unwrap(), [0, 0, 0, 1, 0xFF]);
    }

    #[test]
    fn decimal_round_trip() {
        let ser = DecimalSerializer::new();
        for (unscaled, scale) in
            [(12345i64, 2), (-12345, 2), (0, 0), (1, -3), (i64::MAX, i32::MAX), (7, i32::MIN)]
        {
            let value = Decimal::new(BigInt::from(unscaled), scale);
            let bytes = ser.encode_to_vec(&value).unwrap();
            assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn decimal_layout() {
        let ser = DecimalSerializer::new();
        let value = Decimal::new(BigInt::from(0x0102), 3);
        let bytes = ser.encode_to_vec(&value).unwrap();
        assert_eq!(bytes, [0, 0, 0, 2, 0x01, 0x02, 0, 0, 0, 3]);
    }

    #[test]
    fn decimal_underflow() {
        let ser = DecimalSerializer::new();
        // big integer part present, scale truncated
        assert_matches!(
            ser.decode_from_slice(&[0, 0, 0, 1, 0x05, 0, 0]),
            Err(CodecError::InsufficientData { .. })
        );
    }

    #[test]
    fn decimal_display() {
        assert_eq!(Decimal::new(BigInt::from(12345), 2).to_string(), "123.45");
        assert_eq!(Decimal::new(BigInt::from(-12345), 2).to_string(), "-123.45");
        assert_eq!(Decimal::new(BigInt::from(5), 3).to_string(), "0.005");
        assert_eq!(Decimal::new(BigInt::from(7), -2).to_string(), "700");
        assert_eq!(Decimal::new(BigInt::from(0), 0).to_string(), "0");
    }
}
