//! Fixed-width and UTF-8 primitive serializers.
//!
//! All multi-byte numeric serializers come in big-endian and little-endian
//! variants, selected by the [ByteOrder] type parameter. Length-prefixed
//! byte arrays and strings use a 4-byte big-endian signed length; generic
//! combinators accept a caller-chosen [SizeSerializer](super::SizeSerializer)
//! instead.

use alloc::{format, string::String, vec::Vec};
use core::marker::PhantomData;

use super::{Serializer, SizeSerializer};
use crate::{ByteBuf, CodecError};

// BYTE ORDER
// ================================================================================================

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::BigEndian {}
    impl Sealed for super::LittleEndian {}
}

/// Byte order of a multi-byte numeric serializer.
///
/// Implemented only by [BigEndian] and [LittleEndian].
pub trait ByteOrder: sealed::Sealed + Clone + Copy + Default + core::fmt::Debug + 'static {
    fn u16_to_bytes(v: u16) -> [u8; 2];
    fn u16_from_bytes(b: [u8; 2]) -> u16;
    fn u32_to_bytes(v: u32) -> [u8; 4];
    fn u32_from_bytes(b: [u8; 4]) -> u32;
    fn u64_to_bytes(v: u64) -> [u8; 8];
    fn u64_from_bytes(b: [u8; 8]) -> u64;
    /// Converts the low 24 bits of the value to its 3-byte representation.
    fn u24_to_bytes(v: u32) -> [u8; 3];
    fn u24_from_bytes(b: [u8; 3]) -> u32;
}

/// Most significant byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BigEndian;

/// Least significant byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LittleEndian;

impl ByteOrder for BigEndian {
    fn u16_to_bytes(v: u16) -> [u8; 2] {
        v.to_be_bytes()
    }

    fn u16_from_bytes(b: [u8; 2]) -> u16 {
        u16::from_be_bytes(b)
    }

    fn u32_to_bytes(v: u32) -> [u8; 4] {
        v.to_be_bytes()
    }

    fn u32_from_bytes(b: [u8; 4]) -> u32 {
        u32::from_be_bytes(b)
    }

    fn u64_to_bytes(v: u64) -> [u8; 8] {
        v.to_be_bytes()
    }

    fn u64_from_bytes(b: [u8; 8]) -> u64 {
        u64::from_be_bytes(b)
    }

    fn u24_to_bytes(v: u32) -> [u8; 3] {
        let b = v.to_be_bytes();
        [b[1], b[2], b[3]]
    }

    fn u24_from_bytes(b: [u8; 3]) -> u32 {
        u32::from_be_bytes([0, b[0], b[1], b[2]])
    }
}

impl ByteOrder for LittleEndian {
    fn u16_to_bytes(v: u16) -> [u8; 2] {
        v.to_le_bytes()
    }

    fn u16_from_bytes(b: [u8; 2]) -> u16 {
        u16::from_le_bytes(b)
    }

    fn u32_to_bytes(v: u32) -> [u8; 4] {
        v.to_le_bytes()
    }

    fn u32_from_bytes(b: [u8; 4]) -> u32 {
        u32::from_le_bytes(b)
    }

    fn u64_to_bytes(v: u64) -> [u8; 8] {
        v.to_le_bytes()
    }

    fn u64_from_bytes(b: [u8; 8]) -> u64 {
        u64::from_le_bytes(b)
    }

    fn u24_to_bytes(v: u32) -> [u8; 3] {
        let b = v.to_le_bytes();
        [b[0], b[1], b[2]]
    }

    fn u24_from_bytes(b: [u8; 3]) -> u32 {
        u32::from_le_bytes([b[0], b[1], b[2], 0])
    }
}

// BOOLEAN AND SINGLE-BYTE SERIALIZERS
// ================================================================================================

/// Serializer for booleans: one byte, `0x00` for false and `0x01` for true.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoolSerializer;

impl BoolSerializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<bool> for BoolSerializer {
    fn encode(&self, value: &bool, target: &mut ByteBuf) -> Result<(), CodecError> {
        target.write_u8(u8::from(*value))
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<bool, CodecError> {
        let byte = source.read_u8()?;
        match byte {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(CodecError::InvalidValue(format!("{byte} is not a boolean value"))),
        }
    }
}

/// Serializer for signed single bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct I8Serializer;

impl I8Serializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<i8> for I8Serializer {
    fn encode(&self, value: &i8, target: &mut ByteBuf) -> Result<(), CodecError> {
        target.write_u8(*value as u8)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<i8, CodecError> {
        Ok(source.read_u8()? as i8)
    }
}

/// Serializer for unsigned single bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct U8Serializer;

impl U8Serializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<u8> for U8Serializer {
    fn encode(&self, value: &u8, target: &mut ByteBuf) -> Result<(), CodecError> {
        target.write_u8(*value)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<u8, CodecError> {
        source.read_u8()
    }
}

// MULTI-BYTE NUMERIC SERIALIZERS
// ================================================================================================

macro_rules! int_serializer {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $repr:ty, $to:ident, $from:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name<E: ByteOrder = BigEndian>(PhantomData<E>);

        impl<E: ByteOrder> $name<E> {
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<E: ByteOrder> Serializer<$ty> for $name<E> {
            fn encode(&self, value: &$ty, target: &mut ByteBuf) -> Result<(), CodecError> {
                target.write_bytes(&E::$to(*value as $repr))
            }

            fn decode(&self, source: &mut ByteBuf) -> Result<$ty, CodecError> {
                Ok(E::$from(source.read_array()?) as $ty)
            }
        }
    };
}

int_serializer!(
    /// Serializer for 16-bit signed integers.
    I16Serializer, i16, u16, u16_to_bytes, u16_from_bytes
);
int_serializer!(
    /// Serializer for 16-bit unsigned integers.
    U16Serializer, u16, u16, u16_to_bytes, u16_from_bytes
);
int_serializer!(
    /// Serializer for 32-bit signed integers.
    I32Serializer, i32, u32, u32_to_bytes, u32_from_bytes
);
int_serializer!(
    /// Serializer for 32-bit unsigned integers.
    U32Serializer, u32, u32, u32_to_bytes, u32_from_bytes
);
int_serializer!(
    /// Serializer for 64-bit signed integers.
    I64Serializer, i64, u64, u64_to_bytes, u64_from_bytes
);
int_serializer!(
    /// Serializer for 64-bit unsigned integers.
    U64Serializer, u64, u64, u64_to_bytes, u64_from_bytes
);

/// Serializer for 24-bit signed integers, carried in an `i32`.
///
/// Only values in `-8_388_608..=8_388_607` are representable; encoding
/// anything outside that range fails with
/// [CodecError::InvalidValue]. Decoding sign-extends the third byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct I24Serializer<E: ByteOrder = BigEndian>(PhantomData<E>);

/// Smallest value representable in 24 bits.
pub const I24_MIN: i32 = -(1 << 23);
/// Largest value representable in 24 bits.
pub const I24_MAX: i32 = (1 << 23) - 1;

impl<E: ByteOrder> I24Serializer<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: ByteOrder> Serializer<i32> for I24Serializer<E> {
    fn encode(&self, value: &i32, target: &mut ByteBuf) -> Result<(), CodecError> {
        if !(I24_MIN..=I24_MAX).contains(value) {
            return Err(CodecError::InvalidValue(format!(
                "{value} does not fit a 24-bit signed integer"
            )));
        }
        target.write_bytes(&E::u24_to_bytes(*value as u32))
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<i32, CodecError> {
        let raw = E::u24_from_bytes(source.read_array()?);
        // shift into the top of the word, then arithmetic-shift back down to
        // sign-extend bit 23
        Ok(((raw << 8) as i32) >> 8)
    }
}

macro_rules! float_serializer {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $to:ident, $from:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name<E: ByteOrder = BigEndian>(PhantomData<E>);

        impl<E: ByteOrder> $name<E> {
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<E: ByteOrder> Serializer<$ty> for $name<E> {
            fn encode(&self, value: &$ty, target: &mut ByteBuf) -> Result<(), CodecError> {
                target.write_bytes(&E::$to(value.to_bits()))
            }

            fn decode(&self, source: &mut ByteBuf) -> Result<$ty, CodecError> {
                Ok(<$ty>::from_bits(E::$from(source.read_array()?)))
            }
        }
    };
}

float_serializer!(
    /// Serializer for IEEE 754 single-precision floats.
    F32Serializer, f32, u32_to_bytes, u32_from_bytes
);
float_serializer!(
    /// Serializer for IEEE 754 double-precision floats.
    F64Serializer, f64, u64_to_bytes, u64_from_bytes
);

/// Serializer for Unicode characters as their 32-bit scalar value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CharSerializer<E: ByteOrder = BigEndian>(PhantomData<E>);

impl<E: ByteOrder> CharSerializer<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: ByteOrder> Serializer<char> for CharSerializer<E> {
    fn encode(&self, value: &char, target: &mut ByteBuf) -> Result<(), CodecError> {
        target.write_bytes(&E::u32_to_bytes(*value as u32))
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<char, CodecError> {
        let scalar = E::u32_from_bytes(source.read_array()?);
        char::from_u32(scalar).ok_or_else(|| {
            CodecError::InvalidValue(format!("{scalar:#x} is not a unicode scalar value"))
        })
    }
}

// LENGTH-PREFIXED BYTE SERIALIZERS
// ================================================================================================

/// Writes a 4-byte big-endian signed length followed by the bytes.
pub(in crate::ser) fn write_length_prefixed(
    bytes: &[u8],
    target: &mut ByteBuf,
) -> Result<(), CodecError> {
    let len: i32 = bytes.len().try_into().map_err(|_| {
        CodecError::InvalidValue(format!(
            "{} bytes exceed the 32-bit length prefix",
            bytes.len()
        ))
    })?;
    target.write_bytes(&len.to_be_bytes())?;
    target.write_bytes(bytes)
}

/// Reads a 4-byte big-endian signed length, then exactly that many bytes.
pub(in crate::ser) fn read_length_prefixed(source: &mut ByteBuf) -> Result<&[u8], CodecError> {
    let len = i32::from_be_bytes(source.read_array()?);
    let len = usize::try_from(len)
        .map_err(|_| CodecError::InvalidValue(format!("negative length prefix {len}")))?;
    source.read_bytes(len)
}

/// Serializer for raw byte arrays: a 4-byte big-endian length followed by
/// the bytes.
///
/// This is the layout the big-integer serializer and the default string
/// serializer build on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByteArraySerializer;

impl ByteArraySerializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<Vec<u8>> for ByteArraySerializer {
    fn encode(&self, value: &Vec<u8>, target: &mut ByteBuf) -> Result<(), CodecError> {
        write_length_prefixed(value, target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<Vec<u8>, CodecError> {
        Ok(read_length_prefixed(source)?.to_vec())
    }
}

/// Serializer for strings: a 4-byte big-endian length (the UTF-8 *byte*
/// count, not the character count) followed by the UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringSerializer;

impl StringSerializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<String> for StringSerializer {
    fn encode(&self, value: &String, target: &mut ByteBuf) -> Result<(), CodecError> {
        write_length_prefixed(value.as_bytes(), target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<String, CodecError> {
        let bytes = read_length_prefixed(source)?.to_vec();
        String::from_utf8(bytes)
            .map_err(|e| CodecError::InvalidValue(format!("invalid utf-8 string: {e}")))
    }
}

/// Serializer for strings with no length prefix.
///
/// `encode` writes the UTF-8 bytes as-is; `decode` consumes the *entire
/// remaining readable region*. This is only sound when the string is the
/// outermost or sole occupant of a frame — wrap the serializer in
/// [Framed](super::Framed) if any data follows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Utf8Serializer;

impl Utf8Serializer {
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer<String> for Utf8Serializer {
    fn encode(&self, value: &String, target: &mut ByteBuf) -> Result<(), CodecError> {
        target.write_bytes(value.as_bytes())
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<String, CodecError> {
        let len = source.remaining();
        let bytes = source.read_bytes(len)?.to_vec();
        String::from_utf8(bytes)
            .map_err(|e| CodecError::InvalidValue(format!("invalid utf-8 string: {e}")))
    }
}

// SIZE SERIALIZER IMPLEMENTATIONS
// ================================================================================================

macro_rules! size_serializer {
    ($($name:ident => $ty:ty),* $(,)?) => {$(
        impl<E: ByteOrder> SizeSerializer for $name<E> {
            fn encode_size(&self, size: usize, target: &mut ByteBuf) -> Result<(), CodecError> {
                let value: $ty = size.try_into().map_err(|_| {
                    CodecError::InvalidValue(format!(
                        "size {size} does not fit a {}-bit count field",
                        <$ty>::BITS
                    ))
                })?;
                self.encode(&value, target)
            }

            fn decode_size(&self, source: &mut ByteBuf) -> Result<usize, CodecError> {
                let value = self.decode(source)?;
                usize::try_from(value).map_err(|_| {
                    CodecError::InvalidValue(format!("decoded count {value} is not a valid size"))
                })
            }
        }
    )*};
}

size_serializer!(
    I16Serializer => i16,
    U16Serializer => u16,
    I32Serializer => i32,
    U32Serializer => u32,
    I64Serializer => i64,
    U64Serializer => u64,
);

impl SizeSerializer for U8Serializer {
    fn encode_size(&self, size: usize, target: &mut ByteBuf) -> Result<(), CodecError> {
        let value: u8 = size.try_into().map_err(|_| {
            CodecError::InvalidValue(format!("size {size} does not fit an 8-bit count field"))
        })?;
        self.encode(&value, target)
    }

    fn decode_size(&self, source: &mut ByteBuf) -> Result<usize, CodecError> {
        Ok(usize::from(self.decode(source)?))
    }
}

impl SizeSerializer for I8Serializer {
    fn encode_size(&self, size: usize, target: &mut ByteBuf) -> Result<(), CodecError> {
        let value: i8 = size.try_into().map_err(|_| {
            CodecError::InvalidValue(format!("size {size} does not fit an 8-bit count field"))
        })?;
        self.encode(&value, target)
    }

    fn decode_size(&self, source: &mut ByteBuf) -> Result<usize, CodecError> {
        let value = self.decode(source)?;
        usize::try_from(value).map_err(|_| {
            CodecError::InvalidValue(format!("decoded count {value} is not a valid size"))
        })
    }
}

// TESTS
// ================================================================================================
