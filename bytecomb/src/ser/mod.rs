//! The serializer algebra: a trait pairing encode and decode, primitive
//! implementations, and generic combinators that compose them.
//!
//! A [Serializer] is an immutable, stateless value that can be shared freely
//! across threads and reused across calls; all mutable state for one encode
//! or decode call lives in the caller-supplied [ByteBuf]. Combinators build
//! new serializers by wrapping existing ones, so composition forms a tree of
//! plain values with no registry and no code generation.
//!
//! # Laws
//!
//! Every serializer must satisfy two laws:
//!
//! - **Round-trip**: for any value `v` accepted by `encode`, encoding `v` and
//!   then decoding from the same starting position yields a value equal to
//!   `v`.
//! - **Self-delimiting**: `decode` consumes exactly the number of bytes the
//!   corresponding `encode` produced. The only exception is [Utf8Serializer],
//!   which deliberately consumes the entire remaining readable region and is
//!   documented accordingly.

use alloc::{boxed::Box, vec::Vec};

use crate::{ByteBuf, CodecError};

mod combinator;
#[cfg(feature = "std")]
mod encrypted;
mod numeric;
mod primitive;
mod temporal;


pub use combinator::{
    Bimap, Framed, ListSerializer, MapSerializer, Nullable, SetSerializer,
};
#[cfg(feature = "std")]
pub use encrypted::Encrypted;
pub use numeric::{BigIntSerializer, Decimal, DecimalSerializer};
pub use primitive::{
    BigEndian, BoolSerializer, ByteArraySerializer, ByteOrder, CharSerializer, F32Serializer,
    F64Serializer, I8Serializer, I16Serializer, I24_MAX, I24_MIN, I24Serializer, I32Serializer,
    I64Serializer, LittleEndian, StringSerializer, U8Serializer, U16Serializer, U32Serializer,
    U64Serializer, Utf8Serializer,
};
pub use temporal::{DateSerializer, DateTimeSerializer, InstantSerializer};

// SERIALIZER TRAIT
// ================================================================================================

/// A paired encode/decode capability for values of type `T`.
pub trait Serializer<T> {
    /// Encodes the provided value at the target buffer's write cursor,
    /// advancing the cursor past the written bytes.
    ///
    /// # Errors
    /// Returns a [CodecError] if the value cannot be represented or the
    /// target cannot hold it; the target's cursor state is unspecified after
    /// a failure.
    fn encode(&self, value: &T, target: &mut ByteBuf) -> Result<(), CodecError>;

    /// Decodes a value from the source buffer's read cursor, advancing the
    /// cursor past the consumed bytes.
    ///
    /// # Errors
    /// Returns a [CodecError] if the readable bytes do not contain a valid
    /// encoding.
    fn decode(&self, source: &mut ByteBuf) -> Result<T, CodecError>;

    /// Encodes the provided value into a freshly allocated byte vector.
    fn encode_to_vec(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let mut target = ByteBuf::new();
        self.encode(value, &mut target)?;
        Ok(target.into_vec())
    }

    /// Decodes a value from the provided bytes.
    ///
    /// Note: if `bytes` contains more data than one encoded value, the
    /// excess is ignored.
    fn decode_from_slice(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let mut source = ByteBuf::from(bytes);
        self.decode(&mut source)
    }
}

impl<T, S: Serializer<T> + ?Sized> Serializer<T> for &S {
    fn encode(&self, value: &T, target: &mut ByteBuf) -> Result<(), CodecError> {
        (**self).encode(value, target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<T, CodecError> {
        (**self).decode(source)
    }
}

impl<T, S: Serializer<T> + ?Sized> Serializer<T> for Box<S> {
    fn encode(&self, value: &T, target: &mut ByteBuf) -> Result<(), CodecError> {
        (**self).encode(value, target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<T, CodecError> {
        (**self).decode(source)
    }
}

// SIZE SERIALIZER TRAIT
// ================================================================================================

/// A serializer usable as the count or length field of a generic combinator.
///
/// Implemented by every fixed-width integer serializer, so callers can pick
/// 1, 2, 4, or 8-byte counts (in either endianness) for [ListSerializer],
/// [SetSerializer], [MapSerializer], and [Framed]. A size serializer must
/// encode every value it accepts in a fixed number of bytes; [Framed] relies
/// on this to backpatch a placeholder without shifting the payload.
pub trait SizeSerializer {
    /// Encodes a size at the target buffer's write cursor.
    ///
    /// # Errors
    /// Returns [CodecError::InvalidValue] if the size does not fit the
    /// underlying integer width.
    fn encode_size(&self, size: usize, target: &mut ByteBuf) -> Result<(), CodecError>;

    /// Decodes a size from the source buffer's read cursor.
    ///
    /// # Errors
    /// Returns [CodecError::InvalidValue] if the decoded count is negative
    /// or does not fit in `usize`.
    fn decode_size(&self, source: &mut ByteBuf) -> Result<usize, CodecError>;
}

impl<N: SizeSerializer + ?Sized> SizeSerializer for &N {
    fn encode_size(&self, size: usize, target: &mut ByteBuf) -> Result<(), CodecError> {
        (**self).encode_size(size, target)
    }

    fn decode_size(&self, source: &mut ByteBuf) -> Result<usize, CodecError> {
        (**self).decode_size(source)
    }
}
