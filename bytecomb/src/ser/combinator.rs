//! Generic combinators: value transformation, optionality, counted
//! collections, and length-prefixed framing.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

use super::{BoolSerializer, Serializer, SizeSerializer};
use crate::{ByteBuf, CodecError};

// BIMAP
// ================================================================================================

/// Transforms a serializer for `T` into a serializer for `V` via a pair of
/// conversion functions, introducing no additional bytes.
///
/// `encode` applies `enc` and delegates to the inner serializer; `decode`
/// delegates and then applies `dec`. Both conversions are fallible so that
/// derived serializers can reject values outside their domain (e.g. an
/// out-of-range timestamp); total conversions simply return `Ok`.
#[derive(Clone, Copy, Debug)]
pub struct Bimap<S, E, D> {
    inner: S,
    enc: E,
    dec: D,
}

impl<S, E, D> Bimap<S, E, D> {
    pub const fn new(inner: S, enc: E, dec: D) -> Self {
        Self { inner, enc, dec }
    }
}

impl<T, V, S, E, D> Serializer<V> for Bimap<S, E, D>
where
    S: Serializer<T>,
    E: Fn(&V) -> Result<T, CodecError>,
    D: Fn(T) -> Result<V, CodecError>,
{
    fn encode(&self, value: &V, target: &mut ByteBuf) -> Result<(), CodecError> {
        self.inner.encode(&(self.enc)(value)?, target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<V, CodecError> {
        (self.dec)(self.inner.decode(source)?)
    }
}

// NULLABLE
// ================================================================================================

/// Serializer for optional values: a single presence byte, followed by the
/// inner encoding when the value is present.
///
/// `None` encodes as `[0x00]` and nothing else; `Some(v)` encodes as `0x01`
/// followed by the inner encoding of `v`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nullable<S> {
    inner: S,
}

impl<S> Nullable<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<T, S: Serializer<T>> Serializer<Option<T>> for Nullable<S> {
    fn encode(&self, value: &Option<T>, target: &mut ByteBuf) -> Result<(), CodecError> {
        match value {
            Some(v) => {
                BoolSerializer.encode(&true, target)?;
                self.inner.encode(v, target)
            },
            None => BoolSerializer.encode(&false, target),
        }
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<Option<T>, CodecError> {
        if BoolSerializer.decode(source)? {
            Ok(Some(self.inner.decode(source)?))
        } else {
            Ok(None)
        }
    }
}

// FRAMED
// ================================================================================================

/// Makes an inner serializer's output self-delimiting by prefixing it with
/// its byte length, written via a caller-chosen size serializer.
///
/// On encode, the size field is reserved with a placeholder, the payload is
/// encoded after it, and the placeholder is then overwritten in place with
/// the measured payload length (the size serializer must therefore encode
/// every size in a fixed number of bytes, which all of this crate's integer
/// serializers do).
///
/// On decode, the payload length is read, the inner serializer runs against
/// a view bounded to exactly that many bytes, and the read cursor then lands
/// at the end of the frame regardless of how many bytes the inner decoder
/// consumed — an inner decoder that under-reads cannot shift the frames that
/// follow.
#[derive(Clone, Copy, Debug, Default)]
pub struct Framed<N, S> {
    size: N,
    inner: S,
}

impl<N, S> Framed<N, S> {
    pub const fn new(size: N, inner: S) -> Self {
        Self { size, inner }
    }
}

impl<T, N: SizeSerializer, S: Serializer<T>> Serializer<T> for Framed<N, S> {
    fn encode(&self, value: &T, target: &mut ByteBuf) -> Result<(), CodecError> {
        let size_at = target.write_pos();
        self.size.encode_size(0, target)?;
        let payload_at = target.write_pos();

        self.inner.encode(value, target)?;
        let end = target.write_pos();

        target.set_write_pos(size_at)?;
        self.size.encode_size(end - payload_at, target)?;
        target.set_write_pos(end)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<T, CodecError> {
        let len = self.size.decode_size(source)?;
        source.with_read_limit(len, |bounded| self.inner.decode(bounded))
    }
}

// COLLECTIONS
// ================================================================================================

/// Serializer for vectors: an element count written via the size
/// serializer, followed by each element in order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListSerializer<N, S> {
    size: N,
    item: S,
}

impl<N, S> ListSerializer<N, S> {
    pub const fn new(size: N, item: S) -> Self {
        Self { size, item }
    }
}

impl<T, N: SizeSerializer, S: Serializer<T>> Serializer<Vec<T>> for ListSerializer<N, S> {
    fn encode(&self, value: &Vec<T>, target: &mut ByteBuf) -> Result<(), CodecError> {
        self.size.encode_size(value.len(), target)?;
        for item in value {
            self.item.encode(item, target)?;
        }
        Ok(())
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<Vec<T>, CodecError> {
        let count = self.size.decode_size(source)?;
        // cap the pre-allocation by the readable bytes so a malicious count
        // cannot trigger a huge up-front allocation
        let mut result = Vec::with_capacity(count.min(source.remaining()));
        for _ in 0..count {
            result.push(self.item.decode(source)?);
        }
        Ok(result)
    }
}

/// Serializer for sets: an element count, followed by each element in the
/// set's iteration order (sorted, for the B-tree sets this serializer
/// produces).
///
/// Decoding validates that the declared count equals the decoded
/// cardinality: a byte stream whose elements collapse into fewer distinct
/// entries fails with [CodecError::DuplicateEntry] instead of silently
/// shrinking the set.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetSerializer<N, S> {
    size: N,
    item: S,
}

impl<N, S> SetSerializer<N, S> {
    pub const fn new(size: N, item: S) -> Self {
        Self { size, item }
    }
}

impl<T, N, S> Serializer<BTreeSet<T>> for SetSerializer<N, S>
where
    T: Ord,
    N: SizeSerializer,
    S: Serializer<T>,
{
    fn encode(&self, value: &BTreeSet<T>, target: &mut ByteBuf) -> Result<(), CodecError> {
        self.size.encode_size(value.len(), target)?;
        for item in value {
            self.item.encode(item, target)?;
        }
        Ok(())
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<BTreeSet<T>, CodecError> {
        let count = self.size.decode_size(source)?;
        let mut result = BTreeSet::new();
        for index in 0..count {
            if !result.insert(self.item.decode(source)?) {
                return Err(CodecError::DuplicateEntry { declared: count, index });
            }
        }
        Ok(result)
    }
}

/// Serializer for maps: an entry count, followed by each key and then its
/// value, in the map's iteration order (sorted by key for the B-tree maps
/// this serializer produces).
///
/// Decoding applies the same cardinality validation as [SetSerializer]:
/// a duplicate key in the byte stream is [CodecError::DuplicateEntry].
#[derive(Clone, Copy, Debug, Default)]
pub struct MapSerializer<N, K, V> {
    size: N,
    key: K,
    value: V,
}

impl<N, K, V> MapSerializer<N, K, V> {
    pub const fn new(size: N, key: K, value: V) -> Self {
        Self { size, key, value }
    }
}

impl<K, V, N, KS, VS> Serializer<BTreeMap<K, V>> for MapSerializer<N, KS, VS>
where
    K: Ord,
    N: SizeSerializer,
    KS: Serializer<K>,
    VS: Serializer<V>,
{
    fn encode(&self, value: &BTreeMap<K, V>, target: &mut ByteBuf) -> Result<(), CodecError> {
        self.size.encode_size(value.len(), target)?;
        for (k, v) in value {
            self.key.encode(k, target)?;
            self.value.encode(v, target)?;
        }
        Ok(())
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<BTreeMap<K, V>, CodecError> {
        let count = self.size.decode_size(source)?;
        let mut result = BTreeMap::new();
        for index in 0..count {
            let k = self.key.decode(source)?;
            let v = self.value.decode(source)?;
            if result.insert(k, v).is_some() {
                return Err(CodecError::DuplicateEntry { declared: count, index });
            }
        }
        Ok(result)
    }
}

// TESTS
// ================================================================================================
