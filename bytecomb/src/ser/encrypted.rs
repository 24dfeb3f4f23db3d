//! Transparent encryption combinator.

use alloc::sync::Arc;

use super::Serializer;
use crate::{
    ByteBuf, CodecError,
    cipher::Cipher,
    pool::Pool,
};

// ENCRYPTED
// ================================================================================================

/// Wraps an inner serializer's plaintext bytes in a size-prefixed
/// ciphertext frame.
///
/// Layout: a 4-byte big-endian ciphertext length, then exactly that many
/// ciphertext bytes (any cipher padding or overhead included). The prefix
/// records the byte count the cipher *actually produced*, which may differ
/// from its up-front estimate, so the field is backpatched after the
/// transform runs.
///
/// Two pools supply cipher instances — one for encode, one for decode — and
/// each call checks out exactly one instance for exactly its own duration,
/// so stateful cipher objects are never shared between concurrent calls.
/// The transform reads from one buffer's backing storage and writes into
/// the other's directly; the only copy is the one the in-place cipher
/// contract itself requires (see [Cipher]).
#[derive(Debug)]
pub struct Encrypted<S, C> {
    inner: S,
    encrypt_pool: Arc<Pool<C>>,
    decrypt_pool: Arc<Pool<C>>,
}

impl<S, C> Encrypted<S, C> {
    pub fn new(inner: S, encrypt_pool: Arc<Pool<C>>, decrypt_pool: Arc<Pool<C>>) -> Self {
        Self { inner, encrypt_pool, decrypt_pool }
    }
}

impl<T, S: Serializer<T>, C: Cipher> Serializer<T> for Encrypted<S, C> {
    fn encode(&self, value: &T, target: &mut ByteBuf) -> Result<(), CodecError> {
        // materialize the plaintext in a scratch buffer first; its length
        // determines how much ciphertext capacity the target needs
        let mut scratch = ByteBuf::new();
        self.inner.encode(value, &mut scratch)?;
        let plaintext = scratch.readable();

        let mut cipher = self.encrypt_pool.acquire();
        let estimate = cipher.ciphertext_len(plaintext.len());

        let size_at = target.write_pos();
        target.write_bytes(&[0u8; 4])?;
        let produced = cipher.encrypt(plaintext, target.spare_mut(estimate)?)?;
        target.advance_write(produced)?;

        let produced: u32 = produced.try_into().map_err(|_| {
            CodecError::InvalidValue(alloc::format!(
                "ciphertext of {produced} bytes exceeds the 32-bit length prefix"
            ))
        })?;
        target.write_at(size_at, &produced.to_be_bytes())
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<T, CodecError> {
        let ciphertext_len = u32::from_be_bytes(source.read_array()?) as usize;

        let mut cipher = self.decrypt_pool.acquire();
        let estimate = cipher.plaintext_len(ciphertext_len)?;

        let mut scratch = ByteBuf::with_capacity(estimate);
        let produced = {
            let ciphertext = source.peek_bytes(ciphertext_len)?;
            cipher.decrypt(ciphertext, scratch.spare_mut(estimate)?)?
        };
        source.advance_read(ciphertext_len)?;
        scratch.advance_write(produced)?;

        self.inner.decode(&mut scratch)
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::{
        string::{String, ToString},
        vec::Vec,
    };

    use assert_matches::assert_matches;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::super::{
        BigEndian, ByteArraySerializer, I32Serializer, Nullable, StringSerializer,
    };
    use super::*;
    use crate::cipher::{AesGcmCipher, CipherError, SecretKey, aes_gcm::OVERHEAD};

    fn pools(key: &SecretKey) -> (Arc<Pool<AesGcmCipher>>, Arc<Pool<AesGcmCipher>>) {
        let enc_key = key.clone();
        let dec_key = key.clone();
        let encrypt_pool = Arc::new(Pool::new(move || AesGcmCipher::new(&enc_key)));
        let decrypt_pool = Arc::new(Pool::new(move || AesGcmCipher::new(&dec_key)));
        (encrypt_pool, decrypt_pool)
    }

    fn test_key() -> SecretKey {
        SecretKey::with_rng(&mut ChaCha20Rng::seed_from_u64(17))
    }

    #[test]
    fn round_trip_spanning_block_sizes() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Encrypted::new(ByteArraySerializer::new(), enc, dec);

        // plaintext sizes below, at, and above one AES block
        for len in [0usize, 1, 15, 16, 17, 32, 33, 1000] {
            let value: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
            let bytes = ser.encode_to_vec(&value).unwrap();
            assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn prefix_records_produced_length() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Encrypted::new(StringSerializer::new(), enc, dec);

        let value = "payload".to_string();
        let bytes = ser.encode_to_vec(&value).unwrap();

        let prefix = u32::from_be_bytes(bytes[..4].try_into().unwrap()) as usize;
        assert_eq!(prefix, bytes.len() - 4);
        // inner encoding is 4 length bytes + 7 utf-8 bytes
        assert_eq!(prefix, 4 + 7 + OVERHEAD);
        assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
    }

    #[test]
    fn ciphertext_is_not_plaintext() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Encrypted::new(StringSerializer::new(), enc, dec);

        let bytes = ser.encode_to_vec(&"super secret".to_string()).unwrap();
        let haystack = bytes.windows(b"secret".len()).any(|w| w == b"secret");
        assert!(!haystack);
    }

    #[test]
    fn wrong_key_fails_decode() {
        let (enc, _) = pools(&test_key());
        let (_, dec) = pools(&SecretKey::from_bytes([3u8; 32]));
        let ser = Encrypted::new(I32Serializer::<BigEndian>::new(), enc, dec);

        let bytes = ser.encode_to_vec(&42).unwrap();
        assert_matches!(
            ser.decode_from_slice(&bytes),
            Err(CodecError::Cipher(CipherError::FailedOperation))
        );
    }

    #[test]
    fn truncated_ciphertext_underflows() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Encrypted::new(I32Serializer::<BigEndian>::new(), enc, dec);

        let mut bytes = ser.encode_to_vec(&42).unwrap();
        bytes.truncate(bytes.len() - 1);
        assert_matches!(ser.decode_from_slice(&bytes), Err(CodecError::InsufficientData { .. }));
    }

    #[test]
    fn cipher_instances_return_to_their_pools() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Encrypted::new(I32Serializer::<BigEndian>::new(), Arc::clone(&enc), Arc::clone(&dec));

        let bytes = ser.encode_to_vec(&7).unwrap();
        assert_eq!(enc.free_count(), 1);
        assert_eq!(dec.free_count(), 0);

        ser.decode_from_slice(&bytes).unwrap();
        assert_eq!(dec.free_count(), 1);
    }

    #[test]
    fn cipher_returns_to_pool_on_failed_decode() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Encrypted::new(
            I32Serializer::<BigEndian>::new(),
            Arc::clone(&enc),
            Arc::clone(&dec),
        );

        let mut bytes = ser.encode_to_vec(&7).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF; // break the authentication tag

        assert_matches!(ser.decode_from_slice(&bytes), Err(CodecError::Cipher(_)));
        assert_eq!(dec.free_count(), 1);
    }

    #[test]
    fn capacity_limited_target_is_respected() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Encrypted::new(ByteArraySerializer::new(), enc, dec);

        let mut target = ByteBuf::with_max_capacity(16);
        assert_matches!(
            ser.encode(&vec![0u8; 64], &mut target),
            Err(CodecError::CapacityExceeded { .. })
        );
    }

    #[test]
    fn composes_with_other_combinators() {
        let key = test_key();
        let (enc, dec) = pools(&key);
        let ser = Nullable::new(Encrypted::new(StringSerializer::new(), enc, dec));

        let value = Some("nested".to_string());
        let bytes = ser.encode_to_vec(&value).unwrap();
        assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);

        assert_eq!(ser.encode_to_vec(&None).unwrap(), [0x00]);
        assert_eq!(ser.decode_from_slice(&[0x00]).unwrap(), None::<String>);
    }
}
