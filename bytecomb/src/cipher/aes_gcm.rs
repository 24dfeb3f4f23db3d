//! AES-256-GCM implementation of the [Cipher] trait.
//!
//! Ciphertext layout: a 96-bit nonce, the encrypted payload, then the
//! 128-bit authentication tag — a fixed 28-byte overhead over the
//! plaintext. Each instance carries its own nonce generator, so pooled
//! instances never share nonce state.

use aes_gcm::{AeadInPlace, Aes256Gcm, KeyInit, Nonce, Tag};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};

use super::{Cipher, CipherError};

// CONSTANTS
// ================================================================================================

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Fixed difference between ciphertext and plaintext lengths.
pub const OVERHEAD: usize = NONCE_LEN + TAG_LEN;

// SECRET KEY
// ================================================================================================

/// A 256-bit secret key.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Creates a new random secret key using the default random number
    /// generator.
    #[cfg(feature = "std")]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_rng(&mut rand::rng())
    }

    /// Creates a new random secret key using the provided random number
    /// generator.
    pub fn with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);
        Self(key)
    }

    /// Creates a key from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // key material stays out of logs
        f.write_str("SecretKey(..)")
    }
}

// AES-256-GCM CIPHER
// ================================================================================================

/// An AES-256-GCM transform holding a key and a private nonce generator.
pub struct AesGcmCipher {
    cipher: Aes256Gcm,
    nonce_rng: ChaCha20Rng,
}

impl AesGcmCipher {
    /// Creates a cipher for the given key, seeding the nonce generator from
    /// the operating system.
    #[cfg(feature = "std")]
    pub fn new(key: &SecretKey) -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        Self::with_nonce_seed(key, seed)
    }

    /// Creates a cipher for the given key with an explicit nonce-generator
    /// seed.
    ///
    /// Two instances built from the same seed produce the same nonce
    /// sequence; give every instance its own seed.
    pub fn with_nonce_seed(key: &SecretKey, seed: [u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(&key.0.into()),
            nonce_rng: ChaCha20Rng::from_seed(seed),
        }
    }
}

impl Cipher for AesGcmCipher {
    fn ciphertext_len(&self, plaintext_len: usize) -> usize {
        plaintext_len + OVERHEAD
    }

    fn plaintext_len(&self, ciphertext_len: usize) -> Result<usize, CipherError> {
        ciphertext_len
            .checked_sub(OVERHEAD)
            .ok_or(CipherError::CiphertextTooShort { len: ciphertext_len, min: OVERHEAD })
    }

    fn encrypt(&mut self, plaintext: &[u8], out: &mut [u8]) -> Result<usize, CipherError> {
        let required = self.ciphertext_len(plaintext.len());
        if out.len() < required {
            return Err(CipherError::OutputTooSmall { required, available: out.len() });
        }

        let mut nonce = [0u8; NONCE_LEN];
        self.nonce_rng.fill_bytes(&mut nonce);

        let (nonce_out, rest) = out.split_at_mut(NONCE_LEN);
        nonce_out.copy_from_slice(&nonce);
        let (body, tag_out) = rest.split_at_mut(plaintext.len());
        body.copy_from_slice(plaintext);

        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", body)
            .map_err(|_| CipherError::FailedOperation)?;
        tag_out[..TAG_LEN].copy_from_slice(tag.as_slice());

        Ok(required)
    }

    fn decrypt(&mut self, ciphertext: &[u8], out: &mut [u8]) -> Result<usize, CipherError> {
        let produced = self.plaintext_len(ciphertext.len())?;
        if out.len() < produced {
            return Err(CipherError::OutputTooSmall { required: produced, available: out.len() });
        }

        let (nonce, rest) = ciphertext.split_at(NONCE_LEN);
        let (body, tag) = rest.split_at(produced);
        out[..produced].copy_from_slice(body);

        self.cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                b"",
                &mut out[..produced],
                Tag::from_slice(tag),
            )
            .map_err(|_| CipherError::FailedOperation)?;

        Ok(produced)
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use assert_matches::assert_matches;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::*;

    fn test_cipher(seed: u8) -> AesGcmCipher {
        let key = SecretKey::with_rng(&mut ChaCha20Rng::seed_from_u64(42));
        AesGcmCipher::with_nonce_seed(&key, [seed; 32])
    }

    #[test]
    fn round_trip_various_sizes() {
        let mut cipher = test_cipher(1);
        for len in [0usize, 1, 15, 16, 17, 31, 32, 33, 1024] {
            let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();

            let mut ciphertext = vec![0u8; cipher.ciphertext_len(len)];
            let produced = cipher.encrypt(&plaintext, &mut ciphertext).unwrap();
            assert_eq!(produced, len + OVERHEAD);

            let mut recovered = vec![0u8; cipher.plaintext_len(produced).unwrap()];
            let recovered_len = cipher.decrypt(&ciphertext[..produced], &mut recovered).unwrap();
            assert_eq!(&recovered[..recovered_len], plaintext.as_slice());
        }
    }

    #[test]
    fn decrypt_with_wrong_key_fails() {
        let mut cipher = test_cipher(1);
        let mut ciphertext = vec![0u8; cipher.ciphertext_len(4)];
        cipher.encrypt(&[1, 2, 3, 4], &mut ciphertext).unwrap();

        let other_key = SecretKey::from_bytes([7u8; 32]);
        let mut other = AesGcmCipher::with_nonce_seed(&other_key, [9; 32]);
        let mut out = vec![0u8; 4];
        assert_matches!(
            other.decrypt(&ciphertext, &mut out),
            Err(CipherError::FailedOperation)
        );
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let mut cipher = test_cipher(1);
        let mut ciphertext = vec![0u8; cipher.ciphertext_len(4)];
        cipher.encrypt(&[1, 2, 3, 4], &mut ciphertext).unwrap();
        ciphertext[NONCE_LEN] ^= 0x01;

        let mut out = vec![0u8; 4];
        assert_matches!(cipher.decrypt(&ciphertext, &mut out), Err(CipherError::FailedOperation));
    }

    #[test]
    fn short_ciphertext_is_rejected() {
        let cipher = test_cipher(1);
        assert_matches!(
            cipher.plaintext_len(OVERHEAD - 1),
            Err(CipherError::CiphertextTooShort { len: 27, min: OVERHEAD })
        );
    }

    #[test]
    fn undersized_output_is_rejected() {
        let mut cipher = test_cipher(1);
        let mut out = vec![0u8; 4];
        assert_matches!(
            cipher.encrypt(&[1, 2, 3, 4], &mut out),
            Err(CipherError::OutputTooSmall { .. })
        );
    }

    #[test]
    fn nonces_differ_between_calls() {
        let mut cipher = test_cipher(1);
        let mut first = vec![0u8; cipher.ciphertext_len(4)];
        let mut second = vec![0u8; cipher.ciphertext_len(4)];
        cipher.encrypt(&[1, 2, 3, 4], &mut first).unwrap();
        cipher.encrypt(&[1, 2, 3, 4], &mut second).unwrap();
        assert_ne!(first[..NONCE_LEN], second[..NONCE_LEN]);
    }
}
