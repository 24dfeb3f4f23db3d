//! The cipher boundary used by the encryption combinator.
//!
//! A [Cipher] is a stateful, reusable transform with computable output
//! sizes. Instances are not safe for concurrent use — the encryption
//! combinator checks them out of a [Pool](crate::pool::Pool) so that each
//! encode or decode call holds one exclusively.

use thiserror::Error;

pub mod aes_gcm;

pub use aes_gcm::{AesGcmCipher, SecretKey};

// CIPHER TRAIT
// ================================================================================================

/// A symmetric transform between plaintext and ciphertext with computable
/// output sizes.
///
/// Output slices are written through directly, so callers can point the
/// transform at a buffer's backing storage. The produced byte count is
/// returned and may be smaller than the estimate the `*_len` methods give;
/// callers must treat the estimate as a capacity bound and the return value
/// as the truth.
pub trait Cipher {
    /// Returns an upper bound on the ciphertext size for a plaintext of the
    /// given length, including any padding, nonce, or authentication tag.
    fn ciphertext_len(&self, plaintext_len: usize) -> usize;

    /// Returns an upper bound on the plaintext size recovered from a
    /// ciphertext of the given length.
    ///
    /// # Errors
    /// Returns a [CipherError] if no valid ciphertext can have the given
    /// length.
    fn plaintext_len(&self, ciphertext_len: usize) -> Result<usize, CipherError>;

    /// Encrypts the plaintext into `out`, returning the number of bytes
    /// produced.
    ///
    /// `out` must hold at least [Self::ciphertext_len] of the plaintext
    /// length.
    fn encrypt(&mut self, plaintext: &[u8], out: &mut [u8]) -> Result<usize, CipherError>;

    /// Decrypts the ciphertext into `out`, returning the number of bytes
    /// produced.
    ///
    /// `out` must hold at least [Self::plaintext_len] of the ciphertext
    /// length.
    fn decrypt(&mut self, ciphertext: &[u8], out: &mut [u8]) -> Result<usize, CipherError>;
}

// ERRORS
// ================================================================================================

/// Errors produced by a [Cipher] transform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// The transform rejected its input: wrong key, malformed ciphertext,
    /// or failed authentication.
    #[error("cipher transform failed: wrong key, malformed input, or failed authentication")]
    FailedOperation,

    /// The ciphertext is shorter than the cipher's fixed overhead.
    #[error("ciphertext of {len} bytes is shorter than the minimum of {min}")]
    CiphertextTooShort {
        /// Length of the rejected ciphertext.
        len: usize,
        /// Minimum length a valid ciphertext can have.
        min: usize,
    },

    /// The output slice cannot hold the transform's result.
    #[error("output of {available} bytes cannot hold {required} bytes")]
    OutputTooSmall {
        /// Number of bytes the transform needs to produce.
        required: usize,
        /// Size of the provided output slice.
        available: usize,
    },
}
