use alloc::string::String;

use thiserror::Error;

use crate::cipher::CipherError;

/// Errors that can occur while encoding or decoding values.
///
/// Every error aborts the current encode or decode call immediately; no
/// partially decoded value is ever returned and no retry happens at this
/// layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A decode requested more bytes than remain readable.
    #[error("decode requested {requested} bytes but only {remaining} remain")]
    InsufficientData {
        /// Number of bytes the decoder asked for.
        requested: usize,
        /// Number of readable bytes left in the buffer.
        remaining: usize,
    },

    /// The destination buffer cannot be grown to the required size.
    #[error("buffer cannot grow to {requested} bytes, capacity is limited to {max}")]
    CapacityExceeded {
        /// Total number of bytes the buffer would need to hold.
        requested: usize,
        /// The configured maximum capacity.
        max: usize,
    },

    /// A decoded set or map produced fewer distinct entries than its declared
    /// count.
    #[error("decoded collection declared {declared} entries but entry {index} is a duplicate")]
    DuplicateEntry {
        /// The element count declared in the byte stream.
        declared: usize,
        /// Zero-based index of the first duplicate entry.
        index: usize,
    },

    /// The underlying cipher rejected its input.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// A decoded or encoded value is outside the domain of its serializer.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}
