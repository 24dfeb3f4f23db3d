//! Composable binary serializers.
//!
//! A [Serializer] pairs an `encode` and a `decode` operation for one value
//! type, both running against a shared [ByteBuf] with independent read and
//! write cursors. Primitive serializers cover fixed-width numerics (in both
//! endiannesses), strings, byte arrays, arbitrary-precision numbers, and
//! date/time values; combinators compose them into serializers for optional
//! values, collections, length-prefixed frames, and encrypted payloads.
//!
//! Serializers are plain immutable values: build one once, share it across
//! threads, and reuse it for any number of calls. All per-call state lives
//! in the buffer (and, for [Encrypted](ser::Encrypted), in a cipher checked
//! out of a [Pool](pool::Pool) for the duration of the call).
//!
//! # Example
//!
//! ```
//! use bytecomb::{
//!     Serializer,
//!     ser::{BigEndian, Framed, I32Serializer, ListSerializer, Nullable, U16Serializer},
//! };
//!
//! // a framed list of nullable 32-bit integers with a 2-byte element count
//! let ser = Framed::new(
//!     I32Serializer::<BigEndian>::new(),
//!     ListSerializer::new(
//!         U16Serializer::<BigEndian>::new(),
//!         Nullable::new(I32Serializer::<BigEndian>::new()),
//!     ),
//! );
//!
//! let value = vec![Some(1), None, Some(3)];
//! let bytes = ser.encode_to_vec(&value)?;
//! assert_eq!(ser.decode_from_slice(&bytes)?, value);
//! # Ok::<(), bytecomb::CodecError>(())
//! ```

#![no_std]

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod cipher;
mod error;
#[cfg(feature = "std")]
pub mod pool;
pub mod ser;

// RE-EXPORTS
// ================================================================================================

pub use buffer::ByteBuf;
pub use error::CodecError;
pub use ser::{Serializer, SizeSerializer};
