//! Growable byte buffer with independent read and write cursors.
//!
//! [ByteBuf] is the mutable state every serializer operates on: `encode`
//! writes at the write cursor and advances it, `decode` reads at the read
//! cursor and advances it. The buffer additionally supports absolute-position
//! overwrite (for backpatching length prefixes), a scoped read limit (for
//! decoding a length-delimited frame as a bounded sub-view), and direct
//! access to a spare region of its backing storage (for in-place cipher
//! transforms).
//!
//! A buffer is owned exclusively by one encode or decode call for the
//! duration of that call; serializers never retain a reference to it.

use alloc::{format, vec::Vec};

use crate::CodecError;

// BYTE BUFFER
// ================================================================================================

/// A growable byte container with separate read and write positions.
///
/// Bytes between the read position and the write position are readable;
/// storage past the write position is writable. Whenever data is read using
/// any of the `read_*` functions, the reader advances to the next unread
/// byte. If an error occurs, the cursor is not rolled back to the state prior
/// to the call.
#[derive(Debug, Clone, Default)]
pub struct ByteBuf {
    data: Vec<u8>,
    read_pos: usize,
    write_pos: usize,
    read_limit: Option<usize>,
    max_capacity: Option<usize>,
}

impl ByteBuf {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Creates a new empty buffer with unbounded capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty buffer with at least the specified capacity
    /// pre-allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity), ..Self::default() }
    }

    /// Creates a new empty buffer that refuses to grow beyond `max` bytes.
    ///
    /// Exceeding the limit surfaces as [CodecError::CapacityExceeded].
    pub fn with_max_capacity(max: usize) -> Self {
        Self { max_capacity: Some(max), ..Self::default() }
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the current read position.
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// Returns the current write position.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Returns the number of bytes that can still be read.
    ///
    /// When a read limit is active, bytes past the limit are not counted.
    pub fn remaining(&self) -> usize {
        self.readable_end().saturating_sub(self.read_pos)
    }

    /// Returns true if at least one byte can still be read.
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Returns the readable region as a slice, without advancing the read
    /// cursor.
    pub fn readable(&self) -> &[u8] {
        &self.data[self.read_pos..self.readable_end()]
    }

    /// Consumes the buffer and returns the written bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.truncate(self.write_pos);
        self.data
    }

    // READ OPERATIONS
    // --------------------------------------------------------------------------------------------

    /// Returns a slice of `len` bytes read from the buffer, advancing the
    /// read cursor past them.
    ///
    /// # Errors
    /// Returns [CodecError::InsufficientData] if fewer than `len` readable
    /// bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8], CodecError> {
        self.check_remaining(len)?;
        let start = self.read_pos;
        self.read_pos += len;
        Ok(&self.data[start..start + len])
    }

    /// Returns an array of `N` bytes read from the buffer.
    ///
    /// # Errors
    /// Returns [CodecError::InsufficientData] if fewer than `N` readable
    /// bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.check_remaining(N)?;
        let mut result = [0u8; N];
        result.copy_from_slice(&self.data[self.read_pos..self.read_pos + N]);
        self.read_pos += N;
        Ok(result)
    }

    /// Returns a single byte read from the buffer.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        self.check_remaining(1)?;
        let byte = self.data[self.read_pos];
        self.read_pos += 1;
        Ok(byte)
    }

    /// Returns the next readable byte without advancing the read cursor.
    pub fn peek_u8(&self) -> Result<u8, CodecError> {
        self.check_remaining(1)?;
        Ok(self.data[self.read_pos])
    }

    /// Returns a slice of the next `len` readable bytes without advancing
    /// the read cursor.
    pub fn peek_bytes(&self, len: usize) -> Result<&[u8], CodecError> {
        self.check_remaining(len)?;
        Ok(&self.data[self.read_pos..self.read_pos + len])
    }

    /// Advances the read cursor by `len` bytes without returning them.
    pub fn advance_read(&mut self, len: usize) -> Result<(), CodecError> {
        self.check_remaining(len)?;
        self.read_pos += len;
        Ok(())
    }

    /// Runs `f` against this buffer with reads restricted to the next `len`
    /// bytes, then places the read cursor immediately after those bytes.
    ///
    /// The cursor ends up `len` bytes ahead of where it started regardless of
    /// how many bytes `f` actually consumed, so a decoder that under-reads
    /// its frame cannot corrupt the position of whatever follows the frame.
    /// Limits nest: inside `f`, a narrower limit may be installed for an
    /// inner frame.
    ///
    /// # Errors
    /// Returns [CodecError::InsufficientData] if fewer than `len` readable
    /// bytes remain; otherwise propagates the result of `f`.
    pub fn with_read_limit<R>(
        &mut self,
        len: usize,
        f: impl FnOnce(&mut Self) -> Result<R, CodecError>,
    ) -> Result<R, CodecError> {
        self.check_remaining(len)?;
        let end = self.read_pos + len;
        let prev = self.read_limit;
        self.read_limit = Some(end);
        let result = f(self);
        self.read_limit = prev;
        self.read_pos = end;
        result
    }

    // WRITE OPERATIONS
    // --------------------------------------------------------------------------------------------

    /// Writes the provided bytes at the write cursor and advances it past
    /// them, growing the backing storage as needed.
    ///
    /// When the write cursor has been moved back over already-written bytes
    /// (see [Self::set_write_pos]), those bytes are overwritten in place.
    ///
    /// # Errors
    /// Returns [CodecError::CapacityExceeded] if growing would exceed the
    /// configured maximum capacity.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.ensure_initialized(self.write_pos + bytes.len())?;
        self.data[self.write_pos..self.write_pos + bytes.len()].copy_from_slice(bytes);
        self.write_pos += bytes.len();
        Ok(())
    }

    /// Writes a single byte at the write cursor.
    pub fn write_u8(&mut self, byte: u8) -> Result<(), CodecError> {
        self.write_bytes(&[byte])
    }

    /// Overwrites already-written bytes at an absolute position without
    /// moving the write cursor.
    ///
    /// # Errors
    /// Returns [CodecError::InvalidValue] if the target range extends past
    /// the write cursor; this operation patches existing bytes and never
    /// appends.
    pub fn write_at(&mut self, pos: usize, bytes: &[u8]) -> Result<(), CodecError> {
        let end = pos + bytes.len();
        if end > self.write_pos {
            return Err(CodecError::InvalidValue(format!(
                "absolute write of {}..{} exceeds the written region of {} bytes",
                pos,
                end,
                self.write_pos
            )));
        }
        self.data[pos..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Moves the write cursor to an absolute position within the initialized
    /// storage.
    ///
    /// Moving the cursor backwards lets a caller re-encode over a
    /// previously written placeholder; pairing this with a second call that
    /// restores the original position implements the backpatch pattern.
    ///
    /// # Errors
    /// Returns [CodecError::InvalidValue] if `pos` lies past the initialized
    /// storage.
    pub fn set_write_pos(&mut self, pos: usize) -> Result<(), CodecError> {
        if pos > self.data.len() {
            return Err(CodecError::InvalidValue(format!(
                "write position {} exceeds the initialized storage of {} bytes",
                pos,
                self.data.len()
            )));
        }
        self.write_pos = pos;
        Ok(())
    }

    /// Grows the buffer so that `len` writable bytes exist at the write
    /// cursor and returns them as a mutable slice, without advancing the
    /// cursor.
    ///
    /// This exposes the backing storage directly so that a transform (e.g. a
    /// cipher) can produce its output in place; follow up with
    /// [Self::advance_write] for the number of bytes actually produced.
    pub fn spare_mut(&mut self, len: usize) -> Result<&mut [u8], CodecError> {
        self.ensure_initialized(self.write_pos + len)?;
        Ok(&mut self.data[self.write_pos..self.write_pos + len])
    }

    /// Advances the write cursor over bytes produced directly in the backing
    /// storage via [Self::spare_mut].
    ///
    /// # Errors
    /// Returns [CodecError::InvalidValue] if the cursor would move past the
    /// initialized storage.
    pub fn advance_write(&mut self, len: usize) -> Result<(), CodecError> {
        self.set_write_pos(self.write_pos + len)
    }

    // HELPERS
    // --------------------------------------------------------------------------------------------

    /// Returns the exclusive end of the readable region, honoring an active
    /// read limit.
    fn readable_end(&self) -> usize {
        match self.read_limit {
            Some(limit) => limit.min(self.write_pos),
            None => self.write_pos,
        }
    }

    fn check_remaining(&self, requested: usize) -> Result<(), CodecError> {
        let remaining = self.remaining();
        if requested > remaining {
            return Err(CodecError::InsufficientData { requested, remaining });
        }
        Ok(())
    }

    /// Grows the initialized storage to at least `required` bytes,
    /// zero-filling the new region.
    fn ensure_initialized(&mut self, required: usize) -> Result<(), CodecError> {
        if required <= self.data.len() {
            return Ok(());
        }
        if let Some(max) = self.max_capacity
            && required > max
        {
            return Err(CodecError::CapacityExceeded { requested: required, max });
        }
        self.data.resize(required, 0);
        Ok(())
    }
}

impl From<Vec<u8>> for ByteBuf {
    /// Creates a buffer whose readable region is the provided bytes.
    fn from(data: Vec<u8>) -> Self {
        let write_pos = data.len();
        Self { data, write_pos, ..Self::default() }
    }
}

impl From<&[u8]> for ByteBuf {
    fn from(data: &[u8]) -> Self {
        Self::from(data.to_vec())
    }
}

// TESTS
// ================================================================================================
