//! Fixed-capacity byte buffer used as the unit of codec I/O.
//!
//! A [`Buffer`] pairs owned storage with a capacity declared at construction.
//! The fill length (`len`) only grows through [`Buffer::push`], which refuses
//! to go past capacity. The codec resets a buffer with [`Buffer::clear`]
//! before writing and never resizes it.
//!
//! # Invariants
//! - `len() <= capacity()` at all times
//! - `capacity()` never changes after construction

use crate::error::{CodecError, Result};

/// Owned byte sequence with a fixed capacity and a current fill length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Written bytes; `data.len()` is the fill length
    data: Vec<u8>,
    /// Declared capacity
    capacity: usize,
}

impl Buffer {
    /// Create an empty buffer able to hold `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a full buffer from existing bytes (capacity = length).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let data = bytes.into();
        let capacity = data.len();
        Self { data, capacity }
    }

    /// Create an empty buffer sized to receive the encoding of `input`.
    ///
    /// Each input byte expands to two encoded bytes.
    pub fn for_encoding(input: &Buffer) -> Self {
        Self::with_capacity(encoded_len(input.len()))
    }

    /// Create an empty buffer sized to receive the decoding of `input`.
    ///
    /// Two encoded bytes contract to one data byte; an odd trailing byte
    /// still reserves a slot.
    pub fn for_decoding(input: &Buffer) -> Self {
        Self::with_capacity(decoded_capacity(input.len()))
    }

    /// Append one byte.
    ///
    /// # Errors
    /// Returns `CodecError::Overflow` if the buffer is already full.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.data.len() >= self.capacity {
            return Err(CodecError::Overflow {
                capacity: self.capacity,
            }
            .into());
        }
        self.data.push(byte);
        Ok(())
    }

    /// Reset the fill length to zero. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Fill length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Declared capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    /// Written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the written bytes (for corrupting test vectors).
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Fail unless the capacity is at least `required`.
    pub(crate) fn ensure_capacity(&self, required: usize) -> Result<()> {
        if self.capacity < required {
            return Err(CodecError::InsufficientCapacity {
                required,
                capacity: self.capacity,
            }
            .into());
        }
        Ok(())
    }
}

/// Encoded length for `data_len` data bytes.
pub fn encoded_len(data_len: usize) -> usize {
    data_len * 2
}

/// Output capacity required to decode `encoded_len` encoded bytes.
pub fn decoded_capacity(encoded_len: usize) -> usize {
    encoded_len.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_push_within_capacity() {
        let mut buf = Buffer::with_capacity(2);
        assert!(buf.is_empty());

        buf.push(0xAB).unwrap();
        buf.push(0xCD).unwrap();

        assert_eq!(buf.len(), 2);
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.as_slice(), &[0xAB, 0xCD]);
    }

    #[test]
    fn test_push_overflow() {
        let mut buf = Buffer::with_capacity(1);
        buf.push(1).unwrap();

        let result = buf.push(2);
        assert!(matches!(
            result,
            Err(Error::Codec(CodecError::Overflow { capacity: 1 }))
        ));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buf = Buffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(buf.capacity(), 3);

        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 3);
    }

    #[test]
    fn test_sizing_helpers() {
        let input = Buffer::from_bytes(vec![0; 5]);
        assert_eq!(Buffer::for_encoding(&input).capacity(), 10);
        assert_eq!(Buffer::for_decoding(&input).capacity(), 3);

        assert_eq!(decoded_capacity(0), 0);
        assert_eq!(decoded_capacity(1), 1);
        assert_eq!(decoded_capacity(4), 2);
    }

    #[test]
    fn test_ensure_capacity() {
        let buf = Buffer::with_capacity(3);
        assert!(buf.ensure_capacity(3).is_ok());
        assert!(matches!(
            buf.ensure_capacity(4),
            Err(Error::Codec(CodecError::InsufficientCapacity {
                required: 4,
                capacity: 3
            }))
        ));
    }
}
