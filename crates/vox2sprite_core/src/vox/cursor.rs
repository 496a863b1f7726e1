//! Bounds-checked little-endian reader over a byte slice.

use crate::error::{SpriteError, SpriteResult};

/// Forward-only reader. Every read checks the remaining length first and
/// fails with [`SpriteError::Truncated`] instead of reading out of bounds.
#[derive(Clone, Debug)]
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    /// Absolute offset of `data[0]` in the original buffer, for error reports.
    base: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor over a whole buffer.
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// Creates a cursor over a sub-slice that starts at `base` in the buffer.
    pub(crate) const fn with_base(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Absolute offset of the next byte.
    #[inline]
    pub(crate) const fn position(&self) -> usize {
        self.base + self.pos
    }

    /// Bytes left to read.
    #[inline]
    pub(crate) const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes the next `len` bytes.
    pub(crate) fn take(&mut self, len: usize) -> SpriteResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(SpriteError::Truncated {
                offset: self.position(),
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Takes the next `len` bytes as a cursor of their own.
    pub(crate) fn split(&mut self, len: usize) -> SpriteResult<ByteCursor<'a>> {
        let base = self.position();
        self.take(len).map(|bytes| ByteCursor::with_base(bytes, base))
    }

    /// Reads a 4-byte tag.
    pub(crate) fn read_tag(&mut self) -> SpriteResult<[u8; 4]> {
        let bytes = self.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Reads a little-endian u32.
    pub(crate) fn read_u32(&mut self) -> SpriteResult<u32> {
        self.read_tag().map(u32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut cursor = ByteCursor::new(&[0x96, 0, 0, 0, b'V', b'O', b'X', b' ']);
        assert_eq!(cursor.read_u32().unwrap(), 150);
        assert_eq!(&cursor.read_tag().unwrap(), b"VOX ");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_short_read_is_truncated_error() {
        let mut cursor = ByteCursor::with_base(&[1, 2, 3], 100);
        cursor.take(1).unwrap();

        match cursor.read_u32() {
            Err(SpriteError::Truncated { offset, needed, available }) => {
                assert_eq!(offset, 101);
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
        // A failed read does not advance.
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_split_tracks_absolute_offset() {
        let mut cursor = ByteCursor::new(&[0; 16]);
        cursor.take(8).unwrap();
        let mut inner = cursor.split(4).unwrap();

        assert_eq!(inner.position(), 8);
        assert!(inner.take(5).is_err());
        assert_eq!(cursor.position(), 12);
    }
}
