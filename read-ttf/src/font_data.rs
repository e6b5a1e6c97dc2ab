//! Raw font bytes with typed big-endian reads.

use std::ops::{Bound, RangeBounds};

use ttf_types::Scalar;

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience
/// methods for parsing and validating that data. A `FontData` produced
/// by [`split_off`](Self::split_off) or [`slice`](Self::slice) remembers
/// its position in the original data, so errors report absolute offsets.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    total_pos: usize,
    bytes: &'a [u8],
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with the provided bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData {
            total_pos: 0,
            bytes,
        }
    }

    /// The length of the data, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw underlying bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns self[pos..], or `None` if the position is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData {
            bytes,
            total_pos: self.total_pos + pos,
        })
    }

    /// Returns self[range], or `None` if the range is out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let start = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(i) => *i,
            Bound::Excluded(i) => i.saturating_add(1),
        };
        let bytes = match range.end_bound() {
            Bound::Unbounded => self.bytes.get(start..),
            Bound::Included(i) => self.bytes.get(start..=*i),
            Bound::Excluded(i) => self.bytes.get(start..*i),
        }?;
        Some(FontData {
            bytes,
            total_pos: self.total_pos + start,
        })
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::InsufficientData(self.total_pos + offset))
    }

    /// Return a cursor positioned at the start of the data.
    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }
}

/// A cursor for validating bytes during parsing.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> Cursor<'a> {
    /// Read a scalar and advance the cursor.
    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let result = self.data.read_at::<T>(self.pos);
        if result.is_ok() {
            self.pos += T::RAW_BYTE_LEN;
        }
        result
    }

    /// Read `count` consecutive scalars into a vec and advance the cursor.
    pub fn read_vec<T: Scalar>(&mut self, count: usize) -> Result<Vec<T>, ReadError> {
        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            result.push(self.read()?);
        }
        Ok(result)
    }

    /// Advance the cursor by `n_bytes` without validation.
    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos += n_bytes;
    }

    /// The current position of the cursor, relative to the data it was
    /// created from.
    pub fn position(&self) -> usize {
        self.pos
    }
}
