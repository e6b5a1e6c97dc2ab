//! Helpers for constructing binary test data.

use ttf_types::Scalar;

/// A big-endian byte buffer, for building font data in tests.
#[derive(Debug, Default, Clone)]
pub struct BeBuffer {
    data: Vec<u8>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current length of the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Write any scalar to the end of this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend_from_slice(item.to_raw().as_ref());
        self
    }

    /// Write a sequence of scalars to the end of this buffer.
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend_from_slice(item.to_raw().as_ref());
        }
        self
    }

    /// Overwrite a previously written scalar at the given position.
    pub fn write_at(&mut self, offset: usize, item: impl Scalar) {
        let raw = item.to_raw();
        self.data[offset..offset + raw.as_ref().len()].copy_from_slice(raw.as_ref());
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_bytes() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(-2i16)
            .extend([3u32, 4u32])
            .push(5u8);
        assert_eq!(
            &*buf,
            &[0, 1, 0xFF, 0xFE, 0, 0, 0, 3, 0, 0, 0, 4, 5][..]
        );
    }
}
