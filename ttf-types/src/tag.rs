//! Four-byte identifiers for sfnt tables.

/// An array of four bytes used to identify an sfnt table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Generate a `Tag` from a byte sequence.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// The raw bytes of the tag.
    pub const fn into_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // tags are ascii in practice, but this can't be guaranteed for
        // arbitrary input
        for byte in self.0 {
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}

impl crate::Scalar for Tag {
    type Raw = [u8; 4];

    fn from_raw(raw: Self::Raw) -> Self {
        Tag(raw)
    }

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn read(slice: &[u8]) -> Option<Self> {
        slice
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
            .map(Tag)
    }
}

#[cfg(test)]
mod tests {
    use super::Tag;

    #[test]
    fn display() {
        assert_eq!(Tag::new(b"glyf").to_string(), "glyf");
        assert_eq!(Tag::new(&[b'O', b'S', b'/', 0x02]).to_string(), "OS/?");
    }
}
