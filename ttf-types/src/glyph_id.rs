//! Glyph identifiers
//!
//! Although these are treated as u16s in the file format, we choose to
//! represent them as a distinct type.

use crate::Scalar;

/// A 16-bit glyph identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphId(u16);

impl GlyphId {
    /// The identifier reserved for unknown glyphs.
    pub const NOTDEF: GlyphId = GlyphId(0);

    /// Construct a new `GlyphId`.
    pub const fn new(raw: u16) -> Self {
        GlyphId(raw)
    }

    /// The identifier as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl Default for GlyphId {
    fn default() -> Self {
        GlyphId::NOTDEF
    }
}

impl std::fmt::Display for GlyphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GID_{}", self.0)
    }
}

impl Scalar for GlyphId {
    type Raw = [u8; 2];

    fn from_raw(raw: Self::Raw) -> Self {
        GlyphId(u16::from_be_bytes(raw))
    }

    fn to_raw(self) -> Self::Raw {
        self.0.to_be_bytes()
    }

    fn read(slice: &[u8]) -> Option<Self> {
        u16::read(slice).map(GlyphId)
    }
}
