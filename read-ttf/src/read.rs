//! Error types related to reading font data.

use ttf_types::{GlyphId, Tag};

/// An error that occurs when reading font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The file header is not a recognized sfnt version.
    InvalidSfnt(u32),
    /// A table required for the requested operation is not present.
    TableIsMissing(Tag),
    /// A read ran past the end of the data. The payload is the absolute
    /// offset of the failed access.
    InsufficientData(usize),
    /// A format selector field held a value we do not support.
    UnsupportedFormat(u16),
    /// A glyph id with no entry in the location table.
    GlyphIndexOutOfBounds(GlyphId),
    /// The requested operation is not available for this glyph shape.
    UnsupportedFeature(&'static str),
    /// A composite glyph referenced itself through its components.
    CompositeCycleDetected(GlyphId),
    /// Composite glyph nesting exceeded the recursion limit.
    RecursionLimitExceeded,
    /// Data that was readable but structurally invalid.
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSfnt(version) => {
                write!(f, "Unrecognized sfnt version 0x{version:08X}")
            }
            Self::TableIsMissing(tag) => write!(f, "The {tag} table is missing"),
            Self::InsufficientData(offset) => {
                write!(f, "A read at offset {offset} was out of bounds")
            }
            Self::UnsupportedFormat(format) => write!(f, "Unsupported format '{format}'"),
            Self::GlyphIndexOutOfBounds(gid) => write!(f, "{gid} is not in the location table"),
            Self::UnsupportedFeature(what) => write!(f, "Unsupported: {what}"),
            Self::CompositeCycleDetected(gid) => {
                write!(f, "Composite glyph contains a cycle through {gid}")
            }
            Self::RecursionLimitExceeded => write!(f, "Composite glyphs nested too deeply"),
            Self::MalformedData(why) => write!(f, "Malformed data: '{why}'"),
        }
    }
}

impl std::error::Error for ReadError {}
