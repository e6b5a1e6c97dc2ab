//! Common scalar types for parsing TrueType fonts.
//!
//! All multi-byte values in a font file are big-endian. The [`Scalar`]
//! trait describes the types that can be decoded from (and encoded to)
//! raw big-endian bytes; the rest of this crate is the small set of
//! numeric types those bytes decode into.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bbox;
mod fixed;
mod glyph_id;
mod point;
mod raw;
mod tag;

pub use bbox::BoundingBox;
pub use fixed::{F26Dot6, F2Dot14};
pub use glyph_id::GlyphId;
pub use point::Point;
pub use raw::Scalar;
pub use tag::Tag;
