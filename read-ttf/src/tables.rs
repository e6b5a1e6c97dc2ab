//! The font tables needed to decode glyph outlines.

pub mod cmap;
pub mod glyf;
pub mod loca;
