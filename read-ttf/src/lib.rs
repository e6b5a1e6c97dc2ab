//! Reading TrueType glyph outlines and hinting programs.
//!
//! This crate parses the tables involved in turning a codepoint into a
//! glyph outline: `cmap` for the codepoint to glyph id mapping, `loca`
//! for per-glyph byte ranges, and `glyf` for the outlines themselves,
//! including composite glyphs assembled from transformed components. It
//! also contains an interpreter for the hinting bytecode embedded in
//! glyph records.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod decycler;
mod font_data;
mod read;
mod table_directory;

pub mod hint;
pub mod tables;

#[cfg(test)]
mod test_helpers;

pub use font_data::{Cursor, FontData};
pub use read::ReadError;
pub use table_directory::TableDirectory;
