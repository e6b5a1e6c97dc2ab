//! The sfnt table directory.
//!
//! Locates named tables within a font file and hands their bytes to the
//! typed table parsers.

use ttf_types::Tag;

use crate::tables::cmap::Cmap;
use crate::tables::glyf::Glyf;
use crate::tables::loca::Loca;
use crate::{FontData, ReadError};

/// The sfnt version for fonts with TrueType outlines.
pub const SFNT_VERSION_TRUETYPE: u32 = 0x00010000;

/// The `true` sfnt version used by some legacy Apple fonts.
pub const SFNT_VERSION_APPLE: u32 = 0x74727565;

pub const CMAP: Tag = Tag::new(b"cmap");
pub const GLYF: Tag = Tag::new(b"glyf");
pub const LOCA: Tag = Tag::new(b"loca");

#[derive(Clone, Copy, Debug)]
struct TableRecord {
    tag: Tag,
    offset: u32,
    length: u32,
}

/// A parsed sfnt header: the table of contents of a font file.
pub struct TableDirectory<'a> {
    data: FontData<'a>,
    records: Vec<TableRecord>,
}

impl<'a> TableDirectory<'a> {
    /// Parse the directory from the bytes of a whole font file.
    pub fn new(bytes: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(bytes);
        let mut cursor = data.cursor();
        let version: u32 = cursor.read()?;
        if version != SFNT_VERSION_TRUETYPE && version != SFNT_VERSION_APPLE {
            return Err(ReadError::InvalidSfnt(version));
        }
        let num_tables: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6);
        let mut records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag: Tag = cursor.read()?;
            let _checksum: u32 = cursor.read()?;
            records.push(TableRecord {
                tag,
                offset: cursor.read()?,
                length: cursor.read()?,
            });
        }
        Ok(Self { data, records })
    }

    /// The raw bytes of the table with the given tag, if present.
    pub fn data_for_tag(&self, tag: Tag) -> Option<&'a [u8]> {
        let record = self.records.iter().find(|record| record.tag == tag)?;
        let start = record.offset as usize;
        self.data
            .slice(start..start + record.length as usize)
            .map(|data| data.as_bytes())
    }

    fn expect_data_for_tag(&self, tag: Tag) -> Result<&'a [u8], ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    /// Decode the character map.
    pub fn cmap(&self) -> Result<Cmap, ReadError> {
        Cmap::new(self.expect_data_for_tag(CMAP)?)
    }

    /// Decode the glyph location table.
    ///
    /// `num_glyphs` and `index_to_loc_format` come from the `maxp` and
    /// `head` tables, which are flat field reads left to the caller.
    pub fn loca(&self, num_glyphs: u16, index_to_loc_format: i16) -> Result<Loca, ReadError> {
        Loca::new(
            self.expect_data_for_tag(LOCA)?,
            num_glyphs,
            index_to_loc_format,
        )
    }

    /// The glyph outline table.
    pub fn glyf(&self) -> Result<Glyf<'a>, ReadError> {
        Ok(Glyf::new(self.expect_data_for_tag(GLYF)?))
    }
}
