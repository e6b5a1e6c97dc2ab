//! The [loca](https://learn.microsoft.com/en-us/typography/opentype/spec/loca) table
//!
//! Stores the byte range of each glyph record within the `glyf` table.

use std::ops::Range;

use ttf_types::GlyphId;

use crate::{FontData, ReadError};

/// Resolves a glyph id to its byte range in the `glyf` table.
///
/// Composite glyph decoding takes this as a collaborator so that tests
/// (and twilight setups) can supply ranges without a real `loca` table.
pub trait GlyphLocations {
    /// The byte range for the given glyph. An empty range means the
    /// glyph has no outline.
    fn range(&self, glyph_id: GlyphId) -> Result<Range<usize>, ReadError>;
}

/// The decoded index to location table.
///
/// Holds `num_glyphs + 1` offsets; the range for glyph `i` is
/// `offsets[i]..offsets[i + 1]`.
pub struct Loca {
    offsets: Vec<u32>,
}

impl Loca {
    /// Decode a loca table.
    ///
    /// `num_glyphs` comes from the `maxp` table and `index_to_loc_format`
    /// from the `head` table: 0 for short offsets (stored halved), 1 for
    /// long offsets.
    pub fn new(data: &[u8], num_glyphs: u16, index_to_loc_format: i16) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let count = num_glyphs as usize + 1;
        let mut cursor = data.cursor();
        let mut offsets = Vec::with_capacity(count);
        match index_to_loc_format {
            0 => {
                for _ in 0..count {
                    offsets.push(cursor.read::<u16>()? as u32 * 2);
                }
            }
            1 => {
                for _ in 0..count {
                    offsets.push(cursor.read::<u32>()?);
                }
            }
            other => return Err(ReadError::UnsupportedFormat(other as u16)),
        }
        if !offsets.windows(2).all(|pair| pair[0] <= pair[1]) {
            return Err(ReadError::MalformedData("loca offsets out of order"));
        }
        Ok(Self { offsets })
    }

    /// The number of glyphs covered by this table.
    pub fn num_glyphs(&self) -> u16 {
        (self.offsets.len() - 1) as u16
    }
}

impl GlyphLocations for Loca {
    fn range(&self, glyph_id: GlyphId) -> Result<Range<usize>, ReadError> {
        let ix = glyph_id.to_u16() as usize;
        match (self.offsets.get(ix), self.offsets.get(ix + 1)) {
            (Some(start), Some(end)) => Ok(*start as usize..*end as usize),
            _ => Err(ReadError::GlyphIndexOutOfBounds(glyph_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_offsets_are_halved() {
        let buf = BeBuffer::new().extend([0u16, 10, 10, 25]);
        let loca = Loca::new(&buf, 3, 0).unwrap();
        assert_eq!(loca.num_glyphs(), 3);
        assert_eq!(loca.range(GlyphId::new(0)), Ok(0..20));
        // a zero length range marks an empty glyph
        assert_eq!(loca.range(GlyphId::new(1)), Ok(20..20));
        assert_eq!(loca.range(GlyphId::new(2)), Ok(20..50));
        assert_eq!(
            loca.range(GlyphId::new(3)),
            Err(ReadError::GlyphIndexOutOfBounds(GlyphId::new(3)))
        );
    }

    #[test]
    fn long_offsets_are_raw() {
        let buf = BeBuffer::new().extend([0u32, 100, 70000]);
        let loca = Loca::new(&buf, 2, 1).unwrap();
        assert_eq!(loca.range(GlyphId::new(1)), Ok(100..70000));
    }

    #[test]
    fn unknown_format() {
        let buf = BeBuffer::new().extend([0u16, 10]);
        assert!(matches!(
            Loca::new(&buf, 1, 2),
            Err(ReadError::UnsupportedFormat(2))
        ));
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let buf = BeBuffer::new().extend([0u16, 10, 5]);
        assert!(matches!(
            Loca::new(&buf, 2, 0),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn truncated_table() {
        let buf = BeBuffer::new().extend([0u16, 10]);
        assert!(matches!(
            Loca::new(&buf, 2, 0),
            Err(ReadError::InsufficientData(_))
        ));
    }
}
