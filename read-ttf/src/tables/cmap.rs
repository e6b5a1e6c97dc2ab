//! The [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap) table
//!
//! Maps codepoints to glyph identifiers. A font carries one or more
//! encoding subtables; each is decoded into owned lookup arrays at
//! construction time and queried through [`CmapSubtable::glyph_index`].

use ttf_types::GlyphId;

use crate::{FontData, ReadError};

/// Identifies the platform and encoding of one cmap subtable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    /// Byte offset of the subtable from the start of the cmap table.
    pub subtable_offset: u32,
}

impl EncodingRecord {
    /// True for platform and encoding pairs that carry a Unicode mapping.
    pub fn is_unicode(&self) -> bool {
        self.platform_id == 0 || (self.platform_id == 3 && matches!(self.encoding_id, 0 | 1 | 10))
    }
}

/// The character to glyph index mapping table.
pub struct Cmap {
    subtables: Vec<(EncodingRecord, CmapSubtable)>,
}

impl Cmap {
    /// Decode a cmap table, keeping every subtable in a recognized format.
    ///
    /// Subtables in formats we do not support are skipped; fonts commonly
    /// carry several encodings and only need one usable mapping.
    pub fn new(data: &[u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let _version: u16 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let mut subtables = Vec::new();
        for _ in 0..num_tables {
            let record = EncodingRecord {
                platform_id: cursor.read()?,
                encoding_id: cursor.read()?,
                subtable_offset: cursor.read()?,
            };
            let offset = record.subtable_offset as usize;
            let subtable_data = data
                .split_off(offset)
                .ok_or(ReadError::InsufficientData(offset))?;
            match CmapSubtable::new(subtable_data) {
                Ok(subtable) => subtables.push((record, subtable)),
                Err(ReadError::UnsupportedFormat(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(Self { subtables })
    }

    /// The encoding records of the subtables that were decoded.
    pub fn encoding_records(&self) -> impl Iterator<Item = &EncodingRecord> {
        self.subtables.iter().map(|(record, _)| record)
    }

    /// Map a codepoint to a glyph identifier.
    ///
    /// Unicode subtables are preferred; any other encoding is consulted
    /// only when no Unicode subtable has a mapping. Returns
    /// [`GlyphId::NOTDEF`] when nothing maps the codepoint.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> GlyphId {
        let codepoint = codepoint.into();
        for unicode_first in [true, false] {
            for (record, subtable) in &self.subtables {
                if record.is_unicode() != unicode_first {
                    continue;
                }
                let gid = subtable.glyph_index(codepoint);
                if gid != GlyphId::NOTDEF {
                    return gid;
                }
            }
        }
        GlyphId::NOTDEF
    }
}

/// A single encoding subtable in one of the formats we decode.
pub enum CmapSubtable {
    Format0(Cmap0),
    Format4(Cmap4),
    Format6(Cmap6),
    Format12(Cmap12),
}

impl CmapSubtable {
    /// Decode a subtable, dispatching on the leading format field.
    pub fn new(data: FontData) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => Cmap0::new(data).map(Self::Format0),
            4 => Cmap4::new(data).map(Self::Format4),
            6 => Cmap6::new(data).map(Self::Format6),
            12 => Cmap12::new(data).map(Self::Format12),
            other => Err(ReadError::UnsupportedFormat(other)),
        }
    }

    /// Map a codepoint to a glyph identifier, returning
    /// [`GlyphId::NOTDEF`] for codepoints this subtable does not cover.
    pub fn glyph_index(&self, codepoint: u32) -> GlyphId {
        match self {
            Self::Format0(table) => table.glyph_index(codepoint),
            Self::Format4(table) => table.glyph_index(codepoint),
            Self::Format6(table) => table.glyph_index(codepoint),
            Self::Format12(table) => table.glyph_index(codepoint),
        }
    }
}

/// [Format 0](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table):
/// a flat array of 256 byte-sized glyph ids.
pub struct Cmap0 {
    glyph_ids: Vec<u8>,
}

impl Cmap0 {
    fn new(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(2); // format
        let _length: u16 = cursor.read()?;
        let _language: u16 = cursor.read()?;
        let glyph_ids = cursor.read_vec(256)?;
        Ok(Self { glyph_ids })
    }

    pub fn glyph_index(&self, codepoint: u32) -> GlyphId {
        match self.glyph_ids.get(codepoint as usize) {
            Some(gid) => GlyphId::new(*gid as u16),
            None => GlyphId::NOTDEF,
        }
    }
}

/// [Format 4](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values):
/// segmented coverage of the basic multilingual plane.
pub struct Cmap4 {
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<i16>,
    id_range_offsets: Vec<u16>,
    glyph_id_array: Vec<u16>,
}

impl Cmap4 {
    fn new(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(2); // format
        let length: u16 = cursor.read()?;
        let _language: u16 = cursor.read()?;
        let seg_count_x2: u16 = cursor.read()?;
        let seg_count = seg_count_x2 as usize / 2;
        // searchRange, entrySelector, rangeShift are derivable from
        // segCount and not used for lookup
        cursor.advance_by(6);
        let end_codes: Vec<u16> = cursor.read_vec(seg_count)?;
        let _reserved_pad: u16 = cursor.read()?;
        let start_codes = cursor.read_vec(seg_count)?;
        let id_deltas = cursor.read_vec(seg_count)?;
        let id_range_offsets = cursor.read_vec(seg_count)?;
        if !end_codes.windows(2).all(|pair| pair[0] <= pair[1]) {
            return Err(ReadError::MalformedData("cmap4 segments out of order"));
        }
        // the trailing glyph id array fills whatever the declared length
        // leaves after the header and segment arrays
        let glyph_id_count = (length as usize)
            .saturating_sub(cursor.position())
            / 2;
        let glyph_id_array = cursor.read_vec(glyph_id_count)?;
        Ok(Self {
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            glyph_id_array,
        })
    }

    pub fn glyph_index(&self, codepoint: u32) -> GlyphId {
        let Ok(codepoint) = u16::try_from(codepoint) else {
            return GlyphId::NOTDEF;
        };
        // first segment whose end code is >= the codepoint
        let segment = match self.end_codes.binary_search(&codepoint) {
            Ok(ix) => ix,
            Err(ix) => ix,
        };
        let (Some(&start), Some(&delta), Some(&range_offset)) = (
            self.start_codes.get(segment),
            self.id_deltas.get(segment),
            self.id_range_offsets.get(segment),
        ) else {
            return GlyphId::NOTDEF;
        };
        if codepoint < start {
            return GlyphId::NOTDEF;
        }
        if range_offset == 0 {
            return GlyphId::new(codepoint.wrapping_add(delta as u16));
        }
        // idRangeOffset is a byte offset from its own location in the
        // file; rebased onto the glyph id array that is the offset in
        // words, less the words remaining in the offset array itself
        let Some(ix) = (range_offset as usize / 2 + (codepoint - start) as usize)
            .checked_sub(self.id_range_offsets.len() - segment)
        else {
            return GlyphId::NOTDEF;
        };
        match self.glyph_id_array.get(ix) {
            Some(0) | None => GlyphId::NOTDEF,
            Some(gid) => GlyphId::new(gid.wrapping_add(delta as u16)),
        }
    }
}

/// [Format 6](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping):
/// a dense range of mappings starting at `first_code`.
pub struct Cmap6 {
    first_code: u16,
    glyph_ids: Vec<u16>,
}

impl Cmap6 {
    fn new(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(2); // format
        let _length: u16 = cursor.read()?;
        let _language: u16 = cursor.read()?;
        let first_code: u16 = cursor.read()?;
        let entry_count: u16 = cursor.read()?;
        let glyph_ids = cursor.read_vec(entry_count as usize)?;
        Ok(Self {
            first_code,
            glyph_ids,
        })
    }

    pub fn glyph_index(&self, codepoint: u32) -> GlyphId {
        codepoint
            .checked_sub(self.first_code as u32)
            .and_then(|ix| self.glyph_ids.get(ix as usize))
            .map(|gid| GlyphId::new(*gid))
            .unwrap_or_default()
    }
}

/// One contiguous run of codepoints in a format 12 subtable.
#[derive(Clone, Copy, Debug)]
struct SequentialMapGroup {
    start_char_code: u32,
    end_char_code: u32,
    start_glyph_id: u32,
}

/// [Format 12](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage):
/// segmented coverage of the full Unicode range.
pub struct Cmap12 {
    groups: Vec<SequentialMapGroup>,
}

impl Cmap12 {
    fn new(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(4); // format, reserved
        let _length: u32 = cursor.read()?;
        let _language: u32 = cursor.read()?;
        let num_groups: u32 = cursor.read()?;
        let mut groups = Vec::with_capacity(num_groups as usize);
        for _ in 0..num_groups {
            groups.push(SequentialMapGroup {
                start_char_code: cursor.read()?,
                end_char_code: cursor.read()?,
                start_glyph_id: cursor.read()?,
            });
        }
        if !groups
            .windows(2)
            .all(|pair| pair[0].end_char_code <= pair[1].end_char_code)
        {
            return Err(ReadError::MalformedData("cmap12 groups out of order"));
        }
        Ok(Self { groups })
    }

    pub fn glyph_index(&self, codepoint: u32) -> GlyphId {
        let group_ix = self
            .groups
            .partition_point(|group| group.end_char_code < codepoint);
        let Some(group) = self.groups.get(group_ix) else {
            return GlyphId::NOTDEF;
        };
        if codepoint < group.start_char_code {
            return GlyphId::NOTDEF;
        }
        let gid = (codepoint - group.start_char_code).wrapping_add(group.start_glyph_id);
        GlyphId::new(gid as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;
    use pretty_assertions::assert_eq;

    fn subtable(buf: &BeBuffer) -> CmapSubtable {
        CmapSubtable::new(FontData::new(buf)).unwrap()
    }

    fn format0() -> BeBuffer {
        let mut glyph_ids = [0u8; 256];
        for (codepoint, gid) in glyph_ids.iter_mut().enumerate() {
            *gid = codepoint as u8;
        }
        BeBuffer::new()
            .push(0u16) // format
            .push(262u16) // length
            .push(0u16) // language
            .extend(glyph_ids)
    }

    #[test]
    fn format0_is_identity() {
        let table = subtable(&format0());
        for codepoint in 0u32..256 {
            assert_eq!(table.glyph_index(codepoint), GlyphId::new(codepoint as u16));
        }
        assert_eq!(table.glyph_index(256), GlyphId::NOTDEF);
        assert_eq!(table.glyph_index(0x10000), GlyphId::NOTDEF);
    }

    /// Two mapped segments plus the required final 0xFFFF segment. The
    /// second segment routes through the glyph id array.
    fn format4() -> BeBuffer {
        let end_codes = [90u16, 0x3FF, 0xFFFF];
        let start_codes = [65u16, 0x3F0, 0xFFFF];
        let id_deltas = [-64i16, 0, 1];
        let id_range_offsets = [0u16, 4, 0];
        let glyph_id_array = [
            700u16, 701, 0, 703, 704, 705, 706, 707, 708, 709, 710, 711, 712, 713, 714, 715,
        ];
        let length = 16 + 8 * 3 + 2 * glyph_id_array.len() as u16;
        BeBuffer::new()
            .push(4u16) // format
            .push(length)
            .push(0u16) // language
            .push(6u16) // segCountX2
            .push(4u16) // searchRange
            .push(1u16) // entrySelector
            .push(2u16) // rangeShift
            .extend(end_codes)
            .push(0u16) // reservedPad
            .extend(start_codes)
            .extend(id_deltas)
            .extend(id_range_offsets)
            .extend(glyph_id_array)
    }

    #[test]
    fn format4_delta_segment() {
        let table = subtable(&format4());
        // 'A'..='Z' map via idDelta alone
        assert_eq!(table.glyph_index('A' as u32), GlyphId::new(1));
        assert_eq!(table.glyph_index('Z' as u32), GlyphId::new(26));
        assert_eq!(table.glyph_index(64), GlyphId::NOTDEF);
        assert_eq!(table.glyph_index(91), GlyphId::NOTDEF);
    }

    #[test]
    fn format4_range_offset_segment() {
        let table = subtable(&format4());
        // segment 1: idRangeOffset 4 bytes ahead of its own slot lands
        // at the start of the glyph id array
        assert_eq!(table.glyph_index(0x3F0), GlyphId::new(700));
        assert_eq!(table.glyph_index(0x3F1), GlyphId::new(701));
        // a zero entry in the glyph id array is the sentinel
        assert_eq!(table.glyph_index(0x3F2), GlyphId::NOTDEF);
        assert_eq!(table.glyph_index(0x3F3), GlyphId::new(703));
        assert_eq!(table.glyph_index(0x3FF), GlyphId::new(715));
    }

    #[test]
    fn format4_above_bmp() {
        let table = subtable(&format4());
        assert_eq!(table.glyph_index(0x10001), GlyphId::NOTDEF);
    }

    fn format6() -> BeBuffer {
        BeBuffer::new()
            .push(6u16) // format
            .push(18u16) // length
            .push(0u16) // language
            .push(0x20u16) // firstCode
            .push(3u16) // entryCount
            .extend([10u16, 0, 12])
    }

    #[test]
    fn format6_bounds() {
        let table = subtable(&format6());
        assert_eq!(table.glyph_index(0x1F), GlyphId::NOTDEF);
        assert_eq!(table.glyph_index(0x20), GlyphId::new(10));
        assert_eq!(table.glyph_index(0x21), GlyphId::NOTDEF);
        assert_eq!(table.glyph_index(0x22), GlyphId::new(12));
        assert_eq!(table.glyph_index(0x23), GlyphId::NOTDEF);
    }

    fn format12() -> BeBuffer {
        BeBuffer::new()
            .push(12u16) // format
            .push(0u16) // reserved
            .push(40u32) // length
            .push(0u32) // language
            .push(2u32) // numGroups
            .extend([0x41u32, 0x5A, 1]) // A..Z -> 1..26
            .extend([0x10000u32, 0x1000F, 500])
    }

    #[test]
    fn format12_group_lookup() {
        let table = subtable(&format12());
        assert_eq!(table.glyph_index(0x10000), GlyphId::new(500));
        assert_eq!(table.glyph_index(0x1000F), GlyphId::new(515));
        assert_eq!(table.glyph_index(0x10010), GlyphId::NOTDEF);
        assert_eq!(table.glyph_index(0x41), GlyphId::new(1));
        assert_eq!(table.glyph_index(0x40), GlyphId::NOTDEF);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let buf = BeBuffer::new().push(14u16).push(0u16);
        assert!(matches!(
            CmapSubtable::new(FontData::new(&buf)),
            Err(ReadError::UnsupportedFormat(14))
        ));
    }

    #[test]
    fn full_table_prefers_unicode() {
        // one macintosh format 0 table and one windows unicode format 4
        let f0 = format0();
        let f4 = format4();
        let mut header = BeBuffer::new()
            .push(0u16) // version
            .push(2u16) // numTables
            .push(1u16) // platform: macintosh
            .push(0u16)
            .push(0u32) // offset, patched below
            .push(3u16) // platform: windows
            .push(1u16) // encoding: unicode bmp
            .push(0u32); // offset, patched below
        let f0_offset = header.len() as u32;
        header.write_at(8, f0_offset);
        header.write_at(16, f0_offset + f0.len() as u32);
        let data: Vec<u8> = header
            .iter()
            .chain(f0.iter())
            .chain(f4.iter())
            .copied()
            .collect();
        let cmap = Cmap::new(&data).unwrap();
        assert_eq!(cmap.encoding_records().count(), 2);
        // 'A' maps in both; the unicode table wins
        assert_eq!(cmap.map_codepoint('A'), GlyphId::new(1));
        // 0x80 only maps in the macintosh table
        assert_eq!(cmap.map_codepoint(0x80u32), GlyphId::new(0x80));
        assert_eq!(cmap.map_codepoint(0x2603u32), GlyphId::NOTDEF);
    }
}
