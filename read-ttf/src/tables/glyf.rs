//! The [glyf](https://learn.microsoft.com/en-us/typography/opentype/spec/glyf) table
//!
//! Glyph outlines, stored either as a simple glyph (contours of points
//! with delta-coded coordinates) or a composite glyph assembled from
//! transformed references to other glyphs.

use std::ops::Range;

use ttf_types::{BoundingBox, F2Dot14, GlyphId};

use crate::decycler::{Decycler, DecyclerError};
use crate::tables::loca::GlyphLocations;
use crate::{Cursor, FontData, ReadError};

/// Maximum nesting depth for composite glyphs.
///
/// Matches the FreeType default; fonts in practice nest two or three
/// levels deep.
pub const MAX_COMPOSITE_DEPTH: usize = 8;

// Simple glyph flags.
const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: u8 = 0x20;

// Composite glyph flags.
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// One point on a glyph contour, in font design units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlyphPoint {
    pub x: i16,
    pub y: i16,
    /// `false` for quadratic control points.
    pub on_curve: bool,
}

/// An ordered, cyclically closed sequence of points.
pub type Contour = Vec<GlyphPoint>;

/// A decoded glyph outline.
///
/// For composite glyphs the contours are fully resolved: every
/// component has been decoded, transformed and appended.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Glyph {
    /// Extents from the glyph header, in design units.
    pub bounding_box: BoundingBox<i16>,
    pub contours: Vec<Contour>,
}

impl Glyph {
    /// Iterator over the points of all contours, in order.
    pub fn points(&self) -> impl Iterator<Item = &GlyphPoint> {
        self.contours.iter().flatten()
    }
}

/// The 2x2 transform coefficients of a composite component.
///
/// Maps `(x, y)` to `(xx*x + xy*y, yx*x + yy*y)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transform {
    pub xx: F2Dot14,
    pub yx: F2Dot14,
    pub xy: F2Dot14,
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::ONE,
            yx: F2Dot14::ZERO,
            xy: F2Dot14::ZERO,
            yy: F2Dot14::ONE,
        }
    }
}

/// How a component is positioned relative to its parent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Anchor {
    /// A translation in design units.
    Offset { x: i16, y: i16 },
    /// Aligns a numbered point of the already assembled parent outline
    /// with a numbered point of the component.
    Point { base: u16, component: u16 },
}

/// One component record of a composite glyph.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Component {
    pub glyph_id: GlyphId,
    pub anchor: Anchor,
    pub transform: Transform,
}

/// The glyph outline table.
#[derive(Clone, Copy)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

type GlyphDecycler = Decycler<GlyphId, MAX_COMPOSITE_DEPTH>;

impl<'a> Glyf<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: FontData::new(data),
        }
    }

    fn glyph_data(&self, range: Range<usize>) -> Result<FontData<'a>, ReadError> {
        let start = range.start;
        self.data
            .slice(range)
            .ok_or(ReadError::InsufficientData(start))
    }

    /// True if the glyph record in the given range is a composite glyph.
    ///
    /// An empty range (a glyph with no outline) is not composite.
    pub fn is_composite(&self, range: Range<usize>) -> Result<bool, ReadError> {
        if range.is_empty() {
            return Ok(false);
        }
        Ok(self.glyph_data(range)?.read_at::<i16>(0)? < 0)
    }

    /// The bounding box from the glyph header, without decoding the
    /// outline. An empty range yields an empty box.
    pub fn bounding_box(&self, range: Range<usize>) -> Result<BoundingBox<i16>, ReadError> {
        if range.is_empty() {
            return Ok(BoundingBox::default());
        }
        let data = self.glyph_data(range)?;
        Ok(BoundingBox {
            x_min: data.read_at(2)?,
            y_min: data.read_at(4)?,
            x_max: data.read_at(6)?,
            y_max: data.read_at(8)?,
        })
    }

    /// The hinting instructions of a simple glyph, uninterpreted.
    ///
    /// Composite glyphs carry their instructions after the component
    /// records, which we do not expose.
    pub fn instructions(&self, range: Range<usize>) -> Result<&'a [u8], ReadError> {
        if range.is_empty() {
            return Ok(&[]);
        }
        let data = self.glyph_data(range)?;
        let mut cursor = data.cursor();
        let num_contours: i16 = cursor.read()?;
        if num_contours < 0 {
            return Err(ReadError::UnsupportedFeature(
                "instructions of a composite glyph",
            ));
        }
        cursor.advance_by(8 + num_contours as usize * 2);
        let len: u16 = cursor.read()?;
        let start = cursor.position();
        data.slice(start..start + len as usize)
            .map(|data| data.as_bytes())
            .ok_or(ReadError::InsufficientData(start))
    }

    /// Decode the glyph record in the given range.
    ///
    /// Composite components are resolved through `locations` and
    /// decoded recursively; the result always contains plain contours.
    /// An empty range means the glyph has no outline and yields `None`.
    pub fn glyph(
        &self,
        range: Range<usize>,
        locations: &impl GlyphLocations,
    ) -> Result<Option<Glyph>, ReadError> {
        if range.is_empty() {
            return Ok(None);
        }
        let mut decycler = GlyphDecycler::new();
        self.glyph_impl(range, locations, &mut decycler).map(Some)
    }

    fn glyph_impl(
        &self,
        range: Range<usize>,
        locations: &impl GlyphLocations,
        decycler: &mut GlyphDecycler,
    ) -> Result<Glyph, ReadError> {
        let data = self.glyph_data(range)?;
        let mut cursor = data.cursor();
        let num_contours: i16 = cursor.read()?;
        let bounding_box = BoundingBox {
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        };
        if num_contours < 0 {
            self.composite_glyph(cursor, bounding_box, locations, decycler)
        } else {
            simple_glyph(cursor, bounding_box, num_contours as usize)
        }
    }

    fn composite_glyph(
        &self,
        mut cursor: Cursor<'a>,
        bounding_box: BoundingBox<i16>,
        locations: &impl GlyphLocations,
        decycler: &mut GlyphDecycler,
    ) -> Result<Glyph, ReadError> {
        let mut contours: Vec<Contour> = Vec::new();
        loop {
            let (component, more) = read_component(&mut cursor)?;
            let child_range = locations.range(component.glyph_id)?;
            let child = if child_range.is_empty() {
                Glyph::default()
            } else {
                let mut guard = decycler.enter(component.glyph_id).map_err(|err| match err {
                    DecyclerError::CycleDetected => {
                        ReadError::CompositeCycleDetected(component.glyph_id)
                    }
                    DecyclerError::DepthLimitExceeded => ReadError::RecursionLimitExceeded,
                })?;
                self.glyph_impl(child_range, locations, &mut guard)?
            };
            append_component(&mut contours, &component, &child)?;
            if !more {
                break;
            }
        }
        Ok(Glyph {
            bounding_box,
            contours,
        })
    }
}

fn simple_glyph(
    mut cursor: Cursor,
    bounding_box: BoundingBox<i16>,
    num_contours: usize,
) -> Result<Glyph, ReadError> {
    let end_points: Vec<u16> = cursor.read_vec(num_contours)?;
    let instruction_len: u16 = cursor.read()?;
    cursor.advance_by(instruction_len as usize);
    let num_points = match end_points.last() {
        Some(last) => *last as usize + 1,
        None => return Ok(Glyph::default()),
    };
    // flags, with run length expansion
    let mut flags: Vec<u8> = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag: u8 = cursor.read()?;
        flags.push(flag);
        if flag & REPEAT_FLAG != 0 {
            let count: u8 = cursor.read()?;
            for _ in 0..count {
                flags.push(flag);
            }
        }
    }
    if flags.len() != num_points {
        return Err(ReadError::MalformedData(
            "expanded flag count exceeds point count",
        ));
    }
    let mut points: Vec<GlyphPoint> = flags
        .iter()
        .map(|flag| GlyphPoint {
            x: 0,
            y: 0,
            on_curve: flag & ON_CURVE_POINT != 0,
        })
        .collect();
    // x and y coordinates are two independent delta-coded passes over
    // the same flags
    let mut x = 0i32;
    for (point, flag) in points.iter_mut().zip(&flags) {
        x += read_coord_delta(
            &mut cursor,
            *flag,
            X_SHORT_VECTOR,
            X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        )?;
        point.x = x as i16;
    }
    let mut y = 0i32;
    for (point, flag) in points.iter_mut().zip(&flags) {
        y += read_coord_delta(
            &mut cursor,
            *flag,
            Y_SHORT_VECTOR,
            Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        )?;
        point.y = y as i16;
    }
    // partition the flat point list into contours
    let mut contours = Vec::with_capacity(num_contours);
    let mut start = 0usize;
    for end in end_points {
        let end = end as usize + 1;
        if end < start {
            return Err(ReadError::MalformedData("contour end points out of order"));
        }
        let contour = points
            .get(start..end)
            .ok_or(ReadError::MalformedData("contour end point out of bounds"))?;
        contours.push(contour.to_vec());
        start = end;
    }
    Ok(Glyph {
        bounding_box,
        contours,
    })
}

fn read_coord_delta(
    cursor: &mut Cursor,
    flag: u8,
    short_bit: u8,
    same_or_positive_bit: u8,
) -> Result<i32, ReadError> {
    if flag & short_bit != 0 {
        let magnitude = cursor.read::<u8>()? as i32;
        if flag & same_or_positive_bit != 0 {
            Ok(magnitude)
        } else {
            Ok(-magnitude)
        }
    } else if flag & same_or_positive_bit != 0 {
        Ok(0)
    } else {
        Ok(cursor.read::<i16>()? as i32)
    }
}

fn read_component(cursor: &mut Cursor) -> Result<(Component, bool), ReadError> {
    let flags: u16 = cursor.read()?;
    let glyph_id: GlyphId = cursor.read()?;
    let words = flags & ARG_1_AND_2_ARE_WORDS != 0;
    let anchor = if flags & ARGS_ARE_XY_VALUES != 0 {
        let (x, y) = if words {
            (cursor.read::<i16>()?, cursor.read::<i16>()?)
        } else {
            (cursor.read::<i8>()? as i16, cursor.read::<i8>()? as i16)
        };
        Anchor::Offset { x, y }
    } else {
        let (base, component) = if words {
            (cursor.read::<u16>()?, cursor.read::<u16>()?)
        } else {
            (cursor.read::<u8>()? as u16, cursor.read::<u8>()? as u16)
        };
        Anchor::Point { base, component }
    };
    let mut transform = Transform::default();
    if flags & WE_HAVE_A_SCALE != 0 {
        let scale: F2Dot14 = cursor.read()?;
        transform.xx = scale;
        transform.yy = scale;
    } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
        transform.xx = cursor.read()?;
        transform.yy = cursor.read()?;
    } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
        transform.xx = cursor.read()?;
        transform.yx = cursor.read()?;
        transform.xy = cursor.read()?;
        transform.yy = cursor.read()?;
    }
    Ok((
        Component {
            glyph_id,
            anchor,
            transform,
        },
        flags & MORE_COMPONENTS != 0,
    ))
}

/// Transform the child outline per the component record and append its
/// contours to the parent.
fn append_component(
    contours: &mut Vec<Contour>,
    component: &Component,
    child: &Glyph,
) -> Result<(), ReadError> {
    let a = component.transform.xx.to_f32();
    let b = component.transform.yx.to_f32();
    let c = component.transform.xy.to_f32();
    let d = component.transform.yy.to_f32();
    // scale normalization factors; when the x and y magnitudes are
    // nearly equal the factor is doubled, which preserves precision for
    // the common reflection/rotation matrices
    const NEARLY_EQUAL: f32 = 33.0 / 65536.0;
    let mut m = a.abs().max(b.abs());
    if (a.abs() - c.abs()).abs() <= NEARLY_EQUAL {
        m *= 2.0;
    }
    let mut n = c.abs().max(d.abs());
    if (b.abs() - d.abs()).abs() <= NEARLY_EQUAL {
        n *= 2.0;
    }
    // degenerate matrices collapse an axis to zero; avoid dividing by it
    if m == 0.0 {
        m = 1.0;
    }
    if n == 0.0 {
        n = 1.0;
    }
    let apply = |point: &GlyphPoint| -> (f32, f32) {
        let (x, y) = (point.x as f32, point.y as f32);
        (m * (a / m * x + c / m * y), n * (b / n * x + d / n * y))
    };
    let (dx, dy) = match component.anchor {
        Anchor::Offset { x, y } => (m * x as f32, n * y as f32),
        Anchor::Point { base, component } => {
            let parent_point = contours
                .iter()
                .flatten()
                .nth(base as usize)
                .ok_or(ReadError::MalformedData("anchor point not in parent"))?;
            let child_point = child
                .points()
                .nth(component as usize)
                .ok_or(ReadError::MalformedData("anchor point not in component"))?;
            let (cx, cy) = apply(child_point);
            (parent_point.x as f32 - cx, parent_point.y as f32 - cy)
        }
    };
    for contour in &child.contours {
        contours.push(
            contour
                .iter()
                .map(|point| {
                    let (x, y) = apply(point);
                    GlyphPoint {
                        x: (x + dx).round() as i16,
                        y: (y + dy).round() as i16,
                        on_curve: point.on_curve,
                    }
                })
                .collect(),
        );
    }
    Ok(())
}
