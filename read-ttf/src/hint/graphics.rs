//! Graphics state for the TrueType interpreter.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_graphics_state>

use ttf_types::{F26Dot6, F2Dot14, Point};

use super::error::HintErrorKind;

/// Distance rounding strategies.
///
/// All strategies are symmetric around zero, with the rounded magnitude
/// clamped so a distance never crosses to the other side of zero.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum RoundMode {
    /// Rounds to the nearest grid line.
    #[default]
    Grid,
    /// Rounds to the nearest half grid line.
    HalfGrid,
    /// Rounds to the nearest half or full grid line.
    DoubleGrid,
    /// Rounds down to the previous grid line.
    DownToGrid,
    /// Rounds up to the next grid line.
    UpToGrid,
    /// No rounding.
    Off,
}

// 26.6 grid helpers
fn floor64(x: i32) -> i32 {
    x & !63
}

fn round64(x: i32) -> i32 {
    x.wrapping_add(32) & !63
}

fn ceil64(x: i32) -> i32 {
    x.wrapping_add(63) & !63
}

fn round32(x: i32) -> i32 {
    x.wrapping_add(16) & !31
}

impl RoundMode {
    pub fn round(&self, distance: F26Dot6) -> F26Dot6 {
        let d = distance.to_bits();
        let rounded = if d >= 0 {
            let r = match self {
                Self::Grid => round64(d),
                Self::HalfGrid => floor64(d) + 32,
                Self::DoubleGrid => round32(d),
                Self::DownToGrid => floor64(d),
                Self::UpToGrid => ceil64(d),
                Self::Off => d,
            };
            r.max(0)
        } else {
            let r = match self {
                Self::Grid => -round64(-d),
                Self::HalfGrid => -(floor64(-d) + 32),
                Self::DoubleGrid => -round32(-d),
                Self::DownToGrid => -floor64(-d),
                Self::UpToGrid => -ceil64(-d),
                Self::Off => d,
            };
            r.min(0)
        };
        F26Dot6::from_bits(rounded)
    }
}

/// Reference to one of the two point zones.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum ZonePointer {
    /// Zone 0, the scratch points owned by the font program.
    Twilight = 0,
    /// Zone 1, the points of the glyph being hinted.
    #[default]
    Glyph = 1,
}

impl TryFrom<i32> for ZonePointer {
    type Error = HintErrorKind;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Twilight),
            1 => Ok(Self::Glyph),
            _ => Err(HintErrorKind::InvalidZoneIndex(value)),
        }
    }
}

/// Dropout scan conversion rules, decoded from SCANCTRL's packed word.
///
/// The low byte is a ppem threshold (0xFF means every size); the flag
/// bits select which conditions enable or veto dropout control.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct ScanControl {
    ppem_threshold: u8,
    set_if_under_threshold: bool,
    set_if_rotated: bool,
    set_if_stretched: bool,
    clear_unless_under_threshold: bool,
    clear_unless_rotated: bool,
    clear_unless_stretched: bool,
}

impl ScanControl {
    pub fn from_word(value: i32) -> Self {
        Self {
            ppem_threshold: (value & 0xFF) as u8,
            set_if_under_threshold: value & 0x100 != 0,
            set_if_rotated: value & 0x200 != 0,
            set_if_stretched: value & 0x400 != 0,
            clear_unless_under_threshold: value & 0x800 != 0,
            clear_unless_rotated: value & 0x1000 != 0,
            clear_unless_stretched: value & 0x2000 != 0,
        }
    }

    /// Whether dropout control is in effect for the given rendering
    /// conditions. Veto rules win over enable rules.
    pub fn evaluate(&self, ppem: u32, is_rotated: bool, is_stretched: bool) -> bool {
        let under_threshold =
            self.ppem_threshold == 0xFF || ppem <= self.ppem_threshold as u32;
        if self.clear_unless_rotated && !is_rotated {
            return false;
        }
        if self.clear_unless_stretched && !is_stretched {
            return false;
        }
        if self.clear_unless_under_threshold && !under_threshold {
            return false;
        }
        (self.set_if_under_threshold && under_threshold)
            || (self.set_if_rotated && is_rotated)
            || (self.set_if_stretched && is_stretched)
    }
}

/// The mutable state the interpreter executes against.
///
/// One instance exists per hinting run and is default constructed with
/// the documented initial values.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GraphicsState {
    /// Automatically flip the on-curve state of contour intersections.
    pub auto_flip: bool,
    /// Limit for interpreting a control value table entry, in 26.6.
    pub control_value_cutin: F26Dot6,
    /// Exponent base for delta instruction ppem ranges.
    pub delta_base: u16,
    /// Magnitude shift for delta instruction adjustments.
    pub delta_shift: u16,
    /// Direction along which points are moved, a 2.14 unit vector.
    pub freedom_vector: Point<F2Dot14>,
    /// Direction along which distances are measured, a 2.14 unit vector.
    pub projection_vector: Point<F2Dot14>,
    /// Number of points affected by the looped point instructions.
    pub loop_counter: u32,
    /// Minimum distance between hinted points, in 26.6.
    pub min_distance: F26Dot6,
    pub round_mode: RoundMode,
    /// Reference point indices.
    pub rp0: usize,
    pub rp1: usize,
    pub rp2: usize,
    pub scan_control: ScanControl,
    /// Scan conversion mode set by SCANTYPE.
    pub scan_type: i32,
    /// Substitute width for distances inside the single width cut-in.
    pub single_width: F26Dot6,
    pub single_width_cutin: F26Dot6,
    /// Zone pointers.
    pub zp0: ZonePointer,
    pub zp1: ZonePointer,
    pub zp2: ZonePointer,
}

/// A 2.14 unit vector along the x axis.
const AXIS_X: Point<F2Dot14> = Point::new(F2Dot14::ONE, F2Dot14::ZERO);

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            auto_flip: true,
            // 17/16 pixel
            control_value_cutin: F26Dot6::from_bits(68),
            delta_base: 9,
            delta_shift: 3,
            freedom_vector: AXIS_X,
            projection_vector: AXIS_X,
            loop_counter: 1,
            min_distance: F26Dot6::ONE,
            round_mode: RoundMode::default(),
            rp0: 0,
            rp1: 0,
            rp2: 0,
            scan_control: ScanControl::default(),
            scan_type: 0,
            single_width: F26Dot6::ZERO,
            single_width_cutin: F26Dot6::ZERO,
            zp0: ZonePointer::Glyph,
            zp1: ZonePointer::Glyph,
            zp2: ZonePointer::Glyph,
        }
    }
}

impl GraphicsState {
    /// Round a distance per the current rounding mode.
    pub fn round(&self, distance: F26Dot6) -> F26Dot6 {
        self.round_mode.round(distance)
    }
}
