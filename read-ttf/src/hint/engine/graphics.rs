//! Instructions that read or write the graphics state.

use ttf_types::{F26Dot6, F2Dot14, Point};

use super::super::error::HintErrorKind;
use super::super::graphics::{RoundMode, ScanControl, ZonePointer};
use super::{Engine, OpResult};

impl Engine<'_> {
    /// SVTCA[a] (0x00 - 0x01), SPVTCA[a] (0x02 - 0x03) and
    /// SFVTCA[a] (0x04 - 0x05)
    ///
    /// Sets the projection and/or freedom vector to a coordinate axis;
    /// the low opcode bit selects x, its absence y.
    pub(super) fn op_svtca(&mut self, opcode: u8) -> OpResult {
        let x = ((opcode & 1) as i16) << 14;
        let y = x ^ 0x4000;
        let vector = Point::new(F2Dot14::from_bits(x), F2Dot14::from_bits(y));
        if opcode < 4 {
            self.graphics.projection_vector = vector;
        }
        if opcode & 2 == 0 {
            self.graphics.freedom_vector = vector;
        }
        Ok(())
    }

    /// SPVFS[] (0x0A)
    pub(super) fn op_spvfs(&mut self) -> OpResult {
        self.graphics.projection_vector = self.pop_vector()?;
        Ok(())
    }

    /// SFVFS[] (0x0B)
    pub(super) fn op_sfvfs(&mut self) -> OpResult {
        self.graphics.freedom_vector = self.pop_vector()?;
        Ok(())
    }

    /// GPV[] (0x0C)
    pub(super) fn op_gpv(&mut self) -> OpResult {
        self.push_vector(self.graphics.projection_vector)
    }

    /// GFV[] (0x0D)
    pub(super) fn op_gfv(&mut self) -> OpResult {
        self.push_vector(self.graphics.freedom_vector)
    }

    /// SFVTPV[] (0x0E)
    pub(super) fn op_sfvtpv(&mut self) -> OpResult {
        self.graphics.freedom_vector = self.graphics.projection_vector;
        Ok(())
    }

    fn pop_vector(&mut self) -> Result<Point<F2Dot14>, HintErrorKind> {
        let (y, x) = self.value_stack.pop_pair()?;
        Ok(Point::new(
            F2Dot14::from_bits(x as i16),
            F2Dot14::from_bits(y as i16),
        ))
    }

    fn push_vector(&mut self, vector: Point<F2Dot14>) -> OpResult {
        self.value_stack.push(vector.x.to_bits() as i32)?;
        self.value_stack.push(vector.y.to_bits() as i32)
    }

    /// SRP0[] (0x10), SRP1[] (0x11) and SRP2[] (0x12)
    pub(super) fn op_srp(&mut self, opcode: u8) -> OpResult {
        let point = self.value_stack.pop_usize()?;
        match opcode & 3 {
            0 => self.graphics.rp0 = point,
            1 => self.graphics.rp1 = point,
            _ => self.graphics.rp2 = point,
        }
        Ok(())
    }

    /// SZP0[] (0x13), SZP1[] (0x14), SZP2[] (0x15) and SZPS[] (0x16)
    pub(super) fn op_szp(&mut self, opcode: u8) -> OpResult {
        let zone = ZonePointer::try_from(self.value_stack.pop()?)?;
        match opcode & 7 {
            3 => self.graphics.zp0 = zone,
            4 => self.graphics.zp1 = zone,
            5 => self.graphics.zp2 = zone,
            _ => {
                self.graphics.zp0 = zone;
                self.graphics.zp1 = zone;
                self.graphics.zp2 = zone;
            }
        }
        Ok(())
    }

    /// SLOOP[] (0x17)
    pub(super) fn op_sloop(&mut self) -> OpResult {
        let count = self.value_stack.pop()?;
        if count < 0 {
            return Err(HintErrorKind::NegativeLoopCounter);
        }
        self.graphics.loop_counter = count as u32;
        Ok(())
    }

    /// RTG[] (0x18), RTHG[] (0x19), RTDG[] (0x3D), ROFF[] (0x7A),
    /// RUTG[] (0x7C) and RDTG[] (0x7D)
    pub(super) fn op_round_mode(&mut self, mode: RoundMode) -> OpResult {
        self.graphics.round_mode = mode;
        Ok(())
    }

    /// SMD[] (0x1A)
    pub(super) fn op_smd(&mut self) -> OpResult {
        self.graphics.min_distance = F26Dot6::from_bits(self.value_stack.pop()?);
        Ok(())
    }

    /// SCVTCI[] (0x1D)
    pub(super) fn op_scvtci(&mut self) -> OpResult {
        self.graphics.control_value_cutin = F26Dot6::from_bits(self.value_stack.pop()?);
        Ok(())
    }

    /// SSWCI[] (0x1E)
    pub(super) fn op_sswci(&mut self) -> OpResult {
        self.graphics.single_width_cutin = F26Dot6::from_bits(self.value_stack.pop()?);
        Ok(())
    }

    /// SSW[] (0x1F)
    pub(super) fn op_ssw(&mut self) -> OpResult {
        self.graphics.single_width = F26Dot6::from_bits(self.value_stack.pop()?);
        Ok(())
    }

    /// MPPEM[] (0x4B)
    pub(super) fn op_mppem(&mut self) -> OpResult {
        self.value_stack.push(self.ppem as i32)
    }

    /// FLIPON[] (0x4D) and FLIPOFF[] (0x4E)
    pub(super) fn op_flip(&mut self, state: bool) -> OpResult {
        self.graphics.auto_flip = state;
        Ok(())
    }

    /// SDB[] (0x5E)
    pub(super) fn op_sdb(&mut self) -> OpResult {
        self.graphics.delta_base = self.value_stack.pop()? as u16;
        Ok(())
    }

    /// SDS[] (0x5F)
    pub(super) fn op_sds(&mut self) -> OpResult {
        self.graphics.delta_shift = self.value_stack.pop()? as u16;
        Ok(())
    }

    /// ROUND[ab] (0x68 - 0x6B)
    ///
    /// Rounds the top value per the current round mode. Engine
    /// compensation for the distance color is not applied.
    pub(super) fn op_round(&mut self) -> OpResult {
        let mode = self.graphics.round_mode;
        self.value_stack
            .apply_unary(|a| Ok(mode.round(F26Dot6::from_bits(a)).to_bits()))
    }

    /// NROUND[ab] (0x6C - 0x6F)
    pub(super) fn op_nround(&mut self) -> OpResult {
        Ok(())
    }

    /// SCANCTRL[] (0x85)
    pub(super) fn op_scanctrl(&mut self) -> OpResult {
        self.graphics.scan_control = ScanControl::from_word(self.value_stack.pop()?);
        Ok(())
    }

    /// SCANTYPE[] (0x8D)
    pub(super) fn op_scantype(&mut self) -> OpResult {
        self.graphics.scan_type = self.value_stack.pop()?;
        Ok(())
    }

    /// DEBUG[] (0x4F), SANGW[] (0x7E) and AA[] (0x7F)
    ///
    /// Obsolete instructions that pop and discard their argument.
    pub(super) fn op_discard(&mut self) -> OpResult {
        self.value_stack.pop().map(|_| ())
    }
}
