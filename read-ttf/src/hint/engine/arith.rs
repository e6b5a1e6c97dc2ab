//! Arithmetic instructions.
//!
//! Operands are treated as 26.6 fixed point values; overflow saturates
//! rather than wrapping.

use ttf_types::F26Dot6;

use super::super::error::HintErrorKind;
use super::{Engine, OpResult};

impl Engine<'_> {
    /// ADD[] (0x60)
    pub(super) fn op_add(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| {
            Ok((F26Dot6::from_bits(a) + F26Dot6::from_bits(b)).to_bits())
        })
    }

    /// SUB[] (0x61)
    pub(super) fn op_sub(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| {
            Ok((F26Dot6::from_bits(a) - F26Dot6::from_bits(b)).to_bits())
        })
    }

    /// DIV[] (0x62)
    ///
    /// 26.6 division; a zero divisor faults before the stack is touched.
    pub(super) fn op_div(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| {
            if b == 0 {
                return Err(HintErrorKind::DivideByZero);
            }
            Ok((F26Dot6::from_bits(a) / F26Dot6::from_bits(b)).to_bits())
        })
    }

    /// MUL[] (0x63)
    pub(super) fn op_mul(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| {
            Ok((F26Dot6::from_bits(a) * F26Dot6::from_bits(b)).to_bits())
        })
    }

    /// ABS[] (0x64)
    pub(super) fn op_abs(&mut self) -> OpResult {
        self.value_stack
            .apply_unary(|a| Ok(F26Dot6::from_bits(a).abs().to_bits()))
    }

    /// NEG[] (0x65)
    pub(super) fn op_neg(&mut self) -> OpResult {
        self.value_stack
            .apply_unary(|a| Ok((-F26Dot6::from_bits(a)).to_bits()))
    }

    /// FLOOR[] (0x66)
    pub(super) fn op_floor(&mut self) -> OpResult {
        self.value_stack
            .apply_unary(|a| Ok(F26Dot6::from_bits(a).floor().to_bits()))
    }

    /// CEILING[] (0x67)
    pub(super) fn op_ceiling(&mut self) -> OpResult {
        self.value_stack
            .apply_unary(|a| Ok(F26Dot6::from_bits(a).ceil().to_bits()))
    }

    /// MAX[] (0x8B)
    pub(super) fn op_max(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok(a.max(b)))
    }

    /// MIN[] (0x8C)
    pub(super) fn op_min(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok(a.min(b)))
    }
}
