//! Comparison and logic instructions.
//!
//! Results are pushed as 1 for true and 0 for false; any nonzero input
//! counts as true.

use ttf_types::F26Dot6;

use super::{Engine, OpResult};

impl Engine<'_> {
    /// LT[] (0x50)
    pub(super) fn op_lt(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok((a < b) as i32))
    }

    /// LTEQ[] (0x51)
    pub(super) fn op_lteq(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok((a <= b) as i32))
    }

    /// GT[] (0x52)
    pub(super) fn op_gt(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok((a > b) as i32))
    }

    /// GTEQ[] (0x53)
    pub(super) fn op_gteq(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok((a >= b) as i32))
    }

    /// EQ[] (0x54)
    pub(super) fn op_eq(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok((a == b) as i32))
    }

    /// NEQ[] (0x55)
    pub(super) fn op_neq(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok((a != b) as i32))
    }

    /// ODD[] (0x56)
    ///
    /// Rounds the 26.6 value per the current round mode, then tests
    /// whether the result is exactly an odd integer.
    pub(super) fn op_odd(&mut self) -> OpResult {
        self.op_parity(64)
    }

    /// EVEN[] (0x57)
    pub(super) fn op_even(&mut self) -> OpResult {
        self.op_parity(0)
    }

    fn op_parity(&mut self, low_bits: i32) -> OpResult {
        let mode = self.graphics.round_mode;
        self.value_stack.apply_unary(|a| {
            let rounded = mode.round(F26Dot6::from_bits(a)).to_bits();
            Ok((rounded & 127 == low_bits) as i32)
        })
    }

    /// AND[] (0x5A)
    pub(super) fn op_and(&mut self) -> OpResult {
        self.value_stack
            .apply_binary(|a, b| Ok((a != 0 && b != 0) as i32))
    }

    /// OR[] (0x5B)
    pub(super) fn op_or(&mut self) -> OpResult {
        self.value_stack
            .apply_binary(|a, b| Ok((a != 0 || b != 0) as i32))
    }

    /// NOT[] (0x5C)
    pub(super) fn op_not(&mut self) -> OpResult {
        self.value_stack.apply_unary(|a| Ok((a == 0) as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::graphics::RoundMode;
    use super::*;

    fn compare(op: fn(&mut Engine<'static>) -> OpResult, a: i32, b: i32) -> i32 {
        let mut engine = Engine::new(&[]);
        engine.value_stack.push(a).unwrap();
        engine.value_stack.push(b).unwrap();
        op(&mut engine).unwrap();
        engine.value_stack.pop().unwrap()
    }

    #[test]
    fn comparisons() {
        assert_eq!(compare(Engine::op_lt, 1, 2), 1);
        assert_eq!(compare(Engine::op_lt, 2, 2), 0);
        assert_eq!(compare(Engine::op_lteq, 2, 2), 1);
        assert_eq!(compare(Engine::op_gt, 3, 2), 1);
        assert_eq!(compare(Engine::op_gteq, 2, 3), 0);
        assert_eq!(compare(Engine::op_eq, -5, -5), 1);
        assert_eq!(compare(Engine::op_neq, -5, -5), 0);
    }

    #[test]
    fn boolean_ops() {
        assert_eq!(compare(Engine::op_and, 3, -1), 1);
        assert_eq!(compare(Engine::op_and, 3, 0), 0);
        assert_eq!(compare(Engine::op_or, 0, 7), 1);
        assert_eq!(compare(Engine::op_or, 0, 0), 0);
        let mut engine = Engine::new(&[]);
        engine.value_stack.push(0).unwrap();
        engine.op_not().unwrap();
        assert_eq!(engine.stack_values(), &[1]);
    }

    #[test]
    fn parity_rounds_first() {
        let mut engine = Engine::new(&[]);
        // 2.5 rounds to 3.0 under the default grid mode, which is odd
        engine.value_stack.push(160).unwrap();
        engine.op_odd().unwrap();
        assert_eq!(engine.stack_values(), &[1]);
        engine.op_clear().unwrap();
        // with rounding off, 2.5 is not an integer at all
        engine.graphics.round_mode = RoundMode::Off;
        engine.value_stack.push(160).unwrap();
        engine.op_odd().unwrap();
        assert_eq!(engine.stack_values(), &[0]);
        engine.op_clear().unwrap();
        engine.value_stack.push(128).unwrap();
        engine.op_even().unwrap();
        assert_eq!(engine.stack_values(), &[1]);
    }
}
