//! Stack manipulation instructions.

use super::super::code::Arguments;
use super::{Engine, OpResult};

impl Engine<'_> {
    /// DUP[] (0x20)
    ///
    /// Duplicates the top stack element.
    pub(super) fn op_dup(&mut self) -> OpResult {
        self.value_stack.dup()
    }

    /// POP[] (0x21)
    pub(super) fn op_pop(&mut self) -> OpResult {
        self.value_stack.pop().map(|_| ())
    }

    /// CLEAR[] (0x22)
    ///
    /// Empties the entire stack.
    pub(super) fn op_clear(&mut self) -> OpResult {
        self.value_stack.clear();
        Ok(())
    }

    /// SWAP[] (0x23)
    pub(super) fn op_swap(&mut self) -> OpResult {
        self.value_stack.swap()
    }

    /// DEPTH[] (0x24)
    ///
    /// Pushes the number of elements currently on the stack.
    pub(super) fn op_depth(&mut self) -> OpResult {
        let depth = self.value_stack.len() as i32;
        self.value_stack.push(depth)
    }

    /// CINDEX[] (0x25)
    pub(super) fn op_cindex(&mut self) -> OpResult {
        self.value_stack.copy_index()
    }

    /// MINDEX[] (0x26)
    pub(super) fn op_mindex(&mut self) -> OpResult {
        self.value_stack.move_index()
    }

    /// ROLL[] (0x8A)
    pub(super) fn op_roll(&mut self) -> OpResult {
        self.value_stack.roll()
    }

    /// NPUSHB[], NPUSHW[] and the PUSHB[abc]/PUSHW[abc] families.
    pub(super) fn op_push(&mut self, args: &Arguments) -> OpResult {
        self.value_stack.push_args(args)
    }
}
