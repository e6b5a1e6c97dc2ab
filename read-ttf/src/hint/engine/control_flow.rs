//! Jumps, function definitions and calls.

use super::super::call_stack::CallRecord;
use super::super::code::{opcodes, CodeDefinition, Decoder};
use super::super::error::HintErrorKind;
use super::{Engine, OpResult};

impl Engine<'_> {
    /// JMPR[] (0x1C)
    pub(super) fn op_jmpr(&mut self, decoder: &mut Decoder) -> OpResult {
        let offset = self.value_stack.pop()?;
        self.do_jump(decoder, offset)
    }

    /// JROT[] (0x78)
    pub(super) fn op_jrot(&mut self, decoder: &mut Decoder) -> OpResult {
        let (condition, offset) = self.pop_jump_args()?;
        if condition != 0 {
            self.do_jump(decoder, offset)
        } else {
            Ok(())
        }
    }

    /// JROF[] (0x79)
    pub(super) fn op_jrof(&mut self, decoder: &mut Decoder) -> OpResult {
        let (condition, offset) = self.pop_jump_args()?;
        if condition == 0 {
            self.do_jump(decoder, offset)
        } else {
            Ok(())
        }
    }

    fn pop_jump_args(&mut self) -> Result<(i32, i32), HintErrorKind> {
        self.value_stack.pop_pair()
    }

    /// Adjusts the decoder to the jump target, which is relative to the
    /// jump instruction itself.
    ///
    /// A zero offset would re-execute the jump forever and targets
    /// outside the bytecode, or outside the currently executing function
    /// definition, are rejected.
    fn do_jump(&mut self, decoder: &mut Decoder, offset: i32) -> OpResult {
        if offset == 0 {
            return Err(HintErrorKind::InvalidJump);
        }
        // the decoder already advanced past the one byte jump opcode
        let target = decoder
            .pc
            .checked_add_signed(offset as isize - 1)
            .ok_or(HintErrorKind::InvalidJump)?;
        if target > decoder.bytecode.len() {
            return Err(HintErrorKind::InvalidJump);
        }
        if let Some(record) = self.call_stack.peek() {
            if !record.definition.range().contains(&target) {
                return Err(HintErrorKind::InvalidJump);
            }
        }
        decoder.pc = target;
        Ok(())
    }

    /// FDEF[] (0x2C)
    ///
    /// Records the bytecode range of a function definition and skips
    /// past its terminating ENDF.
    pub(super) fn op_fdef(&mut self, decoder: &mut Decoder) -> OpResult {
        let index = self.value_stack.pop_usize()?;
        if index >= self.function_defs.len() {
            return Err(HintErrorKind::UnknownFunction(index));
        }
        let start = decoder.pc;
        loop {
            let ins = decoder
                .maybe_next()
                .ok_or(HintErrorKind::UnexpectedEndOfBytecode)??;
            match ins.opcode {
                opcodes::FDEF => return Err(HintErrorKind::NestedDefinition),
                opcodes::ENDF => break,
                _ => {}
            }
        }
        self.function_defs[index] = CodeDefinition::new(start..decoder.pc);
        Ok(())
    }

    /// ENDF[] (0x2D)
    ///
    /// Returns from the innermost call, or restarts the function body
    /// when a looped call has iterations remaining.
    pub(super) fn op_endf(&mut self, decoder: &mut Decoder) -> OpResult {
        let record = self.call_stack.pop()?;
        if record.current_count > 1 {
            decoder.pc = record.definition.range().start;
            self.call_stack.push(CallRecord {
                current_count: record.current_count - 1,
                ..record
            })?;
        } else {
            decoder.pc = record.return_pc;
        }
        Ok(())
    }

    /// CALL[] (0x2B) and LOOPCALL[] (0x2A)
    pub(super) fn op_call(&mut self, decoder: &mut Decoder, opcode: u8) -> OpResult {
        let (index, count) = if opcode == opcodes::LOOPCALL {
            self.value_stack.pop_pair()?
        } else {
            (self.value_stack.pop()?, 1)
        };
        let index = usize::try_from(index).map_err(|_| HintErrorKind::InvalidStackValue(index))?;
        if count <= 0 {
            return Ok(());
        }
        let definition = *self
            .function_defs
            .get(index)
            .filter(|def| def.is_active())
            .ok_or(HintErrorKind::UnknownFunction(index))?;
        self.call_stack.push(CallRecord {
            return_pc: decoder.pc,
            current_count: count as u32,
            definition,
        })?;
        decoder.pc = definition.range().start;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hint::HintError;

    fn run(bytecode: &[u8]) -> Result<Vec<i32>, HintError> {
        let mut engine = Engine::new(bytecode);
        engine.run()?;
        Ok(engine.stack_values().to_vec())
    }

    #[test]
    fn define_and_call() {
        // function 0 doubles the top of the stack
        let bytecode = [
            0xB0, 0, 0x2C, 0x20, 0x60, 0x2D, // PUSHB 0; FDEF; DUP; ADD; ENDF
            0xB0, 64, 0xB0, 0, 0x2B, // PUSHB 64; PUSHB 0; CALL
        ];
        assert_eq!(run(&bytecode).unwrap(), vec![128]);
    }

    #[test]
    fn loop_call_repeats_the_body() {
        // function 0 adds one pixel; loop it three times over 0
        let bytecode = [
            0xB0, 0, 0x2C, 0xB0, 64, 0x60, 0x2D, // PUSHB 0; FDEF; PUSHB 64; ADD; ENDF
            0xB0, 0, 0xB1, 3, 0, 0x2A, // PUSHB 0; PUSHB 3 0; LOOPCALL
        ];
        assert_eq!(run(&bytecode).unwrap(), vec![192]);
    }

    #[test]
    fn loop_call_with_zero_count_is_a_no_op() {
        let bytecode = [
            0xB0, 0, 0x2C, 0x20, 0x2D, // PUSHB 0; FDEF; DUP; ENDF
            0xB0, 7, 0xB1, 0, 0, 0x2A, // PUSHB 7; PUSHB 0 0; LOOPCALL
        ];
        assert_eq!(run(&bytecode).unwrap(), vec![7]);
    }

    #[test]
    fn nested_calls() {
        // function 0 doubles; function 1 calls it and adds one pixel
        let bytecode = [
            0xB0, 0, 0x2C, 0x20, 0x60, 0x2D, // PUSHB 0; FDEF; DUP; ADD; ENDF
            0xB0, 1, 0x2C, // PUSHB 1; FDEF
            0xB0, 0, 0x2B, // PUSHB 0; CALL
            0xB0, 64, 0x60, 0x2D, // PUSHB 64; ADD; ENDF
            0xB0, 64, 0xB0, 1, 0x2B, // PUSHB 64; PUSHB 1; CALL
        ];
        assert_eq!(run(&bytecode).unwrap(), vec![192]);
    }

    #[test]
    fn underflow_leaves_operands_in_place() {
        // JROT needs both a condition and an offset
        let bytecode = [0xB0, 1, 0x78]; // PUSHB 1; JROT
        let mut engine = Engine::new(&bytecode);
        let err = engine.run().unwrap_err();
        assert_eq!(err.kind, HintErrorKind::ValueStackUnderflow);
        assert_eq!(engine.stack_values(), &[1]);
        // LOOPCALL needs both a function index and a count
        let bytecode = [0xB0, 0, 0x2A]; // PUSHB 0; LOOPCALL
        let mut engine = Engine::new(&bytecode);
        let err = engine.run().unwrap_err();
        assert_eq!(err.kind, HintErrorKind::ValueStackUnderflow);
        assert_eq!(engine.stack_values(), &[0]);
    }

    #[test]
    fn calling_an_undefined_function_fails() {
        let err = run(&[0xB0, 5, 0x2B]).unwrap_err();
        assert_eq!(err.pc, 2);
        assert_eq!(err.kind, HintErrorKind::UnknownFunction(5));
    }

    #[test]
    fn nested_definitions_fail() {
        let err = run(&[0xB0, 0, 0x2C, 0x2C, 0x2D, 0x2D]).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::NestedDefinition);
    }

    #[test]
    fn unterminated_definition_fails() {
        let err = run(&[0xB0, 0, 0x2C, 0x20]).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::UnexpectedEndOfBytecode);
    }

    #[test]
    fn bare_endf_fails() {
        let err = run(&[0x2D]).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::CallStackUnderflow);
    }

    #[test]
    fn forward_jump_skips_instructions() {
        // jump over two opcodes that would otherwise fault
        let bytecode = [
            0xB0, 3, 0x1C, // PUSHB 3; JMPR
            0x58, 0x59, // IF; EIF (unimplemented)
            0xB0, 42, // PUSHB 42
        ];
        assert_eq!(run(&bytecode).unwrap(), vec![42]);
    }

    #[test]
    fn conditional_jumps() {
        // JROF with a true condition falls through
        let bytecode = [
            0xB0, 2, 0xB0, 1, 0x79, // PUSHB 2; PUSHB 1; JROF
            0xB0, 9, // PUSHB 9
        ];
        assert_eq!(run(&bytecode).unwrap(), vec![9]);
        // JROT with a true condition takes the jump
        let bytecode = [
            0xB0, 3, 0xB0, 1, 0x78, // PUSHB 3; PUSHB 1; JROT
            0x58, 0x59, // IF; EIF (unimplemented)
            0xB0, 9, // PUSHB 9
        ];
        assert_eq!(run(&bytecode).unwrap(), vec![9]);
    }

    #[test]
    fn zero_offset_jump_fails() {
        let err = run(&[0xB0, 0, 0x1C]).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::InvalidJump);
    }

    #[test]
    fn jump_outside_bytecode_fails() {
        let err = run(&[0xB0, 50, 0x1C]).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::InvalidJump);
    }

    #[test]
    fn jump_out_of_a_function_fails() {
        // function 0 tries to jump back into the outer program
        let bytecode = [
            0xB0, 0, 0x2C, 0xB8, 0xFF, 0xFC, 0x1C, 0x2D, // FDEF; PUSHW -4; JMPR; ENDF
            0xB0, 0, 0x2B, // PUSHB 0; CALL
        ];
        let err = run(&bytecode).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::InvalidJump);
    }

    #[test]
    fn infinite_loop_exhausts_the_budget() {
        // backward jump to the start of the program
        let bytecode = [0xB8, 0xFF, 0xFD, 0x1C]; // PUSHW -3; JMPR
        let err = run(&bytecode).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::ExceededExecutionBudget);
    }
}
