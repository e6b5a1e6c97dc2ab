//! The instruction fetch and dispatch loop.

use super::super::code::{opcodes, Decoder, Instruction};
use super::super::error::{HintError, HintErrorKind};
use super::super::graphics::RoundMode;
use super::{Engine, OpResult};

/// Hard cap on executed instructions per program.
///
/// Backward jumps and looped calls make unbounded execution expressible
/// in otherwise well formed bytecode, so every run carries a budget.
const MAX_RUN_INSTRUCTIONS: usize = 1_000_000;

impl Engine<'_> {
    /// Executes the engine's bytecode from the beginning to the end of
    /// the stream.
    pub fn run(&mut self) -> Result<(), HintError> {
        let mut decoder = Decoder::new(self.bytecode, 0);
        let mut count = 0usize;
        loop {
            let Some(decoded) = decoder.maybe_next() else {
                if !self.call_stack.is_empty() {
                    // ran off the end of a function body
                    return Err(HintError {
                        pc: decoder.pc,
                        opcode: None,
                        kind: HintErrorKind::CallStackUnderflow,
                    });
                }
                return Ok(());
            };
            let ins = decoded.map_err(|kind| HintError {
                pc: decoder.pc,
                opcode: None,
                kind,
            })?;
            count += 1;
            if count > MAX_RUN_INSTRUCTIONS {
                return Err(HintError {
                    pc: ins.pc,
                    opcode: Some(ins.opcode),
                    kind: HintErrorKind::ExceededExecutionBudget,
                });
            }
            self.dispatch(&mut decoder, &ins).map_err(|kind| HintError {
                pc: ins.pc,
                opcode: Some(ins.opcode),
                kind,
            })?;
        }
    }

    fn dispatch(&mut self, decoder: &mut Decoder, ins: &Instruction) -> OpResult {
        use opcodes::*;
        let opcode = ins.opcode;
        match opcode {
            SVTCA0..=SFVTCA1 => self.op_svtca(opcode),
            SPVFS => self.op_spvfs(),
            SFVFS => self.op_sfvfs(),
            GPV => self.op_gpv(),
            GFV => self.op_gfv(),
            SFVTPV => self.op_sfvtpv(),
            SRP0..=SRP2 => self.op_srp(opcode),
            SZP0..=SZPS => self.op_szp(opcode),
            SLOOP => self.op_sloop(),
            RTG => self.op_round_mode(RoundMode::Grid),
            RTHG => self.op_round_mode(RoundMode::HalfGrid),
            RTDG => self.op_round_mode(RoundMode::DoubleGrid),
            RDTG => self.op_round_mode(RoundMode::DownToGrid),
            RUTG => self.op_round_mode(RoundMode::UpToGrid),
            ROFF => self.op_round_mode(RoundMode::Off),
            SMD => self.op_smd(),
            JMPR => self.op_jmpr(decoder),
            JROT => self.op_jrot(decoder),
            JROF => self.op_jrof(decoder),
            SCVTCI => self.op_scvtci(),
            SSWCI => self.op_sswci(),
            SSW => self.op_ssw(),
            DUP => self.op_dup(),
            POP => self.op_pop(),
            CLEAR => self.op_clear(),
            SWAP => self.op_swap(),
            DEPTH => self.op_depth(),
            CINDEX => self.op_cindex(),
            MINDEX => self.op_mindex(),
            ROLL => self.op_roll(),
            LOOPCALL | CALL => self.op_call(decoder, opcode),
            FDEF => self.op_fdef(decoder),
            ENDF => self.op_endf(decoder),
            NPUSHB | NPUSHW | PUSHB000..=PUSHW111 => self.op_push(&ins.arguments),
            MPPEM => self.op_mppem(),
            FLIPON => self.op_flip(true),
            FLIPOFF => self.op_flip(false),
            DEBUG | SANGW | AA => self.op_discard(),
            LT => self.op_lt(),
            LTEQ => self.op_lteq(),
            GT => self.op_gt(),
            GTEQ => self.op_gteq(),
            EQ => self.op_eq(),
            NEQ => self.op_neq(),
            ODD => self.op_odd(),
            EVEN => self.op_even(),
            AND => self.op_and(),
            OR => self.op_or(),
            NOT => self.op_not(),
            SDB => self.op_sdb(),
            SDS => self.op_sds(),
            ADD => self.op_add(),
            SUB => self.op_sub(),
            DIV => self.op_div(),
            MUL => self.op_mul(),
            ABS => self.op_abs(),
            NEG => self.op_neg(),
            FLOOR => self.op_floor(),
            CEILING => self.op_ceiling(),
            ROUND00..=ROUND11 => self.op_round(),
            NROUND00..=NROUND11 => self.op_nround(),
            SCANCTRL => self.op_scanctrl(),
            SCANTYPE => self.op_scantype(),
            MAX => self.op_max(),
            MIN => self.op_min(),
            // everything else, notably the point movement, delta, cvt
            // and storage families plus IF/ELSE/EIF, is not implemented
            _ => Err(HintErrorKind::NotImplementedOpcode(opcode)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_program() {
        // push 2.0 and 3.0 as 26.6 words, add, round down to grid
        let bytecode = [
            0x41, 2, 0x00, 0x80, 0x00, 0xC0, // NPUSHW 128 192
            0x60, // ADD
        ];
        let mut engine = Engine::new(&bytecode);
        engine.run().unwrap();
        assert_eq!(engine.stack_values(), &[320]);
    }

    #[test]
    fn graphics_program() {
        // RTHG; SVTCA0; PUSHB 8; SLOOP
        let bytecode = [0x19, 0x00, 0xB0, 8, 0x17];
        let mut engine = Engine::new(&bytecode);
        engine.run().unwrap();
        assert_eq!(engine.graphics().round_mode, RoundMode::HalfGrid);
        assert_eq!(engine.graphics().loop_counter, 8);
    }

    #[test]
    fn unimplemented_opcodes_fault() {
        for opcode in [0x58u8, 0x1B, 0x59, 0x76, 0x77, 0xC0, 0xFF, 0x30, 0x42, 0x8F] {
            let bytecode = [opcode];
            let mut engine = Engine::new(&bytecode);
            let err = engine.run().unwrap_err();
            assert_eq!(err.pc, 0);
            assert_eq!(err.opcode, Some(opcode));
            assert_eq!(err.kind, HintErrorKind::NotImplementedOpcode(opcode));
        }
    }

    #[test]
    fn faults_carry_the_instruction_location() {
        // underflow on ADD at pc 2
        let bytecode = [0xB0, 1, 0x60];
        let mut engine = Engine::new(&bytecode);
        let err = engine.run().unwrap_err();
        assert_eq!(err.pc, 2);
        assert_eq!(err.opcode, Some(0x60));
        assert_eq!(err.kind, HintErrorKind::ValueStackUnderflow);
        assert_eq!(err.to_string(), "@2:ADD: value stack underflow");
    }

    #[test]
    fn truncated_stream_faults_at_the_push() {
        let bytecode = [0x40, 9, 1, 2];
        let mut engine = Engine::new(&bytecode);
        let err = engine.run().unwrap_err();
        assert_eq!(err.pc, 0);
        assert_eq!(err.kind, HintErrorKind::UnexpectedEndOfBytecode);
    }

    #[test]
    fn empty_program_is_ok() {
        assert!(Engine::new(&[]).run().is_ok());
    }
}
