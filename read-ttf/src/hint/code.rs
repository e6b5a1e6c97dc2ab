//! Instruction decoding for TrueType bytecode.

use std::ops::Range;

use super::error::HintErrorKind;

/// Opcode constants for the instructions the engine dispatches by name.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions>
pub(crate) mod opcodes {
    pub const SVTCA0: u8 = 0x00;
    pub const SFVTCA1: u8 = 0x05;
    pub const SPVFS: u8 = 0x0A;
    pub const SFVFS: u8 = 0x0B;
    pub const GPV: u8 = 0x0C;
    pub const GFV: u8 = 0x0D;
    pub const SFVTPV: u8 = 0x0E;
    pub const SRP0: u8 = 0x10;
    pub const SRP1: u8 = 0x11;
    pub const SRP2: u8 = 0x12;
    pub const SZP0: u8 = 0x13;
    pub const SZP1: u8 = 0x14;
    pub const SZP2: u8 = 0x15;
    pub const SZPS: u8 = 0x16;
    pub const SLOOP: u8 = 0x17;
    pub const RTG: u8 = 0x18;
    pub const RTHG: u8 = 0x19;
    pub const SMD: u8 = 0x1A;
    pub const ELSE: u8 = 0x1B;
    pub const JMPR: u8 = 0x1C;
    pub const SCVTCI: u8 = 0x1D;
    pub const SSWCI: u8 = 0x1E;
    pub const SSW: u8 = 0x1F;
    pub const DUP: u8 = 0x20;
    pub const POP: u8 = 0x21;
    pub const CLEAR: u8 = 0x22;
    pub const SWAP: u8 = 0x23;
    pub const DEPTH: u8 = 0x24;
    pub const CINDEX: u8 = 0x25;
    pub const MINDEX: u8 = 0x26;
    pub const LOOPCALL: u8 = 0x2A;
    pub const CALL: u8 = 0x2B;
    pub const FDEF: u8 = 0x2C;
    pub const ENDF: u8 = 0x2D;
    pub const MDAP0: u8 = 0x2E;
    pub const RTDG: u8 = 0x3D;
    pub const MIAP1: u8 = 0x3F;
    pub const NPUSHB: u8 = 0x40;
    pub const NPUSHW: u8 = 0x41;
    pub const MPPEM: u8 = 0x4B;
    pub const FLIPON: u8 = 0x4D;
    pub const FLIPOFF: u8 = 0x4E;
    pub const DEBUG: u8 = 0x4F;
    pub const LT: u8 = 0x50;
    pub const LTEQ: u8 = 0x51;
    pub const GT: u8 = 0x52;
    pub const GTEQ: u8 = 0x53;
    pub const EQ: u8 = 0x54;
    pub const NEQ: u8 = 0x55;
    pub const ODD: u8 = 0x56;
    pub const EVEN: u8 = 0x57;
    pub const IF: u8 = 0x58;
    pub const EIF: u8 = 0x59;
    pub const AND: u8 = 0x5A;
    pub const OR: u8 = 0x5B;
    pub const NOT: u8 = 0x5C;
    pub const SDB: u8 = 0x5E;
    pub const SDS: u8 = 0x5F;
    pub const ADD: u8 = 0x60;
    pub const SUB: u8 = 0x61;
    pub const DIV: u8 = 0x62;
    pub const MUL: u8 = 0x63;
    pub const ABS: u8 = 0x64;
    pub const NEG: u8 = 0x65;
    pub const FLOOR: u8 = 0x66;
    pub const CEILING: u8 = 0x67;
    pub const ROUND00: u8 = 0x68;
    pub const ROUND11: u8 = 0x6B;
    pub const NROUND00: u8 = 0x6C;
    pub const NROUND11: u8 = 0x6F;
    pub const SROUND: u8 = 0x76;
    pub const S45ROUND: u8 = 0x77;
    pub const JROT: u8 = 0x78;
    pub const JROF: u8 = 0x79;
    pub const ROFF: u8 = 0x7A;
    pub const RUTG: u8 = 0x7C;
    pub const RDTG: u8 = 0x7D;
    pub const SANGW: u8 = 0x7E;
    pub const AA: u8 = 0x7F;
    pub const SCANCTRL: u8 = 0x85;
    pub const ROLL: u8 = 0x8A;
    pub const MAX: u8 = 0x8B;
    pub const MIN: u8 = 0x8C;
    pub const SCANTYPE: u8 = 0x8D;
    pub const PUSHB000: u8 = 0xB0;
    pub const PUSHW000: u8 = 0xB8;
    pub const PUSHW111: u8 = 0xBF;
    pub const MDRP00000: u8 = 0xC0;
    pub const MIRP11111: u8 = 0xFF;
}

/// Returns the mnemonic for an opcode; unassigned bytes get an `OPxx`
/// placeholder name.
pub(crate) fn name(opcode: u8) -> &'static str {
    NAME_TABLE[opcode as usize]
}

/// The range of bytecode holding one function definition.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct CodeDefinition {
    start: usize,
    end: usize,
    active: bool,
}

impl CodeDefinition {
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            active: true,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// False for table slots where no FDEF has executed yet.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// The literal data carried by a push instruction.
#[derive(Copy, Clone, Default, Debug)]
pub struct Arguments<'a> {
    bytes: &'a [u8],
    is_words: bool,
}

impl<'a> Arguments<'a> {
    #[cfg(test)]
    pub(crate) fn new(bytes: &'a [u8], is_words: bool) -> Self {
        Self { bytes, is_words }
    }

    /// Number of values that will be pushed.
    pub fn len(&self) -> usize {
        if self.is_words {
            self.bytes.len() / 2
        } else {
            self.bytes.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The argument values: bytes are zero extended, words are sign
    /// extended big-endian.
    pub fn values(&self) -> impl Iterator<Item = i32> + 'a {
        ArgumentValues {
            bytes: self.bytes,
            is_words: self.is_words,
        }
    }
}

struct ArgumentValues<'a> {
    bytes: &'a [u8],
    is_words: bool,
}

impl Iterator for ArgumentValues<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.is_words {
            let (chunk, rest) = self.bytes.split_first_chunk::<2>()?;
            self.bytes = rest;
            Some(i16::from_be_bytes(*chunk) as i32)
        } else {
            let (byte, rest) = self.bytes.split_first()?;
            self.bytes = rest;
            Some(*byte as i32)
        }
    }
}

/// A single decoded instruction.
#[derive(Copy, Clone, Debug)]
pub struct Instruction<'a> {
    pub opcode: u8,
    /// Literal arguments when the opcode is one of the push family.
    pub arguments: Arguments<'a>,
    /// Program counter where the opcode was decoded.
    pub pc: usize,
}

impl Instruction<'_> {
    pub fn name(&self) -> &'static str {
        name(self.opcode)
    }
}

impl std::fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())?;
        for value in self.arguments.values() {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// Decodes instructions from TrueType bytecode.
#[derive(Clone)]
pub struct Decoder<'a> {
    pub bytecode: &'a [u8],
    /// Program counter: the offset of the next instruction to decode.
    pub pc: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(bytecode: &'a [u8], pc: usize) -> Self {
        Self { bytecode, pc }
    }

    /// Decodes the next instruction, returning `None` at the end of the
    /// bytecode.
    pub fn maybe_next(&mut self) -> Option<Result<Instruction<'a>, HintErrorKind>> {
        (self.pc < self.bytecode.len()).then(|| self.next_inner())
    }

    fn next_inner(&mut self) -> Result<Instruction<'a>, HintErrorKind> {
        let pc = self.pc;
        let opcode = *self
            .bytecode
            .get(pc)
            .ok_or(HintErrorKind::UnexpectedEndOfBytecode)?;
        let mut opcode_len = LENGTH_TABLE[opcode as usize] as i32;
        let mut count_bytes = 0;
        if opcode_len < 0 {
            // variable length push: the byte after the opcode is the
            // number of arguments
            let count = *self
                .bytecode
                .get(pc + 1)
                .ok_or(HintErrorKind::UnexpectedEndOfBytecode)? as i32;
            opcode_len = 2 - opcode_len * count;
            count_bytes = 1;
        }
        let next_pc = pc + opcode_len as usize;
        let arg_start = pc + 1 + count_bytes;
        let bytes = self
            .bytecode
            .get(arg_start..next_pc)
            .ok_or(HintErrorKind::UnexpectedEndOfBytecode)?;
        let is_words = (opcodes::PUSHW000..=opcodes::PUSHW111).contains(&opcode)
            || opcode == opcodes::NPUSHW;
        self.pc = next_pc;
        Ok(Instruction {
            opcode,
            arguments: Arguments { bytes, is_words },
            pc,
        })
    }
}

/// The number of bytes each opcode occupies.
///
/// Negative entries mark the variable length pushes: the byte after the
/// opcode holds the argument count and the magnitude is the per-argument
/// width.
#[rustfmt::skip]
const LENGTH_TABLE: [i8; 256] = {
    let mut table = [1i8; 256];
    table[opcodes::NPUSHB as usize] = -1;
    table[opcodes::NPUSHW as usize] = -2;
    // PUSHB[abc]: 1 + (abc + 1) bytes
    let mut i = 0;
    while i < 8 {
        table[opcodes::PUSHB000 as usize + i] = 2 + i as i8;
        table[opcodes::PUSHW000 as usize + i] = 3 + 2 * i as i8;
        i += 1;
    }
    table
};

#[rustfmt::skip]
const NAME_TABLE: [&str; 256] = [
    "SVTCA0", "SVTCA1", "SPVTCA0", "SPVTCA1", "SFVTCA0", "SFVTCA1", "SPVTL0", "SPVTL1",
    "SFVTL0", "SFVTL1", "SPVFS", "SFVFS", "GPV", "GFV", "SFVTPV", "ISECT",
    "SRP0", "SRP1", "SRP2", "SZP0", "SZP1", "SZP2", "SZPS", "SLOOP",
    "RTG", "RTHG", "SMD", "ELSE", "JMPR", "SCVTCI", "SSWCI", "SSW",
    "DUP", "POP", "CLEAR", "SWAP", "DEPTH", "CINDEX", "MINDEX", "ALIGNPTS",
    "OP28", "UTP", "LOOPCALL", "CALL", "FDEF", "ENDF", "MDAP0", "MDAP1",
    "IUP0", "IUP1", "SHP0", "SHP1", "SHC0", "SHC1", "SHZ0", "SHZ1",
    "SHPIX", "IP", "MSIRP0", "MSIRP1", "ALIGNRP", "RTDG", "MIAP0", "MIAP1",
    "NPUSHB", "NPUSHW", "WS", "RS", "WCVTP", "RCVT", "GC0", "GC1",
    "SCFS", "MD0", "MD1", "MPPEM", "MPS", "FLIPON", "FLIPOFF", "DEBUG",
    "LT", "LTEQ", "GT", "GTEQ", "EQ", "NEQ", "ODD", "EVEN",
    "IF", "EIF", "AND", "OR", "NOT", "DELTAP1", "SDB", "SDS",
    "ADD", "SUB", "DIV", "MUL", "ABS", "NEG", "FLOOR", "CEILING",
    "ROUND00", "ROUND01", "ROUND10", "ROUND11", "NROUND00", "NROUND01", "NROUND10", "NROUND11",
    "WCVTF", "DELTAP2", "DELTAP3", "DELTAC1", "DELTAC2", "DELTAC3", "SROUND", "S45ROUND",
    "JROT", "JROF", "ROFF", "OP7B", "RUTG", "RDTG", "SANGW", "AA",
    "FLIPPT", "FLIPRGON", "FLIPRGOFF", "OP83", "OP84", "SCANCTRL", "SDPVTL0", "SDPVTL1",
    "GETINFO", "IDEF", "ROLL", "MAX", "MIN", "SCANTYPE", "INSTCTRL", "OP8F",
    "OP90", "OP91", "OP92", "OP93", "OP94", "OP95", "OP96", "OP97",
    "OP98", "OP99", "OP9A", "OP9B", "OP9C", "OP9D", "OP9E", "OP9F",
    "OPA0", "OPA1", "OPA2", "OPA3", "OPA4", "OPA5", "OPA6", "OPA7",
    "OPA8", "OPA9", "OPAA", "OPAB", "OPAC", "OPAD", "OPAE", "OPAF",
    "PUSHB000", "PUSHB001", "PUSHB010", "PUSHB011", "PUSHB100", "PUSHB101", "PUSHB110", "PUSHB111",
    "PUSHW000", "PUSHW001", "PUSHW010", "PUSHW011", "PUSHW100", "PUSHW101", "PUSHW110", "PUSHW111",
    "MDRP00000", "MDRP00001", "MDRP00010", "MDRP00011", "MDRP00100", "MDRP00101", "MDRP00110", "MDRP00111",
    "MDRP01000", "MDRP01001", "MDRP01010", "MDRP01011", "MDRP01100", "MDRP01101", "MDRP01110", "MDRP01111",
    "MDRP10000", "MDRP10001", "MDRP10010", "MDRP10011", "MDRP10100", "MDRP10101", "MDRP10110", "MDRP10111",
    "MDRP11000", "MDRP11001", "MDRP11010", "MDRP11011", "MDRP11100", "MDRP11101", "MDRP11110", "MDRP11111",
    "MIRP00000", "MIRP00001", "MIRP00010", "MIRP00011", "MIRP00100", "MIRP00101", "MIRP00110", "MIRP00111",
    "MIRP01000", "MIRP01001", "MIRP01010", "MIRP01011", "MIRP01100", "MIRP01101", "MIRP01110", "MIRP01111",
    "MIRP10000", "MIRP10001", "MIRP10010", "MIRP10011", "MIRP10100", "MIRP10101", "MIRP10110", "MIRP10111",
    "MIRP11000", "MIRP11001", "MIRP11010", "MIRP11011", "MIRP11100", "MIRP11101", "MIRP11110", "MIRP11111",
];
