//! Hinting error definitions.

use std::fmt;

use super::code;

/// Errors that may occur when interpreting TrueType bytecode.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HintErrorKind {
    UnexpectedEndOfBytecode,
    NotImplementedOpcode(u8),
    UnknownFunction(usize),
    ValueStackOverflow,
    ValueStackUnderflow,
    CallStackOverflow,
    CallStackUnderflow,
    InvalidStackValue(i32),
    DivideByZero,
    InvalidZoneIndex(i32),
    NegativeLoopCounter,
    InvalidJump,
    NestedDefinition,
    ExceededExecutionBudget,
}

impl fmt::Display for HintErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedEndOfBytecode => write!(f, "unexpected end of bytecode"),
            Self::NotImplementedOpcode(opcode) => {
                write!(f, "unimplemented instruction {}", code::name(*opcode))
            }
            Self::UnknownFunction(id) => write!(f, "function {id} is not defined"),
            Self::ValueStackOverflow => write!(f, "value stack overflow"),
            Self::ValueStackUnderflow => write!(f, "value stack underflow"),
            Self::CallStackOverflow => write!(f, "call stack overflow"),
            Self::CallStackUnderflow => write!(f, "call stack underflow"),
            Self::InvalidStackValue(value) => {
                write!(f, "stack value {value} was invalid for the instruction")
            }
            Self::DivideByZero => write!(f, "attempt to divide by 0"),
            Self::InvalidZoneIndex(index) => write!(
                f,
                "zone index {index} was invalid (only 0 or 1 are permitted)"
            ),
            Self::NegativeLoopCounter => write!(f, "attempt to set a negative loop counter"),
            Self::InvalidJump => write!(f, "jump target outside the current program"),
            Self::NestedDefinition => {
                write!(f, "function definitions may not nest")
            }
            Self::ExceededExecutionBudget => write!(f, "too many instructions executed"),
        }
    }
}

impl std::error::Error for HintErrorKind {}

/// A hinting fault with the location where it was raised.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct HintError {
    /// Program counter of the faulting instruction.
    pub pc: usize,
    /// Opcode of the faulting instruction, when one was decoded.
    pub opcode: Option<u8>,
    pub kind: HintErrorKind,
}

impl fmt::Display for HintError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "@{}", self.pc)?;
        if let Some(opcode) = self.opcode {
            write!(f, ":{}", code::name(opcode))?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for HintError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_location() {
        let err = HintError {
            pc: 12,
            opcode: Some(0x60),
            kind: HintErrorKind::ValueStackUnderflow,
        };
        assert_eq!(err.to_string(), "@12:ADD: value stack underflow");
        let err = HintError {
            pc: 0,
            opcode: None,
            kind: HintErrorKind::CallStackUnderflow,
        };
        assert_eq!(err.to_string(), "@0: call stack underflow");
    }
}
