//! TrueType hinting bytecode interpretation.
//!
//! Executes the instruction streams embedded in glyph records against a
//! mutable [`GraphicsState`]. The supported instruction set covers the
//! stack, arithmetic, logic, graphics state and control flow families;
//! opcodes that move points are recognized but fault, as outlines are
//! consumed unhinted for now.

mod call_stack;
mod code;
mod engine;
mod error;
mod graphics;
mod value_stack;

pub use code::{Arguments, CodeDefinition, Decoder, Instruction};
pub use engine::Engine;
pub use error::{HintError, HintErrorKind};
pub use graphics::{GraphicsState, RoundMode, ScanControl, ZonePointer};
