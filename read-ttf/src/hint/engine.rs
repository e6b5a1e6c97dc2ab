//! The bytecode execution engine.

mod arith;
mod control_flow;
mod dispatch;
mod graphics;
mod logical;
mod stack;

use super::call_stack::CallStack;
use super::code::CodeDefinition;
use super::error::HintErrorKind;
use super::graphics::GraphicsState;
use super::value_stack::ValueStack;

pub(crate) type OpResult = Result<(), HintErrorKind>;

/// Number of slots in the function definition table.
///
/// Function numbers are a single byte in practice, so 256 covers every
/// reachable definition.
const MAX_FUNCTION_DEFS: usize = 256;

/// Executes a TrueType instruction stream.
///
/// The engine owns the value and call stacks, the function definition
/// table and a [`GraphicsState`]. Point movement instructions are
/// recognized but fault with
/// [`NotImplementedOpcode`](HintErrorKind::NotImplementedOpcode).
pub struct Engine<'a> {
    bytecode: &'a [u8],
    value_stack: ValueStack,
    call_stack: CallStack,
    graphics: GraphicsState,
    function_defs: Vec<CodeDefinition>,
    ppem: u32,
    is_rotated: bool,
    is_stretched: bool,
}

impl<'a> Engine<'a> {
    pub fn new(bytecode: &'a [u8]) -> Self {
        Self {
            bytecode,
            value_stack: ValueStack::default(),
            call_stack: CallStack::default(),
            graphics: GraphicsState::default(),
            function_defs: vec![CodeDefinition::default(); MAX_FUNCTION_DEFS],
            ppem: 0,
            is_rotated: false,
            is_stretched: false,
        }
    }

    /// Sets the rendering conditions reported by MPPEM and consumed by
    /// scan control evaluation.
    pub fn set_instance(&mut self, ppem: u32, is_rotated: bool, is_stretched: bool) {
        self.ppem = ppem;
        self.is_rotated = is_rotated;
        self.is_stretched = is_stretched;
    }

    pub fn graphics(&self) -> &GraphicsState {
        &self.graphics
    }

    /// The live value stack, bottom first.
    pub fn stack_values(&self) -> &[i32] {
        self.value_stack.values()
    }

    /// Whether dropout control applies under the current scan control
    /// settings and rendering conditions.
    pub fn scan_control_active(&self) -> bool {
        self.graphics
            .scan_control
            .evaluate(self.ppem, self.is_rotated, self.is_stretched)
    }
}
