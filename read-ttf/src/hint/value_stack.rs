//! Value stack for the TrueType interpreter.

use super::code::Arguments;
use super::error::HintErrorKind;

use HintErrorKind::{InvalidStackValue, ValueStackOverflow, ValueStackUnderflow};

/// Fixed upper bound on stack depth.
///
/// The `maxp` table declares a per-font size; rather than trusting it we
/// allocate a bound comfortably above what real fonts request.
const VALUE_STACK_SIZE: usize = 2048;

/// The operand stack of 32-bit signed words.
///
/// Every operation validates its operand count before mutating anything,
/// so a faulting instruction leaves the stack exactly as it found it.
pub struct ValueStack {
    values: Vec<i32>,
    top: usize,
}

impl Default for ValueStack {
    fn default() -> Self {
        Self {
            values: vec![0; VALUE_STACK_SIZE],
            top: 0,
        }
    }
}

impl ValueStack {
    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    /// The live portion of the stack, bottom first.
    pub fn values(&self) -> &[i32] {
        &self.values[..self.top]
    }

    pub fn push(&mut self, value: i32) -> Result<(), HintErrorKind> {
        let slot = self
            .values
            .get_mut(self.top)
            .ok_or(ValueStackOverflow)?;
        *slot = value;
        self.top += 1;
        Ok(())
    }

    /// Push the literal arguments of a push instruction.
    pub fn push_args(&mut self, args: &Arguments) -> Result<(), HintErrorKind> {
        if self.top + args.len() > self.values.len() {
            return Err(ValueStackOverflow);
        }
        for value in args.values() {
            self.values[self.top] = value;
            self.top += 1;
        }
        Ok(())
    }

    pub fn peek(&self) -> Option<i32> {
        self.top.checked_sub(1).map(|ix| self.values[ix])
    }

    pub fn pop(&mut self) -> Result<i32, HintErrorKind> {
        let value = self.peek().ok_or(ValueStackUnderflow)?;
        self.top -= 1;
        Ok(value)
    }

    /// Pops two values at once, returned in pop order (top first).
    ///
    /// Faults without popping anything when fewer than two values are
    /// present.
    pub fn pop_pair(&mut self) -> Result<(i32, i32), HintErrorKind> {
        let ix = self.top.checked_sub(2).ok_or(ValueStackUnderflow)?;
        self.top = ix;
        Ok((self.values[ix + 1], self.values[ix]))
    }

    /// Pops a value that must be a non-negative count or index.
    pub fn pop_usize(&mut self) -> Result<usize, HintErrorKind> {
        let value = self.pop()?;
        usize::try_from(value).map_err(|_| InvalidStackValue(value))
    }

    /// Replaces the top value with the result of the given function.
    pub fn apply_unary(
        &mut self,
        f: impl FnOnce(i32) -> Result<i32, HintErrorKind>,
    ) -> Result<(), HintErrorKind> {
        let ix = self.top.checked_sub(1).ok_or(ValueStackUnderflow)?;
        self.values[ix] = f(self.values[ix])?;
        Ok(())
    }

    /// Replaces the top two values with the result of the given function.
    pub fn apply_binary(
        &mut self,
        f: impl FnOnce(i32, i32) -> Result<i32, HintErrorKind>,
    ) -> Result<(), HintErrorKind> {
        let ix = self.top.checked_sub(2).ok_or(ValueStackUnderflow)?;
        let result = f(self.values[ix], self.values[ix + 1])?;
        self.values[ix] = result;
        self.top = ix + 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    pub fn dup(&mut self) -> Result<(), HintErrorKind> {
        let value = self.peek().ok_or(ValueStackUnderflow)?;
        self.push(value)
    }

    pub fn swap(&mut self) -> Result<(), HintErrorKind> {
        let ix = self.top.checked_sub(2).ok_or(ValueStackUnderflow)?;
        self.values.swap(ix, ix + 1);
        Ok(())
    }

    /// CINDEX: replaces the top value k with a copy of the kth element
    /// below it.
    pub fn copy_index(&mut self) -> Result<(), HintErrorKind> {
        let top_ix = self.top.checked_sub(1).ok_or(ValueStackUnderflow)?;
        let k = self.values[top_ix];
        let source_ix = usize::try_from(k)
            .ok()
            .filter(|k| *k > 0)
            .and_then(|k| top_ix.checked_sub(k))
            .ok_or(InvalidStackValue(k))?;
        self.values[top_ix] = self.values[source_ix];
        Ok(())
    }

    /// MINDEX: pops the top value k and moves the kth element below it
    /// to the top.
    pub fn move_index(&mut self) -> Result<(), HintErrorKind> {
        let top_ix = self.top.checked_sub(1).ok_or(ValueStackUnderflow)?;
        let k = self.values[top_ix];
        let source_ix = usize::try_from(k)
            .ok()
            .filter(|k| *k > 0)
            .and_then(|k| top_ix.checked_sub(k))
            .ok_or(InvalidStackValue(k))?;
        let value = self.values[source_ix];
        self.values.copy_within(source_ix + 1..top_ix, source_ix);
        self.values[top_ix - 1] = value;
        self.top = top_ix;
        Ok(())
    }

    /// ROLL: cyclically permutes the top three elements, bringing the
    /// third from the top to the top.
    pub fn roll(&mut self) -> Result<(), HintErrorKind> {
        let ix = self.top.checked_sub(3).ok_or(ValueStackUnderflow)?;
        let (c, b, a) = (self.values[ix], self.values[ix + 1], self.values[ix + 2]);
        self.values[ix] = b;
        self.values[ix + 1] = a;
        self.values[ix + 2] = c;
        Ok(())
    }
}
