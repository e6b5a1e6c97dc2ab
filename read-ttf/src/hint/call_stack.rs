//! Call stack for TrueType function invocations.

use super::code::CodeDefinition;
use super::error::HintErrorKind;

/// Maximum depth of nested function calls.
///
/// Matches FreeType:
/// <https://gitlab.freedesktop.org/freetype/freetype/-/blob/57617782464411201ce7bbc93b086c1b4d7d84a5/src/truetype/ttinterp.h#L204>
const CALL_STACK_SIZE: usize = 32;

/// A record for a function invocation on the call stack.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct CallRecord {
    /// Program counter to restore when the function returns.
    pub return_pc: usize,
    /// Remaining invocations, for looped calls.
    pub current_count: u32,
    pub definition: CodeDefinition,
}

/// A fixed size stack of call records.
#[derive(Default)]
pub struct CallStack {
    records: [CallRecord; CALL_STACK_SIZE],
    top: usize,
}

impl CallStack {
    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn push(&mut self, record: CallRecord) -> Result<(), HintErrorKind> {
        let slot = self
            .records
            .get_mut(self.top)
            .ok_or(HintErrorKind::CallStackOverflow)?;
        *slot = record;
        self.top += 1;
        Ok(())
    }

    pub fn peek(&self) -> Option<&CallRecord> {
        self.top.checked_sub(1).map(|ix| &self.records[ix])
    }

    pub fn pop(&mut self) -> Result<CallRecord, HintErrorKind> {
        let record = *self.peek().ok_or(HintErrorKind::CallStackUnderflow)?;
        self.top -= 1;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(return_pc: usize) -> CallRecord {
        CallRecord {
            return_pc,
            current_count: 1,
            definition: CodeDefinition::new(0..0),
        }
    }

    #[test]
    fn push_and_pop() {
        let mut stack = CallStack::default();
        assert_eq!(stack.pop(), Err(HintErrorKind::CallStackUnderflow));
        stack.push(record(10)).unwrap();
        stack.push(record(20)).unwrap();
        assert_eq!(stack.peek().map(|r| r.return_pc), Some(20));
        assert_eq!(stack.pop().map(|r| r.return_pc), Ok(20));
        assert_eq!(stack.pop().map(|r| r.return_pc), Ok(10));
        assert!(stack.is_empty());
    }

    #[test]
    fn overflow() {
        let mut stack = CallStack::default();
        for i in 0..CALL_STACK_SIZE {
            stack.push(record(i)).unwrap();
        }
        assert_eq!(
            stack.push(record(99)),
            Err(HintErrorKind::CallStackOverflow)
        );
    }
}
