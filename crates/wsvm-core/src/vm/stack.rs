//! VM Operand Stack
//!
//! LIFO of machine words. Operations that lack operands report
//! `FaultKind::StackUnderflow`; the VM attaches opcode and pc.

use crate::error::FaultKind;

/// VM operand stack
#[derive(Debug, Default)]
pub struct Stack {
    values: Vec<i64>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { values: Vec::new() }
    }

    /// Push value onto stack
    pub fn push(&mut self, value: i64) {
        self.values.push(value);
    }

    /// Pop value from stack
    pub fn pop(&mut self) -> Result<i64, FaultKind> {
        self.values.pop().ok_or(FaultKind::StackUnderflow)
    }

    /// Pop the top two values as `(next, top)`; nothing is removed on underflow
    pub fn pop_pair(&mut self) -> Result<(i64, i64), FaultKind> {
        if self.values.len() < 2 {
            return Err(FaultKind::StackUnderflow);
        }
        let top = self.pop()?;
        let next = self.pop()?;
        Ok((next, top))
    }

    /// Peek at top of stack without removing
    pub fn peek(&self) -> Result<i64, FaultKind> {
        self.values.last().copied().ok_or(FaultKind::StackUnderflow)
    }

    /// Duplicate top value
    pub fn dup(&mut self) -> Result<(), FaultKind> {
        let value = self.peek()?;
        self.push(value);
        Ok(())
    }

    /// Push a copy of the value `n` positions below the top (0 = top)
    pub fn copy(&mut self, n: i64) -> Result<(), FaultKind> {
        let offset = usize::try_from(n).map_err(|_| FaultKind::InvalidOperand(n))?;
        if offset >= self.values.len() {
            return Err(FaultKind::StackUnderflow);
        }
        let value = self.values[self.values.len() - 1 - offset];
        self.push(value);
        Ok(())
    }

    /// Exchange the top two values
    pub fn swap(&mut self) -> Result<(), FaultKind> {
        let len = self.values.len();
        if len < 2 {
            return Err(FaultKind::StackUnderflow);
        }
        self.values.swap(len - 1, len - 2);
        Ok(())
    }

    /// Discard the top value
    pub fn drop_top(&mut self) -> Result<(), FaultKind> {
        self.pop().map(|_| ())
    }

    /// Remove the `n` values directly beneath the top, keeping the top
    pub fn slide(&mut self, n: i64) -> Result<(), FaultKind> {
        let len = self.values.len();
        if len == 0 {
            return Err(FaultKind::StackUnderflow);
        }
        let count = usize::try_from(n).map_err(|_| FaultKind::InvalidOperand(n))?;
        if count > len - 1 {
            return Err(FaultKind::StackUnderflow);
        }
        self.values.drain(len - 1 - count..len - 1);
        Ok(())
    }

    /// Get current stack size
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values from bottom to top
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }
}
