//! Instruction Representation
//!
//! Decoded instructions and the ordered program built from them.
//! This layer contains no execution semantics.

use std::fmt;
use std::io::Read;

use super::opcode::Opcode;
use crate::decoder::Decoder;
use crate::error::DecodeError;

/// Jump target identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(pub u64);

impl From<u64> for Label {
    fn from(id: u64) -> Self {
        Label(id)
    }
}

impl From<Label> for u64 {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label_{}", self.0)
    }
}

/// A single decoded instruction with its operand, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Push(i64),
    Dup,
    Copy(i64),
    Swap,
    Drop,
    Slide(i64),

    Add,
    Sub,
    Mul,
    Div,
    Mod,

    Store,
    Retrieve,

    Label(Label),
    Call(Label),
    Jump(Label),
    JumpZero(Label),
    JumpNegative(Label),
    Return,
    End,

    PrintChar,
    PrintInt,
    ReadChar,
    ReadInt,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Push(_) => Opcode::Push,
            Instruction::Dup => Opcode::Dup,
            Instruction::Copy(_) => Opcode::Copy,
            Instruction::Swap => Opcode::Swap,
            Instruction::Drop => Opcode::Drop,
            Instruction::Slide(_) => Opcode::Slide,

            Instruction::Add => Opcode::Add,
            Instruction::Sub => Opcode::Sub,
            Instruction::Mul => Opcode::Mul,
            Instruction::Div => Opcode::Div,
            Instruction::Mod => Opcode::Mod,

            Instruction::Store => Opcode::Store,
            Instruction::Retrieve => Opcode::Retrieve,

            Instruction::Label(_) => Opcode::Label,
            Instruction::Call(_) => Opcode::Call,
            Instruction::Jump(_) => Opcode::Jump,
            Instruction::JumpZero(_) => Opcode::JumpZero,
            Instruction::JumpNegative(_) => Opcode::JumpNegative,
            Instruction::Return => Opcode::Return,
            Instruction::End => Opcode::End,

            Instruction::PrintChar => Opcode::PrintChar,
            Instruction::PrintInt => Opcode::PrintInt,
            Instruction::ReadChar => Opcode::ReadChar,
            Instruction::ReadInt => Opcode::ReadInt,
        }
    }

    /// Jump target for flow-control instructions
    pub fn label(&self) -> Option<Label> {
        match *self {
            Instruction::Label(l)
            | Instruction::Call(l)
            | Instruction::Jump(l)
            | Instruction::JumpZero(l)
            | Instruction::JumpNegative(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Push(v) | Instruction::Copy(v) | Instruction::Slide(v) => {
                write!(f, "{} {}", self.opcode(), v)
            }
            Instruction::Label(l) => write!(f, "{}:", l),
            _ => match self.label() {
                Some(l) => write!(f, "{} {}", self.opcode(), l),
                None => write!(f, "{}", self.opcode()),
            },
        }
    }
}

/// Ordered instruction sequence; indices form the program counter space
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Program { instructions }
    }

    /// Decode a complete program; the first decode error aborts.
    pub fn decode<R: Read>(source: R) -> Result<Self, DecodeError> {
        let instructions = Decoder::new(source).collect::<Result<Vec<_>, _>>()?;
        Ok(Program { instructions })
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Program::new(instructions)
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Program::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_symbolic_labels() {
        assert_eq!(Instruction::Push(-3).to_string(), "push -3");
        assert_eq!(Instruction::Label(Label(2)).to_string(), "label_2:");
        assert_eq!(Instruction::JumpNegative(Label(7)).to_string(), "jn label_7");
        assert_eq!(Instruction::Return.to_string(), "ret");
    }

    #[test]
    fn decode_stops_at_first_error() {
        // push 1, then an unassigned heap sequence
        let res = Program::decode(&b"   \t\n\t\t\n"[..]);
        assert!(res.is_err());
    }
}
