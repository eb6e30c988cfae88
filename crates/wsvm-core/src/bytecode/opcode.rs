//! Opcode Definitions
//!
//! Names every operation of the instruction set, grouped the way the
//! source alphabet groups them. This file contains no execution semantics.

use std::fmt;

/// Operation identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Stack manipulation
    Push,
    Dup,
    Copy,
    Swap,
    Drop,
    Slide,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Heap access
    Store,
    Retrieve,

    // Flow control
    Label,
    Call,
    Jump,
    JumpZero,
    JumpNegative,
    Return,
    End,

    // I/O
    PrintChar,
    PrintInt,
    ReadChar,
    ReadInt,
}

impl Opcode {
    /// Lowercase mnemonic used by diagnostics and the disassembler
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Push => "push",
            Opcode::Dup => "dup",
            Opcode::Copy => "copy",
            Opcode::Swap => "swap",
            Opcode::Drop => "drop",
            Opcode::Slide => "slide",

            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Mod => "mod",

            Opcode::Store => "store",
            Opcode::Retrieve => "retrieve",

            Opcode::Label => "label",
            Opcode::Call => "call",
            Opcode::Jump => "jmp",
            Opcode::JumpZero => "jz",
            Opcode::JumpNegative => "jn",
            Opcode::Return => "ret",
            Opcode::End => "end",

            Opcode::PrintChar => "printc",
            Opcode::PrintInt => "printi",
            Opcode::ReadChar => "readc",
            Opcode::ReadInt => "readi",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
