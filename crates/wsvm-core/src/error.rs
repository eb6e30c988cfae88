//! Error Types
//!
//! Decode errors carry a source position, runtime faults carry the failing
//! opcode and program counter. Neither is recovered from inside the core.

use std::io;

use thiserror::Error;

use crate::bytecode::{Label, Opcode};

/// Why a symbol sequence could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("unassigned symbol sequence")]
    UnassignedSequence,
    #[error("missing sign symbol in integer literal")]
    MissingSign,
    #[error("unexpected end of stream")]
    UnexpectedEnd,
    #[error("integer literal out of range")]
    LiteralOverflow,
    #[error("read failure: {0}")]
    Io(String),
}

/// Malformed input, reported at the 1-based position of the offending symbol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub line: usize,
    pub column: usize,
}

impl DecodeError {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// What went wrong while executing an instruction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultKind {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("undefined label {0}")]
    UndefinedLabel(Label),
    #[error("return with empty call stack")]
    EmptyCallStack,
    #[error("invalid operand {0}")]
    InvalidOperand(i64),
    #[error("arithmetic overflow")]
    Overflow,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Fatal execution error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at pc {pc} ({opcode})")]
pub struct RuntimeFault {
    pub opcode: Opcode,
    pub pc: usize,
    pub kind: FaultKind,
}

/// Label table construction failure under the strict policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("duplicate {label} at instructions {first} and {second}")]
    Duplicate {
        label: Label,
        first: usize,
        second: usize,
    },
}

#[derive(Debug, Error)]
pub enum WsvmError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("runtime fault: {0}")]
    Fault(#[from] RuntimeFault),
    #[error("label error: {0}")]
    Label(#[from] LabelError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type WsvmResult<T> = Result<T, WsvmError>;
