//! Whitespace VM - Core Library
//!
//! Decoder from the three-symbol source alphabet to instructions, and the
//! stack machine that executes them.

pub mod error;
pub mod config;
pub mod bytecode;
pub mod decoder;
pub mod vm;

// Re-export commonly used types
pub use error::{DecodeError, DecodeErrorKind, FaultKind, RuntimeFault, WsvmError, WsvmResult};
pub use config::{ArithmeticMode, DuplicateLabels, VmConfig};
pub use bytecode::{Instruction, Label, Opcode, Program};
pub use decoder::Decoder;
pub use vm::VirtualMachine;
