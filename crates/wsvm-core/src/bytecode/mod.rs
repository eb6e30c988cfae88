pub mod instruction;
pub mod opcode;

pub use instruction::{Instruction, Label, Program};
pub use opcode::Opcode;
