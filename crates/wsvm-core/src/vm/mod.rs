pub mod input;
pub mod memory;
pub mod stack;
pub mod vm;

pub use memory::Heap;
pub use vm::VirtualMachine;
