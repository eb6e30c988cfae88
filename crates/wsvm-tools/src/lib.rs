//! Whitespace VM - Tools
//!
//! Source emitter, disassembler, packed binary codec and sample programs,
//! built on top of `wsvm-core`.

pub mod codec;
pub mod demo;
pub mod disasm;
pub mod emit;

pub use codec::{pack, unpack, CodecError, PackedProgram};
pub use disasm::{disassemble, DisasmError, ErrorMode};
pub use emit::to_source;
