pub mod decoder;
pub mod symbol;

pub use decoder::Decoder;
pub use symbol::Symbol;
