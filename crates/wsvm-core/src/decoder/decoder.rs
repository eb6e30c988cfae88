//! Instruction Decoder
//!
//! Turns a byte stream into instructions by prefix-matching the symbol
//! sequence. Each instruction group is resolved by its own function; a
//! sequence outside the opcode table is a `DecodeError` at the offending
//! symbol. End of stream between instructions ends decoding normally.

use std::io::Read;

use tracing::trace;

use super::symbol::{Symbol, SymbolReader};
use crate::bytecode::{Instruction, Label};
use crate::error::{DecodeError, DecodeErrorKind};

/// Streaming instruction decoder
pub struct Decoder<R> {
    reader: SymbolReader<R>,
}

impl<R: Read> Decoder<R> {
    pub fn new(source: R) -> Self {
        Decoder {
            reader: SymbolReader::new(source),
        }
    }

    /// Decode the next instruction; `Ok(None)` once the stream is exhausted.
    ///
    /// After an error the cursor rests just past the offending symbol, so a
    /// caller may keep decoding from there.
    pub fn next_instruction(&mut self) -> Result<Option<Instruction>, DecodeError> {
        let Some(first) = self.reader.next_symbol()? else {
            return Ok(None);
        };

        let instruction = match first {
            Symbol::Space => stack(&mut self.reader)?,
            Symbol::Tab => match self.reader.expect_symbol()? {
                Symbol::Space => arithmetic(&mut self.reader)?,
                Symbol::Tab => heap(&mut self.reader)?,
                Symbol::LineFeed => io(&mut self.reader)?,
            },
            Symbol::LineFeed => flow(&mut self.reader)?,
        };

        let (line, column) = self.reader.position();
        trace!(line, column, %instruction, "decoded instruction");
        Ok(Some(instruction))
    }

    /// True once the physical end of the stream has been reached
    pub fn is_eof(&self) -> bool {
        self.reader.is_eof()
    }

    /// Current 1-based (line, column) of the cursor
    pub fn position(&self) -> (usize, usize) {
        self.reader.position()
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Instruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_instruction().transpose()
    }
}

fn unassigned<R: Read>(reader: &SymbolReader<R>) -> DecodeError {
    reader.error_at_symbol(DecodeErrorKind::UnassignedSequence)
}

// [Space]
fn stack<R: Read>(reader: &mut SymbolReader<R>) -> Result<Instruction, DecodeError> {
    match reader.expect_symbol()? {
        Symbol::Space => Ok(Instruction::Push(signed(reader)?)),
        Symbol::Tab => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::Copy(signed(reader)?)),
            Symbol::Tab => Err(unassigned(reader)),
            Symbol::LineFeed => Ok(Instruction::Slide(signed(reader)?)),
        },
        Symbol::LineFeed => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::Dup),
            Symbol::Tab => Ok(Instruction::Swap),
            Symbol::LineFeed => Ok(Instruction::Drop),
        },
    }
}

// [Tab][Space]
fn arithmetic<R: Read>(reader: &mut SymbolReader<R>) -> Result<Instruction, DecodeError> {
    match reader.expect_symbol()? {
        Symbol::Space => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::Add),
            Symbol::Tab => Ok(Instruction::Sub),
            Symbol::LineFeed => Ok(Instruction::Mul),
        },
        Symbol::Tab => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::Div),
            Symbol::Tab => Ok(Instruction::Mod),
            Symbol::LineFeed => Err(unassigned(reader)),
        },
        Symbol::LineFeed => Err(unassigned(reader)),
    }
}

// [Tab][Tab]
fn heap<R: Read>(reader: &mut SymbolReader<R>) -> Result<Instruction, DecodeError> {
    match reader.expect_symbol()? {
        Symbol::Space => Ok(Instruction::Store),
        Symbol::Tab => Ok(Instruction::Retrieve),
        Symbol::LineFeed => Err(unassigned(reader)),
    }
}

// [LF]
fn flow<R: Read>(reader: &mut SymbolReader<R>) -> Result<Instruction, DecodeError> {
    match reader.expect_symbol()? {
        Symbol::Space => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::Label(label(reader)?)),
            Symbol::Tab => Ok(Instruction::Call(label(reader)?)),
            Symbol::LineFeed => Ok(Instruction::Jump(label(reader)?)),
        },
        Symbol::Tab => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::JumpZero(label(reader)?)),
            Symbol::Tab => Ok(Instruction::JumpNegative(label(reader)?)),
            Symbol::LineFeed => Ok(Instruction::Return),
        },
        Symbol::LineFeed => match reader.expect_symbol()? {
            Symbol::LineFeed => Ok(Instruction::End),
            Symbol::Space | Symbol::Tab => Err(unassigned(reader)),
        },
    }
}

// [Tab][LF]
fn io<R: Read>(reader: &mut SymbolReader<R>) -> Result<Instruction, DecodeError> {
    match reader.expect_symbol()? {
        Symbol::Space => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::PrintChar),
            Symbol::Tab => Ok(Instruction::PrintInt),
            Symbol::LineFeed => Err(unassigned(reader)),
        },
        Symbol::Tab => match reader.expect_symbol()? {
            Symbol::Space => Ok(Instruction::ReadChar),
            Symbol::Tab => Ok(Instruction::ReadInt),
            Symbol::LineFeed => Err(unassigned(reader)),
        },
        Symbol::LineFeed => Err(unassigned(reader)),
    }
}

/// Sign symbol, then magnitude bits terminated by LF
fn signed<R: Read>(reader: &mut SymbolReader<R>) -> Result<i64, DecodeError> {
    let negative = match reader.expect_symbol()? {
        Symbol::Space => false,
        Symbol::Tab => true,
        Symbol::LineFeed => return Err(reader.error_at_symbol(DecodeErrorKind::MissingSign)),
    };
    let bits = i128::from(magnitude(reader)?);
    let value = if negative { -bits } else { bits };
    i64::try_from(value).map_err(|_| reader.error_at_symbol(DecodeErrorKind::LiteralOverflow))
}

fn label<R: Read>(reader: &mut SymbolReader<R>) -> Result<Label, DecodeError> {
    magnitude(reader).map(Label)
}

/// Unsigned binary, most significant bit first, terminated by LF
fn magnitude<R: Read>(reader: &mut SymbolReader<R>) -> Result<u64, DecodeError> {
    let mut value: u64 = 0;
    loop {
        let bit = match reader.expect_symbol()? {
            Symbol::Space => 0,
            Symbol::Tab => 1,
            Symbol::LineFeed => return Ok(value),
        };
        value = value
            .checked_mul(2)
            .and_then(|v| v.checked_add(bit))
            .ok_or_else(|| reader.error_at_symbol(DecodeErrorKind::LiteralOverflow))?;
    }
}
