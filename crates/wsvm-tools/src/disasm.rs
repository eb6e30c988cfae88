//! Disassembler
//!
//! One line per decoded instruction with symbolic label names. In tolerant
//! mode a decode error becomes a comment line and decoding carries on from
//! the symbol after the failure; strict mode stops at the first error.

use std::io::{self, Read, Write};

use thiserror::Error;
use tracing::warn;

use wsvm_core::{DecodeError, Decoder, Instruction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    #[default]
    Strict,
    Tolerant,
}

#[derive(Debug, Error)]
pub enum DisasmError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Render a single instruction as one line (no trailing newline)
pub fn render(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Label(_) => instruction.to_string(),
        _ => format!("\t{}", instruction),
    }
}

/// Disassemble `source` into `out`; returns the number of decode errors seen
pub fn disassemble<R: Read, W: Write>(source: R, out: &mut W, mode: ErrorMode) -> Result<usize, DisasmError> {
    let mut errors = 0;
    for decoded in Decoder::new(source) {
        match decoded {
            Ok(instruction) => writeln!(out, "{}", render(&instruction))?,
            Err(err) if mode == ErrorMode::Tolerant => {
                warn!(line = err.line, column = err.column, "skipping undecodable symbols");
                writeln!(out, "\t; error L{}:C{} {}", err.line, err.column, err.message())?;
                errors += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(errors)
}
