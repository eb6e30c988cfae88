//! Source Emitter
//!
//! Writes instructions back out in the three-symbol source alphabet, so
//! programs built in Rust can be saved, packed, or fed to the decoder.

use wsvm_core::decoder::Symbol;
use wsvm_core::{Instruction, Label, Program};

use Symbol::{LineFeed as L, Space as S, Tab as T};

/// Render a whole program as source text
pub fn to_source(program: &Program) -> Vec<u8> {
    let mut out = Vec::new();
    for instruction in program {
        emit_instruction(instruction, &mut out);
    }
    out
}

/// Append the symbols of one instruction
pub fn emit_instruction(instruction: &Instruction, out: &mut Vec<u8>) {
    let mut put = |symbols: &[Symbol]| out.extend(symbols.iter().map(|s| s.as_byte()));
    match *instruction {
        Instruction::Push(v) => {
            put(&[S, S]);
            put(&signed(v));
        }
        Instruction::Dup => put(&[S, L, S]),
        Instruction::Copy(n) => {
            put(&[S, T, S]);
            put(&signed(n));
        }
        Instruction::Swap => put(&[S, L, T]),
        Instruction::Drop => put(&[S, L, L]),
        Instruction::Slide(n) => {
            put(&[S, T, L]);
            put(&signed(n));
        }

        Instruction::Add => put(&[T, S, S, S]),
        Instruction::Sub => put(&[T, S, S, T]),
        Instruction::Mul => put(&[T, S, S, L]),
        Instruction::Div => put(&[T, S, T, S]),
        Instruction::Mod => put(&[T, S, T, T]),

        Instruction::Store => put(&[T, T, S]),
        Instruction::Retrieve => put(&[T, T, T]),

        Instruction::Label(l) => {
            put(&[L, S, S]);
            put(&label(l));
        }
        Instruction::Call(l) => {
            put(&[L, S, T]);
            put(&label(l));
        }
        Instruction::Jump(l) => {
            put(&[L, S, L]);
            put(&label(l));
        }
        Instruction::JumpZero(l) => {
            put(&[L, T, S]);
            put(&label(l));
        }
        Instruction::JumpNegative(l) => {
            put(&[L, T, T]);
            put(&label(l));
        }
        Instruction::Return => put(&[L, T, L]),
        Instruction::End => put(&[L, L, L]),

        Instruction::PrintChar => put(&[T, L, S, S]),
        Instruction::PrintInt => put(&[T, L, S, T]),
        Instruction::ReadChar => put(&[T, L, T, S]),
        Instruction::ReadInt => put(&[T, L, T, T]),
    }
}

fn signed(value: i64) -> Vec<Symbol> {
    let sign = if value < 0 { T } else { S };
    let mut symbols = vec![sign];
    symbols.extend(magnitude(value.unsigned_abs()));
    symbols
}

fn label(label: Label) -> Vec<Symbol> {
    magnitude(label.0)
}

/// Binary digits without leading zeros, then the terminator
fn magnitude(value: u64) -> Vec<Symbol> {
    let width = u64::BITS - value.leading_zeros();
    let mut symbols: Vec<Symbol> = (0..width)
        .rev()
        .map(|bit| if value >> bit & 1 == 1 { T } else { S })
        .collect();
    symbols.push(L);
    symbols
}
