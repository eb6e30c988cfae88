//! Input decoding for READC / READI

use std::io::{self, BufRead, ErrorKind};

use crate::error::FaultKind;

/// End-of-input value pushed by READC
pub const END_OF_INPUT: i64 = -1;

fn io_fault(err: io::Error) -> FaultKind {
    FaultKind::Io(err.to_string())
}

/// Read a single byte, or `END_OF_INPUT`
pub(crate) fn read_char<R: BufRead>(input: &mut R) -> Result<i64, FaultKind> {
    let byte = match peek(input)? {
        Some(byte) => byte,
        None => return Ok(END_OF_INPUT),
    };
    input.consume(1);
    Ok(i64::from(byte))
}

/// Read a decimal integer after skipping ASCII whitespace.
///
/// The byte that ends the number is left in the input.
pub(crate) fn read_integer<R: BufRead>(input: &mut R) -> Result<i64, FaultKind> {
    while let Some(byte) = peek(input)? {
        if !byte.is_ascii_whitespace() {
            break;
        }
        input.consume(1);
    }

    let mut text = String::new();
    match peek(input)? {
        None => return Err(FaultKind::InvalidInput("end of input".to_string())),
        Some(sign @ (b'+' | b'-')) => {
            text.push(char::from(sign));
            input.consume(1);
        }
        Some(_) => {}
    }

    while let Some(byte) = peek(input)? {
        if !byte.is_ascii_digit() {
            break;
        }
        text.push(char::from(byte));
        input.consume(1);
    }

    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return Err(FaultKind::InvalidInput("expected a decimal integer".to_string()));
    }
    text.parse::<i64>()
        .map_err(|_| FaultKind::InvalidInput(format!("{} is out of range", text)))
}

fn peek<R: BufRead>(input: &mut R) -> Result<Option<u8>, FaultKind> {
    loop {
        match input.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_fault(e)),
        }
    }
}
