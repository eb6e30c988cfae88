//! Source Alphabet
//!
//! Reduces a byte stream to the three significant symbols, tracking the
//! source position of each one. Every other byte is comment.

use std::io::{self, BufReader, Bytes, Read};

use crate::error::{DecodeError, DecodeErrorKind};

/// Significant source symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Space,
    Tab,
    LineFeed,
}

impl Symbol {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b' ' => Some(Symbol::Space),
            b'\t' => Some(Symbol::Tab),
            b'\n' => Some(Symbol::LineFeed),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Symbol::Space => b' ',
            Symbol::Tab => b'\t',
            Symbol::LineFeed => b'\n',
        }
    }
}

/// Symbol cursor over a byte stream
pub(crate) struct SymbolReader<R> {
    bytes: Bytes<BufReader<R>>,
    line: usize,
    column: usize,
    // position of the most recently returned symbol
    last: (usize, usize),
    eof: bool,
}

impl<R: Read> SymbolReader<R> {
    pub(crate) fn new(source: R) -> Self {
        SymbolReader {
            bytes: BufReader::new(source).bytes(),
            line: 1,
            column: 0,
            last: (1, 0),
            eof: false,
        }
    }

    /// Next significant symbol, or `None` at the physical end of stream
    pub(crate) fn next_symbol(&mut self) -> Result<Option<Symbol>, DecodeError> {
        if self.eof {
            return Ok(None);
        }
        loop {
            let byte = match self.bytes.next() {
                None => {
                    self.eof = true;
                    return Ok(None);
                }
                Some(Err(e)) => return Err(self.read_failure(e)),
                Some(Ok(byte)) => byte,
            };
            self.column += 1;
            if let Some(symbol) = Symbol::from_byte(byte) {
                self.last = (self.line, self.column);
                if symbol == Symbol::LineFeed {
                    self.line += 1;
                    self.column = 0;
                }
                return Ok(Some(symbol));
            }
        }
    }

    /// Like `next_symbol`, but end of stream is an error
    pub(crate) fn expect_symbol(&mut self) -> Result<Symbol, DecodeError> {
        match self.next_symbol()? {
            Some(symbol) => Ok(symbol),
            None => Err(self.error_at_end(DecodeErrorKind::UnexpectedEnd)),
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }

    /// Position one past the last byte consumed
    pub(crate) fn position(&self) -> (usize, usize) {
        (self.line, self.column + 1)
    }

    /// Error located at the most recently read symbol
    pub(crate) fn error_at_symbol(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError {
            kind,
            line: self.last.0,
            column: self.last.1,
        }
    }

    pub(crate) fn error_at_end(&self, kind: DecodeErrorKind) -> DecodeError {
        let (line, column) = self.position();
        DecodeError { kind, line, column }
    }

    fn read_failure(&mut self, err: io::Error) -> DecodeError {
        // a failing stream is not retried
        self.eof = true;
        self.error_at_end(DecodeErrorKind::Io(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comment_bytes_and_tracks_columns() {
        let mut reader = SymbolReader::new(&b"a \r\tx\n\n"[..]);
        assert_eq!(reader.next_symbol().unwrap(), Some(Symbol::Space));
        assert_eq!(reader.last, (1, 2));
        assert_eq!(reader.next_symbol().unwrap(), Some(Symbol::Tab));
        assert_eq!(reader.last, (1, 4));
        assert_eq!(reader.next_symbol().unwrap(), Some(Symbol::LineFeed));
        assert_eq!(reader.last, (1, 6));
        assert_eq!(reader.next_symbol().unwrap(), Some(Symbol::LineFeed));
        assert_eq!(reader.last, (2, 1));
        assert_eq!(reader.next_symbol().unwrap(), None);
        assert!(reader.is_eof());
        assert_eq!(reader.position(), (3, 1));
    }
}
