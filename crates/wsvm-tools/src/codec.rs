//! Binary Codec
//!
//! Packs source symbols into bits: space is `0`, tab is `10`, linefeed is
//! `11`, most significant bit first, the last byte zero-padded. Comment
//! bytes are not preserved. The exact bit count travels with the payload so
//! padding never decodes into extra symbols.

use thiserror::Error;
use tracing::debug;

use wsvm_core::decoder::Symbol;

/// Packed file magic: "WSPK"
pub const PACKED_MAGIC: [u8; 4] = *b"WSPK";

/// Supported container version
pub const PACKED_VERSION: u8 = 1;

/// magic + version + reserved + bit count
const HEADER_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("packed data is too short")]
    TooShort,
    #[error("invalid packed magic number")]
    InvalidMagic,
    #[error("unsupported packed version {0}")]
    UnsupportedVersion(u8),
    #[error("payload holds {available} bytes but {bits} bits were declared")]
    Truncated { bits: u64, available: usize },
    #[error("{0} unexpected bytes after the payload")]
    TrailingData(usize),
}

/// Symbols packed into bits, with the number of meaningful bits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedProgram {
    bit_len: u64,
    bytes: Vec<u8>,
}

impl PackedProgram {
    /// Number of meaningful bits; everything after is padding
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes
    }

    /// Serialize with the container header
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.bytes.len());
        buf.extend(&PACKED_MAGIC);
        buf.push(PACKED_VERSION);
        buf.extend(&[0u8; 3]); // reserved
        buf.extend(&self.bit_len.to_be_bytes());
        buf.extend(&self.bytes);
        buf
    }

    /// Parse and validate a container produced by `to_bytes`
    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < HEADER_LEN {
            return Err(CodecError::TooShort);
        }

        let mut cursor = 0;

        if read_array::<4>(data, &mut cursor)? != PACKED_MAGIC {
            return Err(CodecError::InvalidMagic);
        }

        let [version] = read_array::<1>(data, &mut cursor)?;
        if version != PACKED_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }

        // Reserved
        read_array::<3>(data, &mut cursor)?;

        let bit_len = u64::from_be_bytes(read_array::<8>(data, &mut cursor)?);
        let payload = &data[cursor..];
        let needed = byte_len(bit_len);
        if (payload.len() as u64) < needed {
            return Err(CodecError::Truncated {
                bits: bit_len,
                available: payload.len(),
            });
        }
        if payload.len() as u64 > needed {
            return Err(CodecError::TrailingData(payload.len() - needed as usize));
        }

        Ok(PackedProgram {
            bit_len,
            bytes: payload.to_vec(),
        })
    }
}

fn read_array<const N: usize>(bytes: &[u8], cursor: &mut usize) -> Result<[u8; N], CodecError> {
    let end = *cursor + N;
    let slice = bytes.get(*cursor..end).ok_or(CodecError::TooShort)?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    *cursor = end;
    Ok(out)
}

fn byte_len(bits: u64) -> u64 {
    bits / 8 + u64::from(bits % 8 != 0)
}

struct BitWriter {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl BitWriter {
    fn write(&mut self, bit: bool) {
        let offset = (self.bit_len % 8) as u32;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    bit_len: u64,
    position: u64,
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.position >= self.bit_len {
            return None;
        }
        let byte = *self.bytes.get((self.position / 8) as usize)?;
        let bit = byte & (0x80 >> (self.position % 8)) != 0;
        self.position += 1;
        Some(bit)
    }
}

/// Pack the significant symbols of `source`; other bytes are dropped
pub fn pack(source: &[u8]) -> PackedProgram {
    let mut writer = BitWriter {
        bytes: Vec::new(),
        bit_len: 0,
    };
    for symbol in source.iter().filter_map(|&b| Symbol::from_byte(b)) {
        match symbol {
            Symbol::Space => writer.write(false),
            Symbol::Tab => {
                writer.write(true);
                writer.write(false);
            }
            Symbol::LineFeed => {
                writer.write(true);
                writer.write(true);
            }
        }
    }
    debug!(
        source_bytes = source.len(),
        bits = writer.bit_len,
        "packed source"
    );
    PackedProgram {
        bit_len: writer.bit_len,
        bytes: writer.bytes,
    }
}

/// Expand packed bits back into source symbols
pub fn unpack(packed: &PackedProgram) -> Vec<u8> {
    let mut bits = BitReader {
        bytes: &packed.bytes,
        bit_len: packed.bit_len,
        position: 0,
    };
    let mut out = Vec::new();
    while let Some(bit) = bits.next() {
        let symbol = if !bit {
            Symbol::Space
        } else {
            match bits.next() {
                Some(false) => Symbol::Tab,
                Some(true) => Symbol::LineFeed,
                // a lone trailing `1` carries no symbol
                None => break,
            }
        };
        out.push(symbol.as_byte());
    }
    out
}
