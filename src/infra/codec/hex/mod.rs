//! ASCII hexadecimal reader over a received command line.
//!
//! Every read checks the remaining input before consuming anything, so a
//! field that would run past the end of the line is rejected as a whole
//! instead of being decoded partially.
use crate::error::ErrorKind;

/// Upper-case digit alphabet used for every outgoing line.
pub const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Widest field read in one call (an extended identifier).
const MAX_FIELD_DIGITS: usize = 8;

/// Decode one hex digit, case-insensitive.
#[inline]
pub fn unhex(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        _ => None,
    }
}

/// Encode the low nibble of `value` as an upper-case digit.
#[inline]
pub fn hex_digit(value: u8) -> u8 {
    HEX_DIGITS[(value & 0x0F) as usize]
}

/// Cursor reading fixed-width hex fields from a byte slice.
#[derive(Debug)]
pub struct HexReader<'a> {
    input: &'a [u8],
    cursor: usize,
}

impl<'a> HexReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, cursor: 0 }
    }

    /// Bytes not consumed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.cursor
    }

    /// Current position inside the line.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Take one raw byte.
    pub fn read_byte(&mut self) -> Result<u8, ErrorKind> {
        let byte = *self
            .input
            .get(self.cursor)
            .ok_or(ErrorKind::InvalidCommand)?;
        self.cursor += 1;
        Ok(byte)
    }

    /// Read `digits` hex characters (1 to 8) as a big-endian value.
    pub fn read_hex(&mut self, digits: usize) -> Result<u32, ErrorKind> {
        if digits == 0 || digits > MAX_FIELD_DIGITS || self.remaining() < digits {
            return Err(ErrorKind::InvalidCommand);
        }

        let field = &self.input[self.cursor..self.cursor + digits];
        let mut value = 0u32;
        for &digit in field {
            let nibble = unhex(digit).ok_or(ErrorKind::InvalidCommand)?;
            value = (value << 4) | nibble as u32;
        }

        self.cursor += digits;
        Ok(value)
    }

    /// Read a single nibble.
    pub fn read_u4(&mut self) -> Result<u8, ErrorKind> {
        self.read_hex(1).map(|v| v as u8)
    }

    /// Read one byte encoded as two digits.
    pub fn read_u8(&mut self) -> Result<u8, ErrorKind> {
        self.read_hex(2).map(|v| v as u8)
    }

    /// Fails unless the whole line has been consumed.
    pub fn finish(&self) -> Result<(), ErrorKind> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(ErrorKind::InvalidCommand)
        }
    }
}
