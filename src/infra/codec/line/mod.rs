//! Fixed-capacity line storage: outgoing reply lines and incoming command
//! assembly. Writers refuse to go past capacity; nothing is truncated silently.
use crate::core::{CMD_MAX_LENGTH, CR, RESPONSE_MAX_LENGTH};
use crate::error::ErrorKind;
use crate::infra::codec::hex::hex_digit;

//==================================================================================LINE_BUFFER
/// Stack buffer holding at most `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LineBuffer<const N: usize> {
    data: [u8; N],
    len: usize,
}

/// Any line the engine writes to the host.
pub type ResponseLine = LineBuffer<RESPONSE_MAX_LENGTH>;

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for LineBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineBuffer")
            .field("data", &self.as_bytes())
            .finish()
    }
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left.
    #[inline]
    pub fn remaining(&self) -> usize {
        N - self.len
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) -> Result<(), ErrorKind> {
        if self.len == N {
            return Err(ErrorKind::BufferOverflow);
        }
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append a whole slice, or nothing at all.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        if bytes.len() > self.remaining() {
            return Err(ErrorKind::BufferOverflow);
        }
        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Append the `digits` least significant nibbles of `value`,
    /// zero-padded, upper-case.
    pub fn push_hex(&mut self, value: u32, digits: usize) -> Result<(), ErrorKind> {
        if digits == 0 || digits > 8 || digits > self.remaining() {
            return Err(ErrorKind::BufferOverflow);
        }
        for shift in (0..digits).rev() {
            self.data[self.len] = hex_digit((value >> (shift * 4)) as u8);
            self.len += 1;
        }
        Ok(())
    }

    /// Append the line terminator.
    #[inline]
    pub fn terminate(&mut self) -> Result<(), ErrorKind> {
        self.push(CR)
    }
}

//==================================================================================LINE_READER
/// Result of feeding one byte to a [`LineReader`].
#[derive(Debug, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// No terminator seen yet.
    Pending,
    /// A complete line, terminator excluded.
    Line(&'a [u8]),
    /// The line exceeded capacity; its bytes were dropped up to the terminator.
    Overflow,
}

/// Assembles CR-terminated command lines from a byte stream.
///
/// LF bytes are ignored so hosts sending CR LF are accepted.
#[derive(Debug, Default)]
pub struct LineReader<const N: usize = CMD_MAX_LENGTH> {
    buffer: LineBuffer<N>,
    discarding: bool,
}

impl<const N: usize> LineReader<N> {
    pub const fn new() -> Self {
        Self {
            buffer: LineBuffer::new(),
            discarding: false,
        }
    }

    /// Feed one byte. A returned line stays valid until the next call.
    pub fn push(&mut self, byte: u8) -> LineEvent<'_> {
        match byte {
            CR if self.discarding => {
                self.discarding = false;
                self.buffer.clear();
                LineEvent::Overflow
            }
            CR => {
                let len = self.buffer.len;
                self.buffer.clear();
                LineEvent::Line(&self.buffer.data[..len])
            }
            b'\n' => LineEvent::Pending,
            _ if self.discarding => LineEvent::Pending,
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.discarding = true;
                }
                LineEvent::Pending
            }
        }
    }
}
