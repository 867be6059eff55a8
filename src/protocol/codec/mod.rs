//! Frame codec: ASCII transmit commands (`t`, `T`, `r`, `R`) to binary
//! frames and back.
//!
//! ```text
//! t iii l dd..    standard data frame      (3 id digits)
//! T iiiiiiii l dd.. extended data frame    (8 id digits)
//! r iii l         standard remote frame
//! R iiiiiiii l    extended remote frame
//! ```
//! Outgoing lines use the same grammar, upper-case, with an optional
//! four-digit timestamp before the CR.
use embedded_can::{ExtendedId, Id, StandardId};

use crate::core::{
    CAN_MAX_DLEN, CMD_MAX_LENGTH, EXTENDED_ID_DIGITS, HEX_PER_BYTE, MIN_MESSAGE_LENGTH,
    STANDARD_ID_DIGITS, TIMESTAMP_DIGITS,
};
use crate::error::ErrorKind;
use crate::infra::codec::hex::HexReader;
use crate::infra::codec::line::ResponseLine;
use crate::protocol::transport::can_frame::CanFrame;

//==================================================================================FRAME_KIND
/// Identifier width and frame type, as encoded by the command letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameKind {
    pub extended: bool,
    pub remote: bool,
}

impl FrameKind {
    /// Decode the command letter: lower case is standard, upper case extended.
    pub const fn from_command(command: u8) -> Option<Self> {
        match command {
            b't' => Some(Self::new(false, false)),
            b'T' => Some(Self::new(true, false)),
            b'r' => Some(Self::new(false, true)),
            b'R' => Some(Self::new(true, true)),
            _ => None,
        }
    }

    const fn new(extended: bool, remote: bool) -> Self {
        Self { extended, remote }
    }

    pub fn of(frame: &CanFrame) -> Self {
        Self::new(frame.is_extended(), frame.is_remote())
    }

    pub const fn command(self) -> u8 {
        match (self.extended, self.remote) {
            (false, false) => b't',
            (true, false) => b'T',
            (false, true) => b'r',
            (true, true) => b'R',
        }
    }

    pub const fn id_digits(self) -> usize {
        if self.extended {
            EXTENDED_ID_DIGITS
        } else {
            STANDARD_ID_DIGITS
        }
    }

    /// Length of the command up to and including the dlc digit.
    pub const fn header_len(self) -> usize {
        1 + self.id_digits() + 1
    }
}

//==================================================================================PARSE
/// Decode a transmit command line (terminator excluded).
///
/// * fewer characters than the shortest transmit command, bad command letter,
///   non-hex digit, id wider than its format, or a payload whose digit count
///   differs from `2 * dlc`: [`ErrorKind::InvalidCommand`]
/// * more than [`CMD_MAX_LENGTH`] characters, or dlc above 8:
///   [`ErrorKind::BufferOverflow`]
pub fn parse_transmit(line: &[u8]) -> Result<CanFrame, ErrorKind> {
    if line.len() > CMD_MAX_LENGTH {
        return Err(ErrorKind::BufferOverflow);
    }
    if line.len() < MIN_MESSAGE_LENGTH {
        return Err(ErrorKind::InvalidCommand);
    }

    let mut reader = HexReader::new(line);
    let kind = FrameKind::from_command(reader.read_byte()?).ok_or(ErrorKind::InvalidCommand)?;

    let raw_id = reader.read_hex(kind.id_digits())?;
    let id: Id = if kind.extended {
        ExtendedId::new(raw_id).map(Id::Extended)
    } else {
        StandardId::new(raw_id as u16).map(Id::Standard)
    }
    .ok_or(ErrorKind::InvalidCommand)?;

    let dlc = reader.read_u4()? as usize;
    if dlc > CAN_MAX_DLEN {
        return Err(ErrorKind::BufferOverflow);
    }

    let frame = if kind.remote {
        reader.finish()?;
        CanFrame::new_remote_frame(id, dlc)
    } else {
        if reader.remaining() != dlc * HEX_PER_BYTE {
            return Err(ErrorKind::InvalidCommand);
        }
        let mut payload = [0u8; CAN_MAX_DLEN];
        for byte in payload.iter_mut().take(dlc) {
            *byte = reader.read_u8()?;
        }
        CanFrame::new_data(id, &payload[..dlc])
    };

    frame.ok_or(ErrorKind::BufferOverflow)
}

//==================================================================================CREATE
/// Encode a frame as an outgoing line, CR included.
///
/// `timestamp` is the value sampled by the caller at formatting time, or
/// `None` when timestamping is disabled.
pub fn create_transmit(frame: &CanFrame, timestamp: Option<u16>) -> Result<ResponseLine, ErrorKind> {
    let kind = FrameKind::of(frame);
    let mut line = ResponseLine::new();

    line.push(kind.command())?;
    line.push_hex(frame.raw_id(), kind.id_digits())?;
    line.push_hex(frame.dlc() as u32, 1)?;
    for &byte in frame.data() {
        line.push_hex(byte as u32, HEX_PER_BYTE)?;
    }
    if let Some(timestamp) = timestamp {
        line.push_hex(timestamp as u32, TIMESTAMP_DIGITS)?;
    }
    line.terminate()?;

    Ok(line)
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
