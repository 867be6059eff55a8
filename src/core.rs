//! Protocol constants of the LAWICEL/CANHacker ASCII grammar.
//!
//! Lengths exclude the CR terminator unless stated otherwise.

/// Line terminator for every command and every successful reply.
pub const CR: u8 = b'\r';
/// Single-byte error indicator. Never followed by a terminator.
pub const BEL: u8 = 0x07;

/// Longest accepted command line (`T` + 8 id + 1 dlc + 16 data).
pub const CMD_MAX_LENGTH: usize = 26;
/// Shortest transmit command (`riiil`).
pub const MIN_MESSAGE_LENGTH: usize = 5;

/// Classic CAN payload width.
pub const CAN_MAX_DLEN: usize = 8;
/// Hex characters per payload byte.
pub const HEX_PER_BYTE: usize = 2;

/// Identifier width in hex digits for standard (11-bit) frames.
pub const STANDARD_ID_DIGITS: usize = 3;
/// Identifier width in hex digits for extended (29-bit) frames.
pub const EXTENDED_ID_DIGITS: usize = 8;
/// Timestamp suffix width in hex digits.
pub const TIMESTAMP_DIGITS: usize = 4;

/// Timestamps wrap to 0 once they reach this value (one minute in ms).
pub const TIMESTAMP_LIMIT: u16 = 60_000;

/// Largest line the engine ever writes: a full extended frame plus
/// timestamp and CR.
pub const RESPONSE_MAX_LENGTH: usize = CMD_MAX_LENGTH + TIMESTAMP_DIGITS + 1;

/// Default identity literals answered to `V`, `v` and `N`.
pub const DEFAULT_HW_SW_VERSION: [u8; 4] = *b"1010";
pub const DEFAULT_SW_VERSION: [u8; 4] = *b"0107";
pub const DEFAULT_SERIAL: [u8; 4] = *b"0001";
