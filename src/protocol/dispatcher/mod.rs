//! Command dispatcher: maps the leading byte of a host line to its handler.
//!
//! Every line goes through the same steps:
//! 1. strip one trailing CR, reject empty and overlong lines;
//! 2. look the command byte up in [`COMMAND_TABLE`];
//! 3. check the line length against the command [`Grammar`];
//! 4. run the handler, which validates everything before touching state and
//!    writes its reply into a [`ResponseLine`];
//! 5. write the reply, or a single BEL on failure.
//!
//! Within a handler, grammar errors come first, then backend capability, then
//! channel state, and only then is the controller called.
use core::fmt::Write;

use crate::core::{CMD_MAX_LENGTH, CR, HEX_PER_BYTE};
use crate::error::{Capability, ErrorKind};
use crate::infra::codec::hex::HexReader;
use crate::infra::codec::line::ResponseLine;
use crate::protocol::codec::{parse_transmit, FrameKind};
use crate::protocol::config::Bitrate;
use crate::protocol::engine::SlcanEngine;
use crate::protocol::transport::traits::can_controller::CanController;
use crate::protocol::transport::traits::millis_clock::MillisClock;
use crate::protocol::transport::traits::serial_stream::SerialStream;

//==================================================================================COMMAND
/// Host commands understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `Sn`
    SetBitrate,
    /// `sxxyy`
    SetBtr,
    /// `O`
    Open,
    /// `L`
    ListenOnly,
    /// `C`
    Close,
    /// `t`, `T`, `r`, `R`
    Transmit(FrameKind),
    /// `F`
    ReadStatus,
    /// `Mxxxxxxxx`
    SetAcceptanceCode,
    /// `mxxxxxxxx`
    SetAcceptanceMask,
    /// `V`
    GetVersion,
    /// `v`
    GetSwVersion,
    /// `N`
    GetSerial,
    /// `Zn`
    TimeStamp,
    /// `E`
    ReadErrorCapture,
    /// `A`
    ReadArbitrationLost,
    /// `Grr`
    ReadRegister,
    /// `Wrrdd`
    WriteRegister,
}

const STANDARD_DATA: FrameKind = FrameKind {
    extended: false,
    remote: false,
};
const EXTENDED_DATA: FrameKind = FrameKind {
    extended: true,
    remote: false,
};
const STANDARD_REMOTE: FrameKind = FrameKind {
    extended: false,
    remote: true,
};
const EXTENDED_REMOTE: FrameKind = FrameKind {
    extended: true,
    remote: true,
};

/// Command byte lookup table.
pub static COMMAND_TABLE: [(u8, Command); 20] = [
    (b'S', Command::SetBitrate),
    (b's', Command::SetBtr),
    (b'O', Command::Open),
    (b'L', Command::ListenOnly),
    (b'C', Command::Close),
    (b't', Command::Transmit(STANDARD_DATA)),
    (b'T', Command::Transmit(EXTENDED_DATA)),
    (b'r', Command::Transmit(STANDARD_REMOTE)),
    (b'R', Command::Transmit(EXTENDED_REMOTE)),
    (b'F', Command::ReadStatus),
    (b'M', Command::SetAcceptanceCode),
    (b'm', Command::SetAcceptanceMask),
    (b'V', Command::GetVersion),
    (b'v', Command::GetSwVersion),
    (b'N', Command::GetSerial),
    (b'Z', Command::TimeStamp),
    (b'E', Command::ReadErrorCapture),
    (b'A', Command::ReadArbitrationLost),
    (b'G', Command::ReadRegister),
    (b'W', Command::WriteRegister),
];

/// Accepted line lengths of a command, terminator excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub min: usize,
    pub max: usize,
}

impl Grammar {
    const fn exact(len: usize) -> Self {
        Self { min: len, max: len }
    }

    pub fn accepts(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Self> {
        COMMAND_TABLE
            .iter()
            .find(|(key, _)| *key == byte)
            .map(|(_, command)| *command)
    }

    /// Length bounds. Data frames are bounded by the line limit here and by
    /// their dlc in [`parse_transmit`], which reports oversize payloads as
    /// overflows.
    pub const fn grammar(self) -> Grammar {
        match self {
            Command::Open
            | Command::ListenOnly
            | Command::Close
            | Command::ReadStatus
            | Command::GetVersion
            | Command::GetSwVersion
            | Command::GetSerial
            | Command::ReadErrorCapture
            | Command::ReadArbitrationLost => Grammar::exact(1),
            Command::SetBitrate | Command::TimeStamp => Grammar::exact(2),
            Command::ReadRegister => Grammar::exact(1 + HEX_PER_BYTE),
            Command::SetBtr | Command::WriteRegister => Grammar::exact(1 + 2 * HEX_PER_BYTE),
            Command::SetAcceptanceCode | Command::SetAcceptanceMask => Grammar::exact(9),
            Command::Transmit(kind) if kind.remote => Grammar::exact(kind.header_len()),
            Command::Transmit(kind) => Grammar {
                min: kind.header_len(),
                max: CMD_MAX_LENGTH,
            },
        }
    }
}

/// Drop one trailing CR, if any.
fn strip_terminator(line: &[u8]) -> &[u8] {
    line.strip_suffix(&[CR]).unwrap_or(line)
}

//==================================================================================DISPATCH
impl<C, S, K, D> SlcanEngine<C, S, K, D>
where
    C: CanController,
    S: SerialStream,
    K: MillisClock,
    D: Write,
{
    /// Execute one host line and answer it on the stream.
    ///
    /// Exactly one of a bare CR, a data line or a BEL is written. A frame
    /// queued by loopback follows the acknowledgement.
    pub fn receive_command(&mut self, line: &[u8]) -> Result<(), ErrorKind> {
        let line = strip_terminator(line);
        let mut reply = ResponseLine::new();

        match self.dispatch(line, &mut reply) {
            Ok(()) => {
                self.write_line(reply.as_bytes());
                self.flush_loopback();
                Ok(())
            }
            Err(error) => {
                self.pending_loopback = None;
                self.reject(line.first().copied().unwrap_or(b' '), error);
                Err(error)
            }
        }
    }

    fn dispatch(&mut self, line: &[u8], reply: &mut ResponseLine) -> Result<(), ErrorKind> {
        if line.len() > CMD_MAX_LENGTH {
            return Err(ErrorKind::BufferOverflow);
        }
        let &key = line.first().ok_or(ErrorKind::UnknownCommand)?;
        let command = Command::from_byte(key).ok_or(ErrorKind::UnknownCommand)?;
        if !command.grammar().accepts(line.len()) {
            return Err(ErrorKind::InvalidCommand);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("command {:?}", command);

        let mut args = HexReader::new(&line[1..]);
        match command {
            Command::Open => self.handle_open(false, reply),
            Command::ListenOnly => self.handle_open(true, reply),
            Command::Close => self.handle_close(reply),
            Command::SetBitrate => self.handle_set_bitrate(&mut args, reply),
            Command::SetBtr => self.handle_set_btr(&mut args, reply),
            Command::Transmit(_) => self.handle_transmit(line, reply),
            Command::SetAcceptanceCode => self.handle_filter(&mut args, true, reply),
            Command::SetAcceptanceMask => self.handle_filter(&mut args, false, reply),
            Command::TimeStamp => self.handle_timestamp(line[1], reply),
            Command::ReadStatus => self.handle_read_status(reply),
            Command::GetVersion => Self::identity(b'V', &self.config.hw_sw_version, reply),
            Command::GetSwVersion => Self::identity(b'v', &self.config.sw_version, reply),
            Command::GetSerial => Self::identity(b'N', &self.config.serial, reply),
            Command::ReadErrorCapture => self.handle_capture(b'E', Capability::ErrorCapture, reply),
            Command::ReadArbitrationLost => {
                self.handle_capture(b'A', Capability::ArbitrationLostCapture, reply)
            }
            Command::ReadRegister => self.handle_read_register(&mut args, reply),
            Command::WriteRegister => self.handle_write_register(&mut args, reply),
        }
    }

    fn require(&self, capability: Capability) -> Result<(), ErrorKind> {
        if self.controller.capabilities().supports(capability) {
            Ok(())
        } else {
            Err(ErrorKind::Unsupported(capability))
        }
    }

    //==================================================================================CHANNEL
    fn handle_open(&mut self, listen_only: bool, reply: &mut ResponseLine) -> Result<(), ErrorKind> {
        self.channel
            .open(&mut self.controller, self.bitrate.current(), listen_only)?;
        self.timestamp.start(self.clock.now());

        #[cfg(feature = "defmt")]
        defmt::info!(
            "channel open ({:?}, listen-only {=bool})",
            self.bitrate.current(),
            listen_only
        );

        reply.terminate()
    }

    fn handle_close(&mut self, reply: &mut ResponseLine) -> Result<(), ErrorKind> {
        self.channel.ensure_open()?;
        let result = self.channel.close(&mut self.controller);
        self.timestamp.stop();

        #[cfg(feature = "defmt")]
        defmt::info!("channel closed");

        result?;
        reply.terminate()
    }

    //==================================================================================CONFIG
    fn handle_set_bitrate(
        &mut self,
        args: &mut HexReader<'_>,
        reply: &mut ResponseLine,
    ) -> Result<(), ErrorKind> {
        let index = args.read_u4()?;
        Bitrate::from_index(index).ok_or(ErrorKind::InvalidCommand)?;
        self.channel.ensure_closed()?;
        self.bitrate.set_preset(index)?;
        reply.terminate()
    }

    fn handle_set_btr(
        &mut self,
        args: &mut HexReader<'_>,
        reply: &mut ResponseLine,
    ) -> Result<(), ErrorKind> {
        let btr0 = args.read_u8()?;
        let btr1 = args.read_u8()?;
        args.finish()?;
        self.require(Capability::RawBitrate)?;
        self.channel.ensure_closed()?;
        self.bitrate.set_raw(btr0, btr1);
        reply.terminate()
    }

    fn handle_filter(
        &mut self,
        args: &mut HexReader<'_>,
        code: bool,
        reply: &mut ResponseLine,
    ) -> Result<(), ErrorKind> {
        let value = args.read_hex(8)?;
        args.finish()?;
        self.channel.ensure_closed()?;
        if code {
            self.filter.set_code(&mut self.controller, value)?;
        } else {
            self.filter.set_mask(&mut self.controller, value)?;
        }
        reply.terminate()
    }

    fn handle_timestamp(&mut self, flag: u8, reply: &mut ResponseLine) -> Result<(), ErrorKind> {
        let enabled = match flag {
            b'0' => false,
            b'1' => true,
            _ => return Err(ErrorKind::InvalidCommand),
        };
        self.timestamp.set_enabled(enabled);
        reply.terminate()
    }

    //==================================================================================TRANSMIT
    fn handle_transmit(&mut self, line: &[u8], reply: &mut ResponseLine) -> Result<(), ErrorKind> {
        let frame = parse_transmit(line)?;
        self.channel.ensure_transmit()?;
        self.transmit(frame)?;
        reply.terminate()
    }

    //==================================================================================QUERIES
    fn handle_read_status(&mut self, reply: &mut ResponseLine) -> Result<(), ErrorKind> {
        let flags = self.status.take();
        reply.push(b'F')?;
        reply.push_hex(flags.bits() as u32, HEX_PER_BYTE)?;
        reply.terminate()
    }

    fn identity(prefix: u8, literal: &[u8; 4], reply: &mut ResponseLine) -> Result<(), ErrorKind> {
        reply.push(prefix)?;
        reply.push_slice(literal)?;
        reply.terminate()
    }

    fn handle_capture(
        &mut self,
        prefix: u8,
        capability: Capability,
        reply: &mut ResponseLine,
    ) -> Result<(), ErrorKind> {
        self.require(capability)?;
        self.channel.ensure_open()?;
        let value = match capability {
            Capability::ArbitrationLostCapture => self.controller.read_arbitration_lost()?,
            _ => self.controller.read_error_capture()?,
        };
        reply.push(prefix)?;
        reply.push_hex(value as u32, HEX_PER_BYTE)?;
        reply.terminate()
    }

    fn handle_read_register(
        &mut self,
        args: &mut HexReader<'_>,
        reply: &mut ResponseLine,
    ) -> Result<(), ErrorKind> {
        let address = args.read_u8()?;
        self.require(Capability::RegisterAccess)?;
        let value = self.controller.read_register(address)?;
        reply.push(b'G')?;
        reply.push_hex(value as u32, HEX_PER_BYTE)?;
        reply.terminate()
    }

    fn handle_write_register(
        &mut self,
        args: &mut HexReader<'_>,
        reply: &mut ResponseLine,
    ) -> Result<(), ErrorKind> {
        let address = args.read_u8()?;
        let value = args.read_u8()?;
        self.require(Capability::RegisterAccess)?;
        self.controller.write_register(address, value)?;
        reply.terminate()
    }
}
