//! `SlcanEngine`: single owner of the protocol state of one adapter.
//!
//! The engine holds the channel state machine, the bitrate and filter
//! configuration, the timestamp clock and the status register, and drives the
//! injected collaborators:
//!
//! * `C`: [`CanController`] attached to the bus,
//! * `S`: [`SerialStream`] towards the host,
//! * `K`: [`MillisClock`] sampled for timestamps,
//! * `D`: optional debug sink ([`core::fmt::Write`]).
//!
//! Command handling lives in [`crate::protocol::dispatcher`], the frame
//! arrival side in [`crate::protocol::receive`]. Both are `impl` blocks on
//! this type.
pub mod admin;
pub mod shared;

use core::fmt::Write;

use crate::config::EngineConfig;
use crate::core::BEL;
use crate::error::ErrorKind;
use crate::infra::codec::line::{LineEvent, LineReader};
use crate::protocol::channel::CanChannel;
use crate::protocol::config::{BitrateConfig, FilterConfig};
use crate::protocol::status::{StatusFlags, StatusRegister};
use crate::protocol::timestamp::TimestampClock;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_controller::CanController;
use crate::protocol::transport::traits::millis_clock::MillisClock;
use crate::protocol::transport::traits::serial_stream::{NoDebug, SerialStream};

use admin::AdminHandle;

/// LAWICEL protocol engine.
pub struct SlcanEngine<C, S, K, D = NoDebug> {
    pub(crate) controller: C,
    pub(crate) stream: S,
    pub(crate) clock: K,
    pub(crate) debug: D,
    pub(crate) config: EngineConfig,
    pub(crate) channel: CanChannel,
    pub(crate) bitrate: BitrateConfig,
    pub(crate) filter: FilterConfig,
    pub(crate) timestamp: TimestampClock,
    pub(crate) status: StatusRegister,
    pub(crate) debug_output: bool,
    /// Frame accepted in loopback mode, emitted after the transmit reply.
    pub(crate) pending_loopback: Option<CanFrame>,
}

impl<C, S, K> SlcanEngine<C, S, K, NoDebug>
where
    C: CanController,
    S: SerialStream,
    K: MillisClock,
{
    /// Engine without a debug stream.
    pub fn new(controller: C, stream: S, clock: K, config: EngineConfig) -> Self {
        Self::with_debug(controller, stream, clock, NoDebug, config)
    }
}

impl<C, S, K, D> SlcanEngine<C, S, K, D>
where
    C: CanController,
    S: SerialStream,
    K: MillisClock,
    D: Write,
{
    /// Engine writing diagnostics to `debug` while debug output is enabled.
    pub fn with_debug(controller: C, stream: S, clock: K, debug: D, config: EngineConfig) -> Self {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "slcan engine created: backend {:?}, default bitrate {:?}",
            C::BACKEND,
            config.default_bitrate
        );

        Self {
            controller,
            stream,
            clock,
            debug,
            channel: CanChannel::new(),
            bitrate: BitrateConfig::new(config.default_bitrate),
            filter: FilterConfig::new(),
            timestamp: TimestampClock::new(),
            status: StatusRegister::new(),
            debug_output: config.debug_output,
            pending_loopback: None,
            config,
        }
    }

    //==================================================================================ACCESSORS
    #[inline]
    pub fn channel(&self) -> &CanChannel {
        &self.channel
    }

    #[inline]
    pub fn bitrate(&self) -> &BitrateConfig {
        &self.bitrate
    }

    #[inline]
    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    #[inline]
    pub fn timestamp(&self) -> &TimestampClock {
        &self.timestamp
    }

    /// Status register, shared with whatever raises controller faults.
    #[inline]
    pub fn status(&self) -> &StatusRegister {
        &self.status
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn debug(&self) -> &D {
        &self.debug
    }

    /// Administrative controls not reachable from the wire.
    pub fn admin(&mut self) -> AdminHandle<'_, C, S, K, D> {
        AdminHandle::new(self)
    }

    /// Give the collaborators back.
    pub fn into_parts(self) -> (C, S, K, D) {
        (self.controller, self.stream, self.clock, self.debug)
    }

    //==================================================================================LINE_INPUT
    /// Feed raw host bytes through `reader`, executing each completed line.
    ///
    /// An overlong line is answered with a single BEL once its CR arrives.
    pub fn receive_bytes<const N: usize>(&mut self, reader: &mut LineReader<N>, bytes: &[u8]) {
        for &byte in bytes {
            match reader.push(byte) {
                LineEvent::Pending => {}
                LineEvent::Line(line) => {
                    // The outcome is already on the wire.
                    self.receive_command(line).ok();
                }
                LineEvent::Overflow => self.reject(b'?', ErrorKind::BufferOverflow),
            }
        }
    }

    //==================================================================================OUTPUT
    /// Best-effort write; a refused write is recorded as `TX_FIFO_FULL`.
    pub(crate) fn write_line(&mut self, bytes: &[u8]) {
        if self.stream.write(bytes).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("host stream refused {=usize} bytes", bytes.len());
            self.status.raise(StatusFlags::TX_FIFO_FULL);
        }
    }

    /// Answer a failed command with BEL and log the reason.
    ///
    /// Grammar and state rejections are reported as such; controller faults
    /// are reported as faults of the command that triggered them.
    pub(crate) fn reject(&mut self, command: u8, error: ErrorKind) {
        let reason = if error.is_protocol_error() {
            #[cfg(feature = "defmt")]
            defmt::debug!("command {=u8:#x} rejected: {:?}", command, error);
            "rejected"
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("command {=u8:#x} failed: {:?}", command, error);
            "failed"
        };

        self.debug_log(format_args!(
            "command '{}' {}: {}\r\n",
            char::from(command).escape_default(),
            reason,
            error
        ));

        if self.stream.write_byte(BEL).is_err() {
            self.status.raise(StatusFlags::TX_FIFO_FULL);
        }
    }

    /// Write to the debug sink when enabled. Failures are ignored.
    pub(crate) fn debug_log(&mut self, args: core::fmt::Arguments<'_>) {
        if self.debug_output {
            self.debug.write_fmt(args).ok();
        }
    }
}
