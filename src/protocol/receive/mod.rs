//! Receive pipeline: frames coming from the bus (or from loopback) on their
//! way to the host, plus the transmit path they share.
//!
//! Two entry points exist. [`SlcanEngine::poll_receive`] suits a main loop;
//! [`SlcanEngine::process_interrupt`] is meant for the controller interrupt
//! and also folds the controller fault flags into the status register.
use core::fmt::Write;

use crate::error::{ControllerFault, ErrorKind};
use crate::protocol::codec::create_transmit;
use crate::protocol::engine::SlcanEngine;
use crate::protocol::status::StatusFlags;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_controller::{CanController, InterruptFlags};
use crate::protocol::transport::traits::millis_clock::MillisClock;
use crate::protocol::transport::traits::serial_stream::SerialStream;

/// Status bits implied by a set of interrupt flags.
///
/// `RX_OVERRUN` is not mapped here: a lost frame is accounted through
/// [`StatusRegister::record_dropped`](crate::protocol::status::StatusRegister::record_dropped),
/// the same way polling reports controller backlog.
pub fn status_from_interrupt(flags: InterruptFlags) -> StatusFlags {
    let mut status = StatusFlags::empty();
    if flags.contains(InterruptFlags::ERROR) {
        status |= StatusFlags::ERROR_WARNING;
    }
    if flags.contains(InterruptFlags::MESSAGE_ERROR) {
        status |= StatusFlags::BUS_ERROR;
    }
    if flags.contains(InterruptFlags::ERROR_PASSIVE) {
        status |= StatusFlags::ERROR_PASSIVE;
    }
    if flags.contains(InterruptFlags::ARBITRATION_LOST) {
        status |= StatusFlags::ARBITRATION_LOST;
    }
    status
}

impl<C, S, K, D> SlcanEngine<C, S, K, D>
where
    C: CanController,
    S: SerialStream,
    K: MillisClock,
    D: Write,
{
    //==================================================================================POLL
    /// Forward at most one pending frame to the host.
    ///
    /// Does nothing while the channel is closed. Frames the controller
    /// dropped since the last call are accounted in the status register.
    pub fn poll_receive(&mut self) -> Result<(), ErrorKind> {
        if !self.channel.is_open() {
            return Ok(());
        }

        self.status.record_dropped(self.controller.take_dropped());

        match self.controller.try_receive()? {
            Some(frame) => self.receive_can_frame(&frame),
            None => Ok(()),
        }
    }

    //==================================================================================INTERRUPT
    /// Service the controller interrupt.
    ///
    /// Fault flags are recorded before any frame is read. A pending frame is
    /// forwarded, then a message error or error flag is reported to the
    /// caller as [`ControllerFault::Merrf`] or [`ControllerFault::Errif`].
    pub fn process_interrupt(&mut self) -> Result<(), ErrorKind> {
        if !self.channel.is_open() {
            self.debug_log(format_args!("interrupt while channel closed\r\n"));
            return Err(ErrorKind::NotConnected);
        }

        let flags = self.controller.interrupt_flags()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("controller interrupt {=u8:#x}", flags.bits());

        self.status.raise(status_from_interrupt(flags));
        if flags.contains(InterruptFlags::RX_OVERRUN) {
            self.status.record_dropped(1);
        }
        if flags.contains(InterruptFlags::WAKE) {
            #[cfg(feature = "defmt")]
            defmt::debug!("controller wake-up");
            self.debug_log(format_args!("controller wake-up interrupt\r\n"));
        }

        if flags.contains(InterruptFlags::RX_PENDING) {
            if let Some(frame) = self.controller.try_receive()? {
                self.receive_can_frame(&frame)?;
            }
        }

        if flags.contains(InterruptFlags::MESSAGE_ERROR) {
            #[cfg(feature = "defmt")]
            defmt::warn!("controller message error");
            return Err(ControllerFault::Merrf.into());
        }
        if flags.contains(InterruptFlags::ERROR) {
            #[cfg(feature = "defmt")]
            defmt::warn!("controller error interrupt");
            return Err(ControllerFault::Errif.into());
        }
        Ok(())
    }

    //==================================================================================EMIT
    /// Write a received frame to the host, timestamped if `Z1` is active.
    pub fn receive_can_frame(&mut self, frame: &CanFrame) -> Result<(), ErrorKind> {
        let timestamp = self.timestamp.suffix(self.clock.now());
        let line = create_transmit(frame, timestamp)?;
        self.write_line(line.as_bytes());
        Ok(())
    }

    //==================================================================================SEND
    /// Transmit a frame on behalf of board code, outside the command stream.
    ///
    /// Same rules as a `t`/`T`/`r`/`R` command, without a reply line. In
    /// loopback mode the frame goes straight back to the host.
    pub fn send_frame(&mut self, frame: &CanFrame) -> Result<(), ErrorKind> {
        self.channel.ensure_transmit()?;
        self.transmit(*frame)?;
        self.flush_loopback();
        Ok(())
    }

    /// Hand a validated frame to the controller, or queue it for loopback.
    pub(crate) fn transmit(&mut self, frame: CanFrame) -> Result<(), ErrorKind> {
        if self.channel.is_loopback() {
            self.pending_loopback = Some(frame);
            return Ok(());
        }
        self.controller.send(&frame).map_err(|fault| {
            #[cfg(feature = "defmt")]
            defmt::warn!("controller refused frame {}", frame);
            ErrorKind::from(fault)
        })
    }

    /// Emit the frame queued by loopback, if any.
    pub(crate) fn flush_loopback(&mut self) {
        if let Some(frame) = self.pending_loopback.take() {
            // The reply line capacity covers every frame.
            self.receive_can_frame(&frame).ok();
        }
    }
}
