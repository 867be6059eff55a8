//! Channel and mode state machine.
//!
//! ```text
//!            O / L (controller init ok)
//!   Closed ───────────────────────────▶ Open
//!     ▲                                  │
//!     └──────────────── C ───────────────┘
//! ```
//! A controller failure during open leaves the channel closed, so the host
//! may simply retry. Listen-only is chosen at open time; loopback is an
//! administrative flag that may change at any time and takes effect on the
//! transmit path immediately and on the controller mode at the next open.
use crate::error::ErrorKind;
use crate::protocol::config::BitrateSetting;
use crate::protocol::transport::traits::can_controller::{BusMode, CanController};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    #[default]
    Closed,
    Open,
}

/// Channel state plus its two orthogonal mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanChannel {
    state: ChannelState,
    listen_only: bool,
    loopback: bool,
}

impl CanChannel {
    pub const fn new() -> Self {
        Self {
            state: ChannelState::Closed,
            listen_only: false,
            loopback: false,
        }
    }

    #[inline]
    pub fn state(&self) -> ChannelState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    #[inline]
    pub fn is_listen_only(&self) -> bool {
        self.listen_only
    }

    #[inline]
    pub fn is_loopback(&self) -> bool {
        self.loopback
    }

    pub fn set_loopback(&mut self, loopback: bool) {
        self.loopback = loopback;
    }

    /// Configuration commands only apply while closed.
    pub fn ensure_closed(&self) -> Result<(), ErrorKind> {
        if self.is_open() {
            Err(ErrorKind::Connected)
        } else {
            Ok(())
        }
    }

    pub fn ensure_open(&self) -> Result<(), ErrorKind> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ErrorKind::NotConnected)
        }
    }

    /// Checked before the controller is ever asked to send.
    pub fn ensure_transmit(&self) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        if self.listen_only {
            return Err(ErrorKind::ListenOnly);
        }
        Ok(())
    }

    /// Controller mode for an open request. Loopback wins over listen-only.
    pub fn bus_mode(&self, listen_only: bool) -> BusMode {
        if self.loopback {
            BusMode::Loopback
        } else if listen_only {
            BusMode::ListenOnly
        } else {
            BusMode::Normal
        }
    }

    /// Initialise the controller and move to `Open`.
    pub fn open<C: CanController>(
        &mut self,
        controller: &mut C,
        bitrate: BitrateSetting,
        listen_only: bool,
    ) -> Result<(), ErrorKind> {
        self.ensure_closed()?;
        controller.init(bitrate, self.bus_mode(listen_only))?;
        self.state = ChannelState::Open;
        self.listen_only = listen_only;
        Ok(())
    }

    /// Leave the bus. The channel ends up closed even if the controller
    /// reports a fault while doing so.
    pub fn close<C: CanController>(&mut self, controller: &mut C) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        let result = controller.close();
        self.state = ChannelState::Closed;
        self.listen_only = false;
        result.map_err(ErrorKind::from)
    }
}
