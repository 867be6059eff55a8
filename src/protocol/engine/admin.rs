//! Administrative controls of an engine, for board code only.
use core::fmt::Write;

use crate::protocol::transport::traits::can_controller::CanController;
use crate::protocol::transport::traits::millis_clock::MillisClock;
use crate::protocol::transport::traits::serial_stream::SerialStream;

use super::SlcanEngine;

/// Borrowed view on an engine exposing settings the host cannot reach.
pub struct AdminHandle<'a, C, S, K, D> {
    engine: &'a mut SlcanEngine<C, S, K, D>,
}

impl<'a, C, S, K, D> AdminHandle<'a, C, S, K, D>
where
    C: CanController,
    S: SerialStream,
    K: MillisClock,
    D: Write,
{
    pub(super) fn new(engine: &'a mut SlcanEngine<C, S, K, D>) -> Self {
        Self { engine }
    }

    /// Echo transmitted frames back to the host instead of sending them.
    ///
    /// The transmit path changes at once. The controller is put in loopback
    /// mode at the next open.
    pub fn enable_loopback(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("loopback enabled");
        self.engine.channel.set_loopback(true);
    }

    pub fn disable_loopback(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("loopback disabled");
        self.engine.channel.set_loopback(false);
        self.engine.pending_loopback = None;
    }

    pub fn is_loopback(&self) -> bool {
        self.engine.channel.is_loopback()
    }

    /// Toggle diagnostics on the debug stream.
    pub fn set_debug_output(&mut self, enabled: bool) {
        self.engine.debug_output = enabled;
    }

    /// Frames lost to backlog since the previous call.
    pub fn take_dropped_frames(&mut self) -> u32 {
        self.engine.status.take_dropped()
    }
}
