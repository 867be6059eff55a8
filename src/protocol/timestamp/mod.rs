//! Millisecond timestamp appended to received frames when `Z1` is active.
//!
//! The counter starts at 0 on every open and wraps at [`TIMESTAMP_LIMIT`].
//! It is read when a line is formatted, not when a command is decoded.
use embassy_time::Instant;

use crate::core::TIMESTAMP_LIMIT;

/// Fold elapsed milliseconds into the 16-bit wire range.
#[inline]
pub fn wrap_millis(elapsed_ms: u64) -> u16 {
    (elapsed_ms % TIMESTAMP_LIMIT as u64) as u16
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampClock {
    enabled: bool,
    opened_at: Option<Instant>,
}

impl TimestampClock {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            opened_at: None,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Restart counting from `now` (channel open).
    pub fn start(&mut self, now: Instant) {
        self.opened_at = Some(now);
    }

    /// Forget the open instant (channel close).
    pub fn stop(&mut self) {
        self.opened_at = None;
    }

    /// Milliseconds since open, wrapped. 0 while the channel is closed.
    pub fn sample(&self, now: Instant) -> u16 {
        self.opened_at
            .and_then(|opened| now.checked_duration_since(opened))
            .map_or(0, |elapsed| wrap_millis(elapsed.as_millis()))
    }

    /// Suffix value for an outgoing frame line, `None` when disabled.
    pub fn suffix(&self, now: Instant) -> Option<u16> {
        self.enabled.then(|| self.sample(now))
    }
}
