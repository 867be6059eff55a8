//! Status flag register shared between the interrupt context and command
//! processing.
//!
//! Producers raise bits through `&self`; the `F` command consumes them with
//! a single swap so that a bit raised concurrently is either part of the
//! value returned or still pending for the next read, never both and never
//! lost. The dropped-frame tally follows the same read-and-clear rule.
//!
//! Targets without native atomics fall back to an `embassy_sync`
//! critical-section mutex.
use bitflags::bitflags;

#[cfg(target_has_atomic = "32")]
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

#[cfg(not(target_has_atomic = "32"))]
use core::cell::Cell;
#[cfg(not(target_has_atomic = "32"))]
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

bitflags! {
    /// Bit layout of the LAWICEL status byte returned by `F`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const RX_FIFO_FULL = 1 << 0;
        const TX_FIFO_FULL = 1 << 1;
        const ERROR_WARNING = 1 << 2;
        const DATA_OVERRUN = 1 << 3;
        const ERROR_PASSIVE = 1 << 5;
        const ARBITRATION_LOST = 1 << 6;
        const BUS_ERROR = 1 << 7;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "StatusFlags({=u8:#x})", self.bits())
    }
}

/// Read-and-clear register of pending fault conditions.
#[derive(Debug)]
pub struct StatusRegister {
    #[cfg(target_has_atomic = "32")]
    flags: AtomicU8,
    #[cfg(target_has_atomic = "32")]
    dropped: AtomicU32,
    #[cfg(not(target_has_atomic = "32"))]
    inner: Mutex<CriticalSectionRawMutex, Cell<(u8, u32)>>,
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRegister {
    pub const fn new() -> Self {
        Self {
            #[cfg(target_has_atomic = "32")]
            flags: AtomicU8::new(0),
            #[cfg(target_has_atomic = "32")]
            dropped: AtomicU32::new(0),
            #[cfg(not(target_has_atomic = "32"))]
            inner: Mutex::new(Cell::new((0, 0))),
        }
    }

    /// Set `flags` without touching the others.
    pub fn raise(&self, flags: StatusFlags) {
        #[cfg(target_has_atomic = "32")]
        {
            self.flags.fetch_or(flags.bits(), Ordering::AcqRel);
        }

        #[cfg(not(target_has_atomic = "32"))]
        self.inner.lock(|cell| {
            let (bits, dropped) = cell.get();
            cell.set((bits | flags.bits(), dropped));
        });
    }

    /// Current value without clearing it.
    pub fn peek(&self) -> StatusFlags {
        #[cfg(target_has_atomic = "32")]
        let bits = self.flags.load(Ordering::Acquire);

        #[cfg(not(target_has_atomic = "32"))]
        let bits = self.inner.lock(|cell| cell.get().0);

        StatusFlags::from_bits_truncate(bits)
    }

    /// Return every bit set up to now and reset the register, as one step.
    pub fn take(&self) -> StatusFlags {
        #[cfg(target_has_atomic = "32")]
        let bits = self.flags.swap(0, Ordering::AcqRel);

        #[cfg(not(target_has_atomic = "32"))]
        let bits = self.inner.lock(|cell| {
            let (bits, dropped) = cell.get();
            cell.set((0, dropped));
            bits
        });

        StatusFlags::from_bits_truncate(bits)
    }

    /// Account for `count` frames lost to backlog and raise `DATA_OVERRUN`.
    pub fn record_dropped(&self, count: u32) {
        if count == 0 {
            return;
        }

        #[cfg(target_has_atomic = "32")]
        {
            self.dropped
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |dropped| {
                    Some(dropped.saturating_add(count))
                })
                .ok();
            self.flags
                .fetch_or(StatusFlags::DATA_OVERRUN.bits(), Ordering::AcqRel);
        }

        #[cfg(not(target_has_atomic = "32"))]
        self.inner.lock(|cell| {
            let (bits, dropped) = cell.get();
            cell.set((
                bits | StatusFlags::DATA_OVERRUN.bits(),
                dropped.saturating_add(count),
            ));
        });
    }

    /// Frames dropped since the previous call.
    pub fn take_dropped(&self) -> u32 {
        #[cfg(target_has_atomic = "32")]
        let count = self.dropped.swap(0, Ordering::AcqRel);

        #[cfg(not(target_has_atomic = "32"))]
        let count = self.inner.lock(|cell| {
            let (bits, dropped) = cell.get();
            cell.set((bits, 0));
            dropped
        });

        count
    }
}
