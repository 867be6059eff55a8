//! Millisecond time source sampled when received frames are timestamped.
use embassy_time::Instant;

/// Free-running monotonic clock.
pub trait MillisClock {
    fn now(&self) -> Instant;
}

impl<T: MillisClock + ?Sized> MillisClock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Clock backed by the embassy time driver linked into the firmware.
#[cfg(feature = "time-driver")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

#[cfg(feature = "time-driver")]
impl MillisClock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
