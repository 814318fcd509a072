//! Time source trait

use embassy_time::Instant;

/// Monotonic time source
///
/// Implementations must never go backwards. The cache only ever compares
/// instants from the same clock, so the epoch is irrelevant.
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        C::now(self)
    }
}
