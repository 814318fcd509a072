//! Host monotonic clock

use embassy_time::Instant;
use grideye_core::Clock;

/// Monotonic clock backed by the embassy-time `std` driver
///
/// Instants count from the first time the driver is queried in this
/// process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
