//! Frame-rate aware read-through cache
//!
//! The sensor only produces a new frame every 100 ms (10 fps) or 1 s
//! (1 fps). Polling faster than that just returns stale or torn data and
//! keeps the bus busy, so [`CachedSensor`] hands out the last snapshot
//! until it is older than one frame period and only then goes back to the
//! hardware.
//!
//! # Locking
//!
//! All state, including the wrapped sensor, sits behind one
//! blocking [`Mutex`]. A refresh holds it for the whole 65-read
//! transaction, which gives:
//!
//! - at most one refresh in flight; a second caller racing past a stale
//!   cache waits and then sees the fresh snapshot
//! - no caller ever sees a half-updated snapshot
//! - [`CachedSensor::close`] can never interleave with a refresh
//!
//! Because the lock spans blocking bus I/O it must belong to this one
//! sensor. Use `NoopRawMutex` and, when readers run on several threads,
//! give each cache its own outer lock (a `std::sync::Mutex` on hosts).
//! Avoid `CriticalSectionRawMutex` here: it would hold the global
//! critical section, with interrupts masked on an MCU, for a whole
//! refresh.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant};
use grideye_core::registers::FrameRate;
use grideye_core::{Clock, TemperatureFrame, ThermalSensor};

/// Time a reading stays valid at `rate`
pub const fn ttl_for(rate: FrameRate) -> Duration {
    Duration::from_millis(rate.frame_period_ms())
}

/// One coherent hardware refresh
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Pixel frame (possibly faulted)
    pub frame: TemperatureFrame,
    /// Thermistor temperature in °C
    pub ambient: f32,
    /// When the refresh completed; `None` until the first one
    pub captured_at: Option<Instant>,
}

impl Snapshot {
    /// The state before any refresh: faulted, empty, no timestamp
    pub const fn unread() -> Self {
        Self {
            frame: TemperatureFrame::unread(),
            ambient: f32::NAN,
            captured_at: None,
        }
    }

    /// Whether this snapshot came from the hardware
    pub fn is_captured(&self) -> bool {
        self.captured_at.is_some()
    }
}

struct CacheState<S> {
    sensor: S,
    snapshot: Snapshot,
    ttl: Duration,
}

impl<S: ThermalSensor> CacheState<S> {
    fn is_stale(&self, now: Instant) -> bool {
        match self.snapshot.captured_at {
            None => true,
            Some(captured_at) => now
                .checked_duration_since(captured_at)
                .is_some_and(|age| age > self.ttl),
        }
    }

    /// Read frame and thermistor; replace the snapshot only if both succeed
    fn refresh(&mut self, now: Instant) -> Result<(), S::Error> {
        let frame = self.sensor.read_frame()?;
        let ambient = self.sensor.read_ambient()?;

        // Never let the timestamp go backwards
        let captured_at = match self.snapshot.captured_at {
            Some(previous) if previous > now => previous,
            _ => now,
        };

        if frame.is_faulted() {
            warn!("cache: refreshed with faulted frame ({} pixels)", frame.len());
        }
        self.snapshot = Snapshot {
            frame,
            ambient,
            captured_at: Some(captured_at),
        };
        Ok(())
    }

    fn refresh_if_stale(&mut self, now: Instant) -> Result<bool, S::Error> {
        if !self.is_stale(now) {
            return Ok(false);
        }
        match self.refresh(now) {
            Ok(()) => {
                trace!("cache: refreshed");
                Ok(true)
            }
            Err(e) => {
                warn!("cache: refresh failed, keeping previous snapshot");
                Err(e)
            }
        }
    }
}

/// Caching wrapper around a [`ThermalSensor`]
///
/// All methods take `&self`. Within one thread share it by reference;
/// across threads wrap each instance in its own lock.
pub struct CachedSensor<M: RawMutex, S, C> {
    state: Mutex<M, RefCell<CacheState<S>>>,
    clock: C,
}

impl<M: RawMutex, S: ThermalSensor, C: Clock> CachedSensor<M, S, C> {
    /// Wrap `sensor`, aging readings with `clock`
    ///
    /// The TTL starts out matching the sensor's current frame rate. Nothing
    /// is read until the first caller asks.
    pub fn new(sensor: S, clock: C) -> Self {
        let ttl = ttl_for(sensor.frame_rate());
        Self {
            state: Mutex::new(RefCell::new(CacheState {
                sensor,
                snapshot: Snapshot::unread(),
                ttl,
            })),
            clock,
        }
    }

    /// Current time-to-live of a snapshot
    pub fn ttl(&self) -> Duration {
        self.with_state(|state| state.ttl)
    }

    /// Frame rate of the wrapped sensor
    pub fn frame_rate(&self) -> FrameRate {
        self.with_state(|state| state.sensor.frame_rate())
    }

    /// When the current snapshot was captured, `None` before the first
    /// successful refresh
    pub fn last_refresh(&self) -> Option<Instant> {
        self.with_state(|state| state.snapshot.captured_at)
    }

    /// Change the sensor frame rate and retune the TTL to match
    ///
    /// The cached snapshot is kept; it simply ages against the new TTL. If
    /// the sensor rejects the change the TTL stays as it was.
    pub fn set_frame_rate(&self, rate: FrameRate) -> Result<(), S::Error> {
        self.with_state(|state| {
            state.sensor.set_frame_rate(rate)?;
            state.ttl = ttl_for(rate);
            debug!("cache: ttl now {} ms", state.ttl.as_millis());
            Ok(())
        })
    }

    /// Refresh from hardware if the snapshot is missing or older than the
    /// TTL
    ///
    /// Returns `true` when a refresh happened. On error the previous
    /// snapshot and its timestamp are left untouched, so the next call
    /// tries again.
    pub fn refresh_if_stale(&self) -> Result<bool, S::Error> {
        self.with_state(|state| state.refresh_if_stale(self.clock.now()))
    }

    /// Current pixel frame, refreshing first if stale
    pub fn read(&self) -> Result<TemperatureFrame, S::Error> {
        self.with_fresh(|snapshot| snapshot.frame.clone())
    }

    /// Current ambient temperature in °C, refreshing first if stale
    pub fn read_ambient(&self) -> Result<f32, S::Error> {
        self.with_fresh(|snapshot| snapshot.ambient)
    }

    /// Frame, ambient temperature and timestamp from one refresh
    pub fn snapshot(&self) -> Result<Snapshot, S::Error> {
        self.with_fresh(Snapshot::clone)
    }

    /// Close the wrapped sensor and drop the cached snapshot
    ///
    /// Safe to call more than once. Because the snapshot is dropped, every
    /// read afterwards goes to the closed sensor and reports its error
    /// instead of serving old data.
    pub fn close(&self) {
        self.with_state(|state| {
            state.sensor.close();
            state.snapshot = Snapshot::unread();
        });
        debug!("cache: closed");
    }

    /// Unwrap the sensor
    pub fn into_inner(self) -> S {
        self.state.into_inner().into_inner().sensor
    }

    fn with_fresh<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> Result<R, S::Error> {
        self.with_state(|state| {
            state.refresh_if_stale(self.clock.now())?;
            Ok(f(&state.snapshot))
        })
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut CacheState<S>) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<M: RawMutex, S: ThermalSensor, C: Clock> ThermalSensor for CachedSensor<M, S, C> {
    type Error = S::Error;

    fn read_frame(&mut self) -> Result<TemperatureFrame, Self::Error> {
        self.read()
    }

    fn read_ambient(&mut self) -> Result<f32, Self::Error> {
        CachedSensor::read_ambient(self)
    }

    fn set_frame_rate(&mut self, rate: FrameRate) -> Result<(), Self::Error> {
        CachedSensor::set_frame_rate(self, rate)
    }

    fn frame_rate(&self) -> FrameRate {
        CachedSensor::frame_rate(self)
    }

    fn close(&mut self) {
        CachedSensor::close(self)
    }
}
