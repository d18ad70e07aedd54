//! Monotonic time sources

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonic time source.
///
/// Effects timestamp themselves and compute their age from whatever clock the
/// frame loop hands in, so tests can drive time explicitly.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time from `Instant::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    now: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            now: Cell::new(origin),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move the clock forward by fractional seconds
    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs));
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.now.get().duration_since(self.origin)
    }

    /// The instant `secs` seconds after the clock's origin
    pub fn at(&self, secs: f32) -> Instant {
        self.origin + Duration::from_secs_f32(secs)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
