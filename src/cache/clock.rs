//! Clock Module
//!
//! Wall-clock and monotonic time sources for TTL checks.

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};

// == Clock Trait ==
/// Time source used by the result cache.
///
/// `now` stamps persisted entries; `monotonic` measures age of entries
/// written by the running process, immune to wall-clock steps.
pub trait Clock: Send + Sync + Debug {
    /// Current wall-clock instant.
    fn now(&self) -> DateTime<Utc>;

    /// Time elapsed since an arbitrary fixed origin. Never decreases.
    fn monotonic(&self) -> Duration;
}

// == System Clock ==
/// Real clock backed by `Utc::now` and `Instant`.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }
}

// == Manual Clock ==
/// Hand-driven clock for tests and replay.
///
/// `advance` moves both readings together; `step_wall` moves only the wall
/// clock, the way an NTP correction would.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<(DateTime<Utc>, Duration)>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new((start, Duration::ZERO)),
        }
    }

    /// Lets `elapsed` pass on both clocks.
    pub fn advance(&self, elapsed: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.0 = TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| state.0.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        state.1 = state.1.saturating_add(elapsed);
    }

    /// Shifts the wall clock only; negative deltas step it backward.
    ///
    /// Saturates at the representable range instead of overflowing.
    pub fn step_wall(&self, delta: TimeDelta) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.0 = state.0.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).0
    }

    fn monotonic(&self) -> Duration {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).1
    }
}
