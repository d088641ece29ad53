//! Virtual-time environment.
//!
//! `SimEnv` keeps a shared virtual clock that only moves when someone sleeps
//! or calls [`SimEnv::advance`]. Sleeping completes immediately after moving
//! the clock, so a whole polling session runs in microseconds of real time
//! and every run is reproducible.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    future::Future,
    ops::{Add, Sub},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use gimsync_core::env::Environment;

/// Point in virtual time: the elapsed duration since the simulation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Instant `offset` after the start of the simulation.
    pub fn from_start(offset: Duration) -> Self {
        Self(offset)
    }

    /// Elapsed virtual time since the start of the simulation.
    pub fn since_start(self) -> Duration {
        self.0
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }
}

/// Environment with a shared virtual clock.
///
/// Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    clock: Arc<Mutex<SimInstant>>,
}

impl SimEnv {
    /// Create an environment at the start of virtual time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        *clock = *clock + duration;
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> Self::Instant {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.advance(duration);
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let env = SimEnv::new();
        let other = env.clone();

        other.advance(Duration::from_millis(250));

        assert_eq!(env.now().since_start(), Duration::from_millis(250));
    }

    #[test]
    fn sleeping_advances_virtual_time() {
        let env = SimEnv::new();
        let start = env.now();

        let sleep = env.sleep(Duration::from_secs(3));
        drop(sleep);

        assert_eq!(env.now() - start, Duration::from_secs(3));
        assert_eq!(start - env.now(), Duration::ZERO);
    }
}
