//! Environment abstraction for deterministic testing.
//!
//! Decouples the engine and its polling runtime from the system clock. The
//! simulation harness supplies a virtual clock; production uses
//! `std::time::Instant` and a real timer.

use std::{
    future::Future,
    ops::{Add, Sub},
    time::Duration,
};

/// Abstract environment providing a monotonic clock and sleeping.
///
/// # Invariants
///
/// Implementations MUST guarantee that `now()` never goes backwards.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use virtual time.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + std::fmt::Debug
        + Sub<Output = Duration>
        + Add<Duration, Output = Self::Instant>;

    /// Current time (monotonic).
    ///
    /// Subsequent calls must return times >= previous calls.
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver and runtime code sleeps. The engine never suspends.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}
