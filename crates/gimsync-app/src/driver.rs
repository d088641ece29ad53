//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the polling runtime from how snapshots are
//! fetched and where the aggregate is published. Production drivers talk to
//! the backend; the simulation driver replays scripted snapshots.

use std::{future::Future, ops::Sub, sync::Arc, time::Duration};

use gimsync_core::GroupStateUpdate;

use crate::{GroupState, Session, SnapshotSource};

/// Abstracts I/O for the polling runtime.
///
/// Implementations provide fetching and publishing while the generic
/// [`Runtime`](crate::Runtime) owns scheduling and state.
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Fetch one snapshot from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not be reached or answered with
    /// something other than a snapshot. The runtime logs the error and polls
    /// again after the usual interval.
    fn fetch(
        &mut self,
        source: SnapshotSource,
    ) -> impl Future<Output = Result<GroupStateUpdate, Self::Error>> + Send;

    /// The session this driver serves.
    ///
    /// The runtime stops polling once it closes, abandoning any fetch still
    /// in flight.
    fn session(&self) -> Session;

    /// Hand a new aggregate to consumers.
    ///
    /// Only called when the aggregate changed.
    ///
    /// # Errors
    ///
    /// Returns an error if consumers can no longer be reached. This ends the
    /// run.
    fn publish(&mut self, state: &Arc<GroupState<Self::Instant>>) -> Result<(), Self::Error>;

    /// Release resources after the final publish.
    fn stop(&mut self);
}
