//! Single-flight polling.
//!
//! A [`Poller`] schedules fetches of one snapshot source. At most one fetch
//! is in flight at a time; the next fetch is due one interval after the
//! previous one completed, whether it succeeded or not. Completions that
//! arrive after the poller was closed or restarted are reported as stale and
//! must be discarded by the caller.

use std::{ops::Add, time::Duration};

use tracing::trace;

/// A backend endpoint producing snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SnapshotSource {
    /// Full group snapshot: every member, any field.
    GroupData,
    /// Collection log snapshot for some members.
    CollectionLog,
}

impl SnapshotSource {
    /// Every source, in polling order.
    pub const ALL: [Self; 2] = [Self::GroupData, Self::CollectionLog];

    /// Whether snapshots from this source cover only some members.
    pub fn is_partial(self) -> bool {
        matches!(self, Self::CollectionLog)
    }
}

/// Handle to one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    /// Source being fetched.
    pub source: SnapshotSource,
    /// Sequence number, unique per poller.
    pub seq: u64,
}

/// Scheduling state of a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState<I> {
    /// Waiting for the next fetch.
    Idle {
        /// When the next fetch may start.
        due: I,
    },
    /// A fetch is outstanding.
    InFlight {
        /// The outstanding fetch.
        ticket: PollTicket,
    },
    /// Stopped. No further fetches start until reopened.
    Closed,
}

/// Outcome of completing a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The fetch was current. Its result should be dispatched.
    Accepted,
    /// The poller was closed or restarted since the fetch began. Its result
    /// must be discarded.
    Stale,
}

/// Single-flight polling state machine for one source.
#[derive(Debug, Clone)]
pub struct Poller<I> {
    source: SnapshotSource,
    interval: Duration,
    state: PollState<I>,
    next_seq: u64,
}

impl<I> Poller<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Create a poller whose first fetch is due at `now`.
    pub fn new(source: SnapshotSource, interval: Duration, now: I) -> Self {
        Self { source, interval, state: PollState::Idle { due: now }, next_seq: 0 }
    }

    /// Start a fetch if one is due and none is in flight.
    pub fn begin(&mut self, now: I) -> Option<PollTicket> {
        match self.state {
            PollState::Idle { due } if due <= now => {
                let ticket = PollTicket { source: self.source, seq: self.next_seq };
                self.next_seq += 1;
                self.state = PollState::InFlight { ticket };
                trace!(source = ?self.source, seq = ticket.seq, "fetch started");
                Some(ticket)
            },
            _ => None,
        }
    }

    /// Finish the fetch identified by `ticket` at time `now`.
    ///
    /// On success or failure alike the next fetch is scheduled one interval
    /// later.
    pub fn complete(&mut self, ticket: PollTicket, now: I) -> Completion {
        match self.state {
            PollState::InFlight { ticket: current } if current == ticket => {
                self.state = PollState::Idle { due: now + self.interval };
                Completion::Accepted
            },
            _ => {
                trace!(source = ?self.source, seq = ticket.seq, "stale completion");
                Completion::Stale
            },
        }
    }

    /// Stop polling. An in-flight fetch will complete as stale.
    pub fn close(&mut self) {
        self.state = PollState::Closed;
    }

    /// Resume polling with a fetch due at `now`.
    pub fn reopen(&mut self, now: I) {
        self.state = PollState::Idle { due: now };
    }

    /// When the next fetch may start. `None` while in flight or closed.
    pub fn next_due(&self) -> Option<I> {
        match self.state {
            PollState::Idle { due } => Some(due),
            PollState::InFlight { .. } | PollState::Closed => None,
        }
    }

    /// Source this poller fetches.
    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    /// Current scheduling state.
    pub fn state(&self) -> PollState<I> {
        self.state
    }
}
