//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replays scripted snapshots per source instead of talking to a
//! backend. It implements [`Driver`] so the same [`gimsync_app::Runtime`]
//! orchestration code runs in both production and simulation.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use gimsync_app::{DEFAULT_XP_DROP_TTL, Driver, GroupState, Session, SnapshotSource};
use gimsync_core::{GroupStateUpdate, env::Environment};
use thiserror::Error;

use crate::{GroupSnapshot, InvariantRegistry, SimEnv, SimInstant};

/// Error type for the simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Scripted transport failure.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The script for a source ran out.
    #[error("no scripted response left for {0:?}")]
    Exhausted(SnapshotSource),

    /// A published aggregate broke an invariant.
    #[error("invariant violated: {0}")]
    Invariants(String),
}

impl SimError {
    /// Whether this is a transport failure the runtime should retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Exhausted(_))
    }
}

/// Scripted result of one fetch.
pub type Response = Result<GroupStateUpdate, SimError>;

#[derive(Default)]
struct SharedState {
    responses: BTreeMap<SnapshotSource, VecDeque<Response>>,
    fetches: Vec<(SnapshotSource, SimInstant)>,
    published: Vec<Arc<GroupState<SimInstant>>>,
    close_after_fetches: Option<usize>,
    stall_after_fetches: Option<usize>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share the same script and recordings, so a test can keep a clone
/// for inspection while the runtime owns the original.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    session: Session,
    env: SimEnv,
    latency: Duration,
    invariants: Option<Arc<InvariantRegistry>>,
    xp_drop_ttl: Duration,
}

impl SimDriver {
    /// Create a driver sharing the clock of `env`.
    pub fn new(env: SimEnv) -> Self {
        Self {
            state: Arc::default(),
            session: Session::new(),
            env,
            latency: Duration::ZERO,
            invariants: None,
            xp_drop_ttl: DEFAULT_XP_DROP_TTL,
        }
    }

    /// Make every fetch take `latency` of virtual time.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Check invariants on every publish. A violation fails the publish.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry, xp_drop_ttl: Duration) -> Self {
        self.invariants = Some(Arc::new(registry));
        self.xp_drop_ttl = xp_drop_ttl;
        self
    }

    /// Queue the result of the next unscripted fetch from `source`.
    pub fn script(&self, source: SnapshotSource, response: Response) {
        self.lock().responses.entry(source).or_default().push_back(response);
    }

    /// Close the session once `count` fetches have been made, while the last
    /// one is still in flight.
    pub fn close_after_fetches(&self, count: usize) {
        self.lock().close_after_fetches = Some(count);
    }

    /// Never complete fetches from the `count`-th one on, like a backend
    /// that accepted the request and went silent.
    pub fn stall_after_fetches(&self, count: usize) {
        self.lock().stall_after_fetches = Some(count);
    }

    /// Close the session.
    pub fn close(&self) {
        self.session.close();
    }

    /// Every fetch made so far, with the time it completed.
    pub fn fetches(&self) -> Vec<(SnapshotSource, SimInstant)> {
        self.lock().fetches.clone()
    }

    /// Every aggregate published so far.
    pub fn published(&self) -> Vec<Arc<GroupState<SimInstant>>> {
        self.lock().published.clone()
    }

    /// Whether the runtime has stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimError;
    type Instant = SimInstant;

    async fn fetch(&mut self, source: SnapshotSource) -> Result<GroupStateUpdate, Self::Error> {
        self.env.sleep(self.latency).await;

        let now = self.env.now();
        let (response, stalled) = {
            let mut state = self.lock();
            state.fetches.push((source, now));
            let made = state.fetches.len();
            if state.close_after_fetches.is_some_and(|limit| made >= limit) {
                self.session.close();
            }
            let response = state
                .responses
                .get_mut(&source)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Err(SimError::Exhausted(source)));
            (response, state.stall_after_fetches.is_some_and(|limit| made >= limit))
        };

        if stalled {
            std::future::pending::<()>().await;
        }
        response
    }

    fn session(&self) -> Session {
        self.session.clone()
    }

    fn publish(&mut self, state: &Arc<GroupState<SimInstant>>) -> Result<(), Self::Error> {
        if let Some(registry) = &self.invariants {
            let snapshot = GroupSnapshot::capture(state, self.env.now(), self.xp_drop_ttl);
            if let Err(violations) = registry.check_all(&snapshot) {
                let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
                return Err(SimError::Invariants(messages.join("; ")));
            }
        }

        self.lock().published.push(Arc::clone(state));
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
