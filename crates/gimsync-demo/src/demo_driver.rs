//! Driver backed by the in-process [`DemoBackend`].

use std::{
    num::NonZeroU64,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use gimsync_app::{DEFAULT_XP_DROP_TTL, Driver, GroupState, Session, SnapshotSource};
use gimsync_core::{GroupStateUpdate, decode_group_update};
use tracing::{debug, info};

use crate::{DemoBackend, DemoError};

/// Fetches from a simulated backend and logs every published aggregate.
#[derive(Debug)]
pub struct DemoDriver {
    backend: DemoBackend,
    session: Session,
    latency: Duration,
    outage_every: Option<NonZeroU64>,
    fetches: u64,
    xp_drop_ttl: Duration,
}

impl DemoDriver {
    /// Create a driver with an open session.
    pub fn new() -> Self {
        Self {
            backend: DemoBackend::new(),
            session: Session::new(),
            latency: Duration::ZERO,
            outage_every: None,
            fetches: 0,
            xp_drop_ttl: DEFAULT_XP_DROP_TTL,
        }
    }

    /// Close the session once `run_for` has passed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn close_after(&self, run_for: Duration) -> tokio::task::JoinHandle<()> {
        let session = self.session.clone();
        tokio::spawn(async move {
            tokio::time::sleep(run_for).await;
            debug!(?run_for, "demo session over");
            session.close();
        })
    }

    /// Simulated round trip per fetch.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every `every`-th fetch. `0` never fails.
    #[must_use]
    pub fn with_outage_every(mut self, every: u64) -> Self {
        self.outage_every = NonZeroU64::new(every);
        self
    }

    /// Lifetime used when counting live experience drops for the log.
    #[must_use]
    pub fn with_xp_drop_ttl(mut self, ttl: Duration) -> Self {
        self.xp_drop_ttl = ttl;
        self
    }
}

impl Default for DemoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for DemoDriver {
    type Error = DemoError;
    type Instant = Instant;

    async fn fetch(&mut self, source: SnapshotSource) -> Result<GroupStateUpdate, Self::Error> {
        tokio::time::sleep(self.latency).await;
        self.fetches += 1;

        if let Some(every) = self.outage_every
            && self.fetches % every.get() == 0
        {
            return Err(DemoError::Outage(source));
        }

        let payload = match source {
            SnapshotSource::GroupData => {
                self.backend.advance();
                self.backend.group_data(Utc::now())
            },
            SnapshotSource::CollectionLog => self.backend.collection_logs(),
        };
        Ok(decode_group_update(&payload)?)
    }

    fn session(&self) -> Session {
        self.session.clone()
    }

    #[allow(clippy::disallowed_methods)]
    fn publish(&mut self, state: &Arc<GroupState<Instant>>) -> Result<(), Self::Error> {
        let now = Instant::now();
        let drops: usize = state
            .member_names()
            .iter()
            .map(|name| state.live_xp_drops(name, now, self.xp_drop_ttl).count())
            .sum();
        info!(
            members = state.member_names().len(),
            items = state.items().len(),
            collections = state.collections().len(),
            drops,
            "group state published"
        );

        for (name, member) in state.member_states().iter() {
            let color = state.member_color(name).map(|color| color.hue_degrees);
            let total_xp: u64 = member.skills.as_deref().map_or(0, |skills| skills.values().sum());
            debug!(member = %name, ?color, total_xp, "member");
        }
        Ok(())
    }

    fn stop(&mut self) {
        info!(steps = self.backend.steps(), fetches = self.fetches, "demo backend stopped");
    }
}
