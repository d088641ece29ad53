//! Generic runtime for polling orchestration.
//!
//! The Runtime drives the fetch loop, coordinating between:
//! - [`Poller`]: one single-flight schedule per snapshot source
//! - [`GroupStore`]: the dispatcher owning the aggregate
//! - [`Driver`]: platform-specific fetching and publishing
//! - [`Session`]: the close signal every fetch and sleep is raced against

use gimsync_core::env::Environment;
use tracing::{debug, info, warn};

use crate::{
    Completion, Driver, EngineConfig, GroupAction, GroupStore, PollConfig, Poller, Session,
    SnapshotSource,
};

/// Generic runtime that orchestrates pollers, the store and a driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing the clock and sleeping
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    session: Session,
    store: GroupStore<E::Instant>,
    pollers: Vec<Poller<E::Instant>>,
    poll_config: PollConfig,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a runtime polling every [`SnapshotSource`].
    pub fn new(driver: D, env: E, engine_config: EngineConfig, poll_config: PollConfig) -> Self {
        let now = env.now();
        let pollers = SnapshotSource::ALL
            .into_iter()
            .map(|source| Poller::new(source, poll_config.interval(source), now))
            .collect();
        let session = driver.session();
        Self { driver, env, session, store: GroupStore::new(engine_config), pollers, poll_config }
    }

    /// Run until the driver's session closes.
    ///
    /// The session starts and ends with a wipe, each published to consumers.
    /// Closing abandons a fetch still in flight; the closing wipe does not
    /// wait for it.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.store.dispatch(GroupAction::Wipe, self.env.now());
        self.driver.publish(self.store.state())?;
        info!(sources = self.pollers.len(), "polling started");

        while self.session.is_open() {
            self.process_cycle().await?;

            if !self.session.is_open() {
                break;
            }
            let now = self.env.now();
            let wait = match self.pollers.iter().filter_map(Poller::next_due).min() {
                Some(due) if due > now => Some(due - now),
                Some(_) => None,
                None => Some(self.poll_config.group_data_interval),
            };
            if let Some(wait) = wait {
                tokio::select! {
                    biased;
                    () = self.session.closed() => {},
                    () = self.env.sleep(wait) => {},
                }
            }
        }

        self.close_pollers();
        self.store.dispatch(GroupAction::Wipe, self.env.now());
        self.driver.publish(self.store.state())?;
        self.driver.stop();
        info!("polling stopped");
        Ok(())
    }

    /// Start and finish every fetch that is due.
    async fn process_cycle(&mut self) -> Result<(), D::Error> {
        for index in 0..self.pollers.len() {
            let Some(ticket) = self.pollers[index].begin(self.env.now()) else {
                continue;
            };

            let result = tokio::select! {
                biased;
                () = self.session.closed() => None,
                result = self.driver.fetch(ticket.source) => Some(result),
            };
            let Some(result) = result else {
                debug!(source = ?ticket.source, "session closed, abandoning fetch");
                self.close_pollers();
                return Ok(());
            };
            if !self.session.is_open() {
                self.close_pollers();
            }

            let now = self.env.now();
            if self.pollers[index].complete(ticket, now) == Completion::Stale {
                debug!(source = ?ticket.source, "discarding stale fetch");
                continue;
            }

            match result {
                Ok(update) => {
                    let action = if ticket.source.is_partial() {
                        GroupAction::partial(update)
                    } else {
                        GroupAction::full(update)
                    };
                    if self.store.dispatch(action, now) {
                        self.driver.publish(self.store.state())?;
                    }
                },
                Err(error) => {
                    warn!(source = ?ticket.source, %error, "fetch failed");
                },
            }
        }

        Ok(())
    }

    fn close_pollers(&mut self) {
        for poller in &mut self.pollers {
            poller.close();
        }
    }
}
