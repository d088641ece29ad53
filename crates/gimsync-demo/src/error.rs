//! Demo driver errors.

use gimsync_app::SnapshotSource;
use gimsync_core::PayloadError;
use thiserror::Error;

/// Errors from the demo driver.
#[derive(Debug, Error)]
pub enum DemoError {
    /// The simulated backend dropped the request.
    #[error("simulated outage while fetching {0:?}")]
    Outage(SnapshotSource),

    /// The backend answered with something that is not a snapshot.
    #[error("undecodable snapshot: {0}")]
    Payload(#[from] PayloadError),
}

impl DemoError {
    /// Whether the next poll may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Outage(_) => true,
            Self::Payload(error) => !error.is_fatal(),
        }
    }
}
