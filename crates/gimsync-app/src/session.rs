//! Session lifetime.
//!
//! A [`Session`] is the close signal shared between a driver and the
//! [`Runtime`](crate::Runtime). Whoever owns the connection closes it; the
//! runtime races every fetch and every sleep against [`Session::closed`] so a
//! hung request never delays the closing wipe.

use std::sync::Arc;

use tokio::sync::watch;

/// Open/closed flag with an awaitable close.
///
/// Clones observe and control the same session. Closing is permanent.
#[derive(Debug, Clone)]
pub struct Session {
    closed: Arc<watch::Sender<bool>>,
}

impl Session {
    /// Create an open session.
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self { closed: Arc::new(closed) }
    }

    /// Close the session, waking every [`Session::closed`] waiter.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        !*self.closed.borrow()
    }

    /// Resolves once the session is closed. Ready immediately if it already is.
    pub async fn closed(&self) {
        let mut receiver = self.closed.subscribe();
        // The sender lives in `self`, so the channel outlives the wait.
        let _ = receiver.wait_for(|closed| *closed).await;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
