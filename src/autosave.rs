//! Debounced persistence of the live document.
//!
//! Trailing-edge debounce: every [`Autosaver::schedule`] cancels the pending
//! save and starts a new timer, so only the state after the last edit of a
//! burst is written. At most one timer is pending at any time.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::document::ProcessImprovement;
use crate::storage::DocumentStore;

/// Quiet period used when the configuration does not set one.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

pub struct Autosaver {
    store: Arc<dyn DocumentStore>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

/// Stamp `updatedAt` and write. Failures are logged, never propagated: the
/// in-memory document stays authoritative.
fn persist(store: &dyn DocumentStore, mut doc: ProcessImprovement) {
    doc.touch();
    match store.save(&doc) {
        Ok(()) => debug!("Autosaved '{}' at {}", doc.title, doc.updated_at),
        Err(e) => error!("Autosave failed: {}", e),
    }
}

impl Autosaver {
    pub fn new(store: Arc<dyn DocumentStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: None,
        }
    }

    /// Schedule a save of `doc` once the quiet period elapses.
    ///
    /// Outside a tokio runtime there is no timer to wait on, so the document
    /// is written immediately.
    pub fn schedule(&mut self, doc: &ProcessImprovement) {
        self.cancel();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available; saving without debounce");
                persist(self.store.as_ref(), doc.clone());
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let snapshot = doc.clone();
        let delay = self.delay;
        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            persist(store.as_ref(), snapshot);
        }));
    }

    /// Drop the pending save, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.cancel();
    }
}
