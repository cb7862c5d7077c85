//! Cancellation plumbing for blocking waits
//!
//! Backoff sleeps, busy-retry delays, and stabilization polls can all run for
//! a long time (stabilization is unbounded by design). A `CancelToken` lets
//! the host abort any of them promptly: the token is cloned into every
//! executor, and each wait races its sleep against the broadcast channel.

use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Clonable cancellation handle.
///
/// Triggering is sticky: waits started after the trigger observe it too, so
/// a late subscriber cannot miss the signal.
#[derive(Clone)]
pub struct CancelToken {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Receiver for in-flight waits to race against.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Signal every current and future wait to abort.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        if self.sender.send(()).is_err() {
            warn!("Cancellation triggered with no waits in flight");
        }
    }

    /// Whether the token has ever been triggered.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
