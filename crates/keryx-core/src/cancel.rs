//! Cancellation signal threaded through the dispatch pipeline.
//!
//! A [`CancelSignal`] is handed to `dispatch` alongside the request and flows
//! through every behavior into the handler. Stages check or await it at
//! their own suspension points; the terminal chain step races the handler
//! against it so cancellation surfaces as `Cancelled` rather than being
//! masked or delayed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// A clonable signal used to abort an in-flight dispatch.
///
/// All clones share the same state: triggering any clone cancels them all,
/// and every waiter is notified. Triggering is idempotent.
///
/// # Example
///
/// ```
/// use keryx_core::CancelSignal;
///
/// let cancel = CancelSignal::new();
/// assert!(!cancel.is_cancelled());
///
/// cancel.trigger();
/// assert!(cancel.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancelSignal {
    /// Whether cancellation has been triggered.
    triggered: Arc<AtomicBool>,

    /// Broadcast sender for notifying waiters.
    sender: broadcast::Sender<()>,
}

impl CancelSignal {
    /// Creates a new, untriggered cancellation signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Triggers cancellation.
    ///
    /// Notifies all tasks waiting on this signal. Calling this multiple
    /// times is safe and idempotent.
    pub fn trigger(&self) {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            // Ignore error if no receivers
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` if cancellation has been triggered.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Completes when cancellation is triggered.
    ///
    /// Resolves immediately if the signal has already been triggered, so it
    /// is safe to use inside `tokio::select!` at any point in a dispatch.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let mut receiver = self.sender.subscribe();
        // The trigger may have landed between the check above and the
        // subscription; trigger() sets the flag before it broadcasts, so a
        // clean flag here means our receiver will see the message.
        if self.is_cancelled() {
            return;
        }
        let _ = receiver.recv().await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
