//! Snapshot broadcast shared by the in-process and polling feeds.

use pulse_core::snapshot::Snapshot;
use tokio::sync::watch;

pub(crate) struct SnapshotFeed {
    tx: watch::Sender<Snapshot>,
}

impl SnapshotFeed {
    pub(crate) fn new(initial: Snapshot) -> Self {
        Self {
            tx: watch::Sender::new(initial),
        }
    }

    pub(crate) fn current(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Publish `next`, waking subscribers only if it differs from the last delivery.
    pub(crate) fn publish(&self, next: Snapshot) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        })
    }

    /// Mutate the current delivery in place; subscribers are woken when `f` returns `true`.
    pub(crate) fn modify<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Snapshot) -> bool,
    {
        self.tx.send_if_modified(f)
    }
}
