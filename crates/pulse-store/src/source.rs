//! The seams between the views and whatever owns the record table.

use std::future::Future;

use pulse_core::entities::Record;
use pulse_core::ids::RecordId;
use pulse_core::patch::RecordPatch;
use pulse_core::snapshot::Snapshot;
use tokio::sync::watch;

use crate::error::StoreError;

/// A live feed of the full record collection.
///
/// The feed starts [`Snapshot::Pending`] and then re-delivers the whole
/// collection whenever it changes. Dropping a receiver returned by
/// [`subscribe`](Self::subscribe) unsubscribes it.
pub trait RecordSource: Send + Sync {
    /// The latest delivery, or `Pending` if nothing has arrived yet.
    fn current(&self) -> Snapshot;

    /// Receive every subsequent delivery. The receiver starts out holding
    /// the current snapshot, already marked as seen.
    fn subscribe(&self) -> watch::Receiver<Snapshot>;
}

/// The single supported write: replace `name` and `value` on one record.
pub trait RecordWriter: Send + Sync {
    /// Apply the patch, returning the record's id on success.
    fn patch(&self, patch: RecordPatch)
    -> impl Future<Output = Result<RecordId, StoreError>> + Send;
}

/// One-shot read of the whole collection, used to drive a polling feed.
pub trait RecordReader: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Record>, StoreError>> + Send;
}
