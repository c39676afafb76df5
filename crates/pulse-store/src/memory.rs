//! In-process record table.
//!
//! Stands in for the hosted backend: it owns the collection, hands out
//! identifiers, applies patches, and republishes the full snapshot after
//! every change. Failures can be scripted for the next patch so callers can
//! exercise their error paths.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use pulse_core::entities::Record;
use pulse_core::errors::CoreError;
use pulse_core::ids::RecordId;
use pulse_core::patch::RecordPatch;
use pulse_core::snapshot::Snapshot;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::feed::SnapshotFeed;
use crate::source::{RecordReader, RecordSource, RecordWriter};

pub struct MemoryStore {
    feed: SnapshotFeed,
    next_id: AtomicU64,
    scripted_failure: Mutex<Option<String>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::pending()
    }
}

impl MemoryStore {
    /// A store that has not delivered anything yet.
    #[must_use]
    pub fn pending() -> Self {
        Self::from_snapshot(Snapshot::Pending)
    }

    /// A store that has already delivered `records`.
    #[must_use]
    pub fn with_records(records: Vec<Record>) -> Self {
        Self::from_snapshot(Snapshot::Available(records))
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            feed: SnapshotFeed::new(snapshot),
            next_id: AtomicU64::new(1),
            scripted_failure: Mutex::new(None),
        }
    }

    /// Replace the whole collection, as if another client changed it.
    pub fn deliver(&self, records: Vec<Record>) {
        self.feed.publish(Snapshot::Available(records));
    }

    /// Append a new record with a fresh id and the current time.
    ///
    /// A pending store becomes available with this single record.
    pub fn insert(
        &self,
        name: impl Into<String>,
        value: f64,
        description: Option<String>,
    ) -> Record {
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = Record {
            id: RecordId::from(format!("rec-{seq:08x}")),
            name: name.into(),
            value,
            description,
            created_at: Utc::now(),
        };

        let inserted = record.clone();
        self.feed.modify(move |snapshot| {
            match snapshot {
                Snapshot::Pending => *snapshot = Snapshot::Available(vec![inserted]),
                Snapshot::Available(records) => records.push(inserted),
            }
            true
        });
        tracing::debug!(id = %record.id, "inserted record");
        record
    }

    /// Make the next patch fail with `reason`, without touching any record.
    pub fn fail_next_patch(&self, reason: impl Into<String>) {
        *self
            .scripted_failure
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(reason.into());
    }

    fn take_scripted_failure(&self) -> Option<String> {
        self.scripted_failure
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }

    fn apply(&self, patch: &RecordPatch) -> Result<RecordId, StoreError> {
        if let Some(reason) = self.take_scripted_failure() {
            return Err(StoreError::Function(reason));
        }

        let mut found = false;
        self.feed.modify(|snapshot| {
            let Snapshot::Available(records) = snapshot else {
                return false;
            };
            let Some(record) = records.iter_mut().find(|r| r.id == patch.id) else {
                return false;
            };
            found = true;
            if record.name == patch.name && record.value == patch.value {
                return false;
            }
            record.name.clone_from(&patch.name);
            record.value = patch.value;
            true
        });

        if !found {
            return Err(CoreError::record_not_found(patch.id.as_str()).into());
        }
        Ok(patch.id.clone())
    }
}

impl RecordSource for MemoryStore {
    fn current(&self) -> Snapshot {
        self.feed.current()
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.feed.subscribe()
    }
}

impl RecordWriter for MemoryStore {
    async fn patch(&self, patch: RecordPatch) -> Result<RecordId, StoreError> {
        let result = self.apply(&patch);
        match &result {
            Ok(id) => tracing::debug!(%id, "patched record"),
            Err(error) => tracing::debug!(id = %patch.id, %error, "patch rejected"),
        }
        result
    }
}

impl RecordReader for MemoryStore {
    async fn list(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.feed.current().records().map(<[Record]>::to_vec).unwrap_or_default())
    }
}
