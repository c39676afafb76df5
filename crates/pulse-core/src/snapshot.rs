//! Record feed state.
//!
//! The backend delivers the whole record collection at once, and re-delivers
//! it in full on every change. Before the first delivery there is nothing to
//! show, which is not the same thing as an empty table.
//!
//! ```text
//! Pending ──first delivery──▶ Available(records)  ◀──every change──┐
//!                                     └─────────────────────────────┘
//! ```

use crate::entities::Record;
use crate::ids::RecordId;

/// One full delivery of the record collection, or the sentinel before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Snapshot {
    /// No delivery has happened yet.
    #[default]
    Pending,
    /// The live collection in creation order. May be empty.
    Available(Vec<Record>),
}

/// Three-way rendering contract derived from a [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadState<'a> {
    Loading,
    Empty,
    Populated(&'a [Record]),
}

impl Snapshot {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The delivered records, or `None` while pending.
    #[must_use]
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Self::Pending => None,
            Self::Available(records) => Some(records),
        }
    }

    /// Look up a record by id in the delivered collection.
    #[must_use]
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records()?.iter().find(|record| &record.id == id)
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState<'_> {
        match self {
            Self::Pending => LoadState::Loading,
            Self::Available(records) if records.is_empty() => LoadState::Empty,
            Self::Available(records) => LoadState::Populated(records),
        }
    }
}

impl From<Vec<Record>> for Snapshot {
    fn from(records: Vec<Record>) -> Self {
        Self::Available(records)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(id: &str) -> Record {
        Record {
            id: RecordId::from(id),
            name: format!("name-{id}"),
            value: 1.0,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn default_is_pending() {
        assert!(Snapshot::default().is_pending());
        assert_eq!(Snapshot::default().load_state(), LoadState::Loading);
    }

    #[test]
    fn empty_delivery_is_not_pending() {
        let snapshot = Snapshot::Available(Vec::new());
        assert!(!snapshot.is_pending());
        assert_eq!(snapshot.records(), Some(&[][..]));
        assert_eq!(snapshot.load_state(), LoadState::Empty);
    }

    #[test]
    fn populated_delivery_exposes_records() {
        let snapshot = Snapshot::from(vec![record("a"), record("b")]);
        match snapshot.load_state() {
            LoadState::Populated(records) => assert_eq!(records.len(), 2),
            other => panic!("expected populated, got {other:?}"),
        }
    }

    #[test]
    fn find_only_searches_available_records() {
        let id = RecordId::from("a");
        assert!(Snapshot::Pending.find(&id).is_none());

        let snapshot = Snapshot::from(vec![record("a")]);
        assert_eq!(snapshot.find(&id).map(|r| r.name.as_str()), Some("name-a"));
        assert!(snapshot.find(&RecordId::from("zzz")).is_none());
    }
}
