//! A [`RecordSource`] that refreshes itself by re-reading the collection.
//!
//! The background task publishes only when the collection actually changed,
//! keeps the last good snapshot when a read fails, and stops as soon as the
//! [`PollingSource`] is dropped.

use std::sync::Arc;
use std::time::Duration;

use pulse_core::snapshot::Snapshot;
use tokio::sync::{Notify, watch};
use tokio_util::sync::CancellationToken;

use crate::feed::SnapshotFeed;
use crate::source::{RecordReader, RecordSource};

pub struct PollingSource {
    feed: Arc<SnapshotFeed>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
}

impl PollingSource {
    /// Start polling `reader` every `interval`. Must be called inside a Tokio runtime.
    pub fn spawn<R>(reader: Arc<R>, interval: Duration) -> Self
    where
        R: RecordReader + 'static,
    {
        let feed = Arc::new(SnapshotFeed::new(Snapshot::Pending));
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        tokio::spawn(poll_loop(
            reader,
            Arc::clone(&feed),
            Arc::clone(&refresh),
            cancel.clone(),
            interval,
        ));

        Self {
            feed,
            refresh,
            cancel,
        }
    }

    /// Re-read immediately instead of waiting for the next tick.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }
}

impl Drop for PollingSource {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl RecordSource for PollingSource {
    fn current(&self) -> Snapshot {
        self.feed.current()
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.feed.subscribe()
    }
}

async fn poll_loop<R>(
    reader: Arc<R>,
    feed: Arc<SnapshotFeed>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
    interval: Duration,
) where
    R: RecordReader,
{
    loop {
        let result = tokio::select! {
            () = cancel.cancelled() => break,
            result = reader.list() => result,
        };

        match result {
            Ok(records) => {
                if feed.publish(Snapshot::Available(records)) {
                    tracing::debug!("record snapshot changed");
                }
            }
            Err(error) => {
                tracing::warn!(%error, "record poll failed; keeping last snapshot");
            }
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
            () = refresh.notified() => {}
        }
    }
    tracing::debug!("record poller stopped");
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use pulse_core::entities::Record;
    use pulse_core::ids::RecordId;

    use super::*;
    use crate::error::StoreError;

    /// Replays scripted results, then repeats the last one.
    struct ScriptedReader {
        script: Mutex<VecDeque<Result<Vec<Record>, String>>>,
        last: Mutex<Vec<Record>>,
        calls: AtomicUsize,
    }

    impl ScriptedReader {
        fn new(script: Vec<Result<Vec<Record>, String>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl RecordReader for ScriptedReader {
        async fn list(&self) -> Result<Vec<Record>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(records)) => {
                    self.last.lock().unwrap().clone_from(&records);
                    Ok(records)
                }
                Some(Err(reason)) => Err(StoreError::Function(reason)),
                None => Ok(self.last.lock().unwrap().clone()),
            }
        }
    }

    fn record(id: &str, name: &str) -> Record {
        Record {
            id: RecordId::from(id),
            name: name.into(),
            value: 1.0,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn starts_pending_then_delivers() {
        let reader = ScriptedReader::new(vec![Ok(vec![record("a", "Alpha")])]);
        let source = PollingSource::spawn(reader, Duration::from_secs(1));
        let mut rx = source.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().records().unwrap().len(), 1);
        assert!(!source.current().is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_collection_is_delivered_not_pending() {
        let reader = ScriptedReader::new(vec![Ok(Vec::new())]);
        let source = PollingSource::spawn(reader, Duration::from_secs(1));
        let mut rx = source.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Snapshot::Available(Vec::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_keeps_last_snapshot() {
        let alpha = record("a", "Alpha");
        let reader = ScriptedReader::new(vec![
            Ok(vec![alpha.clone()]),
            Err("Network error".into()),
            Ok(vec![record("a", "Alpha 2")]),
        ]);
        let source = PollingSource::spawn(Arc::clone(&reader), Duration::from_secs(1));
        let mut rx = source.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().records().unwrap()[0].name, "Alpha");

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().records().unwrap()[0].name, "Alpha 2");
        assert!(reader.calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_collection_does_not_notify() {
        let reader = ScriptedReader::new(vec![Ok(vec![record("a", "Alpha")])]);
        let source = PollingSource::spawn(Arc::clone(&reader), Duration::from_secs(1));
        let mut rx = source.subscribe();
        rx.changed().await.unwrap();
        rx.borrow_and_update();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(reader.calls.load(Ordering::SeqCst) >= 3);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_polling() {
        let reader = ScriptedReader::new(vec![Ok(Vec::new())]);
        let source = PollingSource::spawn(Arc::clone(&reader), Duration::from_secs(1));
        let mut rx = source.subscribe();
        rx.changed().await.unwrap();

        drop(source);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let calls = reader.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(reader.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_now_skips_the_wait() {
        let reader = ScriptedReader::new(vec![
            Ok(vec![record("a", "Alpha")]),
            Ok(vec![record("a", "Alpha 2")]),
        ]);
        let source = PollingSource::spawn(reader, Duration::from_secs(3600));
        let mut rx = source.subscribe();
        rx.changed().await.unwrap();
        rx.borrow_and_update();

        source.refresh_now();
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("refresh should not wait for the interval")
            .unwrap();
        assert_eq!(rx.borrow().records().unwrap()[0].name, "Alpha 2");
    }
}
