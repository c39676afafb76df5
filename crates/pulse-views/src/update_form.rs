//! Async driver for the Update Form.
//!
//! Owns a [`FormState`] behind a lock and connects it to:
//! - a [`RecordSource`] whose deliveries refresh the selector list
//! - a [`RecordWriter`] that performs the patch mutation
//! - a cancellable timer that clears the success message after
//!   [`SUCCESS_MESSAGE_TTL`]
//!
//! Every state change is published as a [`FormView`] on a watch channel.
//! After [`UpdateForm::teardown`] (or drop) no late completion, snapshot, or
//! timer touches the form again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use pulse_core::ids::RecordId;
use pulse_core::snapshot::Snapshot;
use pulse_store::{RecordSource, RecordWriter, StoreError};
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::form::{FormState, FormView, Message, SubmitOutcome};

/// How long a success message stays visible.
pub const SUCCESS_MESSAGE_TTL: Duration = Duration::from_secs(3);

struct Inner {
    form: FormState,
    /// Pending success-message clear, if any.
    clear_timer: Option<CancellationToken>,
}

struct Shared {
    inner: Mutex<Inner>,
    views: watch::Sender<FormView>,
    lifetime: CancellationToken,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.views.send_replace(inner.form.view());
    }
}

impl Inner {
    fn cancel_clear_timer(&mut self) {
        if let Some(token) = self.clear_timer.take() {
            token.cancel();
        }
    }
}

pub struct UpdateForm<W> {
    shared: Arc<Shared>,
    writer: Arc<W>,
}

impl<W: RecordWriter> UpdateForm<W> {
    /// A form over a fixed initial snapshot. Feed later deliveries through
    /// [`apply_snapshot`](Self::apply_snapshot).
    pub fn new(writer: Arc<W>, records: Snapshot) -> Self {
        let form = FormState::new(records);
        let views = watch::Sender::new(form.view());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    form,
                    clear_timer: None,
                }),
                views,
                lifetime: CancellationToken::new(),
            }),
            writer,
        }
    }

    /// A form that follows `source` until torn down. Must be called inside a
    /// Tokio runtime.
    pub fn attach<S: RecordSource + ?Sized>(source: &S, writer: Arc<W>) -> Self {
        let mut rx = source.subscribe();
        let initial = rx.borrow_and_update().clone();
        let form = Self::new(writer, initial);

        let weak = Arc::downgrade(&form.shared);
        let lifetime = form.shared.lifetime.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = lifetime.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            tracing::debug!("record feed closed");
                            break;
                        }
                    }
                }
                let snapshot = rx.borrow_and_update().clone();
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                if shared.lifetime.is_cancelled() {
                    break;
                }
                let mut inner = shared.lock();
                inner.form.apply_snapshot(snapshot);
                shared.publish(&inner);
            }
        });

        form
    }

    /// Replace the selector's source list.
    pub fn apply_snapshot(&self, snapshot: Snapshot) {
        self.mutate(|inner| {
            inner.form.apply_snapshot(snapshot);
            true
        });
    }

    /// Select a record and load its fields into the drafts.
    pub fn select(&self, id: &RecordId) -> bool {
        self.mutate(|inner| {
            let selected = inner.form.select(id);
            if selected {
                inner.cancel_clear_timer();
            }
            selected
        })
    }

    pub fn edit_name(&self, text: impl Into<String>) -> bool {
        self.mutate(|inner| inner.form.edit_name(text))
    }

    pub fn edit_value(&self, text: impl Into<String>) -> bool {
        self.mutate(|inner| inner.form.edit_value(text))
    }

    /// Validate, run the mutation, and settle the form.
    ///
    /// Returns the message the form ends up showing, or `None` if a
    /// submission was already in flight or the form was torn down before the
    /// mutation settled.
    ///
    /// The mutation runs on its own task and settles the form even if the
    /// returned future is dropped.
    pub async fn submit(&self) -> Option<Message>
    where
        W: 'static,
    {
        let patch = {
            let mut inner = self.shared.lock();
            if self.shared.lifetime.is_cancelled() {
                return None;
            }
            match inner.form.submit() {
                SubmitOutcome::Started(patch) => {
                    inner.cancel_clear_timer();
                    self.shared.publish(&inner);
                    patch
                }
                SubmitOutcome::Rejected(error) => {
                    inner.cancel_clear_timer();
                    self.shared.publish(&inner);
                    tracing::debug!(%error, "submission rejected");
                    return inner.form.message().cloned();
                }
                SubmitOutcome::Busy => return None,
            }
        };

        tracing::debug!(id = %patch.id, "submitting patch");
        let (settled_tx, settled_rx) = oneshot::channel();
        let writer = Arc::clone(&self.writer);
        let weak = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            let result = writer.patch(patch).await;
            let message = weak.upgrade().and_then(|shared| settle(&shared, result));
            let _ = settled_tx.send(message);
        });

        settled_rx.await.ok().flatten()
    }

    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Inner) -> bool,
    {
        if self.shared.lifetime.is_cancelled() {
            return false;
        }
        let mut inner = self.shared.lock();
        let changed = f(&mut inner);
        if changed {
            self.shared.publish(&inner);
        }
        changed
    }
}

/// Apply a mutation result. `None` once the form is torn down.
fn settle(shared: &Arc<Shared>, result: Result<RecordId, StoreError>) -> Option<Message> {
    let mut inner = shared.lock();
    if shared.lifetime.is_cancelled() {
        tracing::debug!("form torn down before the patch settled");
        return None;
    }
    let succeeded = result.is_ok();
    if let Err(error) = &result {
        tracing::warn!(%error, "patch failed");
    }
    inner.form.complete(result.map_err(|e| e.to_string()));
    if succeeded {
        inner.clear_timer = Some(schedule_success_clear(shared));
    }
    shared.publish(&inner);
    inner.form.message().cloned()
}

fn schedule_success_clear(shared: &Arc<Shared>) -> CancellationToken {
    let token = shared.lifetime.child_token();
    let weak: Weak<Shared> = Arc::downgrade(shared);
    let timer = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            () = timer.cancelled() => {}
            () = tokio::time::sleep(SUCCESS_MESSAGE_TTL) => {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let mut inner = shared.lock();
                // Cancellation happens under the same lock, so this check is final.
                if timer.is_cancelled() {
                    return;
                }
                inner.clear_timer = None;
                if inner.form.clear_success() {
                    shared.publish(&inner);
                }
            }
        }
    });
    token
}

impl<W> UpdateForm<W> {
    #[must_use]
    pub fn view(&self) -> FormView {
        self.shared.views.borrow().clone()
    }

    /// Receive a view after every state change.
    #[must_use]
    pub fn views(&self) -> watch::Receiver<FormView> {
        self.shared.views.subscribe()
    }

    /// Stop following the feed and disarm every pending completion and timer.
    pub fn teardown(&self) {
        let mut inner = self.shared.lock();
        self.shared.lifetime.cancel();
        inner.cancel_clear_timer();
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.shared.lifetime.is_cancelled()
    }
}

impl<W> Drop for UpdateForm<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}
