//! Autosave manager
//!
//! Imperative shell around [`ManagerState`]: owns the debounce and interval
//! timers, talks to the stores and the remote port, and reacts to
//! connectivity changes.
//!
//! Timer tasks only perform the synchronous state transition once their
//! sleep ends. Any awaiting work (a remote save, a queue write) runs in its
//! own task, so aborting a timer never cancels work already started.

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use domain::{ArticleId, AutosavePhase, Draft, SaveReceipt};
use parking_lot::Mutex;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info, instrument, warn};

use super::{
    context::AutosaveContext,
    state::{ConnectivityAction, DebounceAction, IntervalAction, ManagerState},
};
use crate::{
    error::ApplicationError,
    ports::{ConnectivityPort, DraftRemotePort, Subscription},
};

/// Summary of one offline queue replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries delivered to the backend
    pub replayed: usize,
    /// Entries dropped because a newer save of the same article succeeded
    pub superseded: usize,
    /// Entries still queued afterwards
    pub remaining: usize,
    /// Error that stopped the replay
    pub error: Option<String>,
}

/// A save that makes older queued content for the same article obsolete
#[derive(Debug, Clone)]
struct Supersede {
    identity: ArticleId,
    before: DateTime<Utc>,
}

impl Supersede {
    fn covers(&self, target: Option<&ArticleId>, queued_at: DateTime<Utc>) -> bool {
        target == Some(&self.identity) && queued_at <= self.before
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: ManagerState,
    debounce: Option<JoinHandle<()>>,
    interval: Option<JoinHandle<()>>,
}

impl Shared {
    fn abort_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
    }

    fn abort_interval(&mut self) {
        if let Some(handle) = self.interval.take() {
            handle.abort();
        }
    }
}

struct ManagerInner {
    ctx: AutosaveContext,
    remote: Arc<dyn DraftRemotePort>,
    shared: Mutex<Shared>,
    subscription: Mutex<Option<Subscription>>,
    enqueues: Mutex<Vec<JoinHandle<()>>>,
    runtime: Handle,
}

impl ManagerInner {
    fn arm_debounce(self: &Arc<Self>, shared: &mut Shared, seq: u64, draft: Draft) {
        shared.abort_debounce();
        let weak = Arc::downgrade(self);
        let delay = self.ctx.settings.debounce;
        shared.debounce = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.on_debounce(seq, draft);
            }
        }));
    }

    fn arm_interval(self: &Arc<Self>, shared: &mut Shared) {
        shared.abort_interval();
        let weak = Arc::downgrade(self);
        let delay = self.ctx.settings.interval;
        shared.interval = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.on_interval();
            }
        }));
    }

    fn on_debounce(self: &Arc<Self>, seq: u64, draft: Draft) {
        let mut shared = self.shared.lock();
        match shared.state.debounce_elapsed(seq, draft) {
            DebounceAction::ArmInterval => {
                debug!(seq, "Edits settled, remote save scheduled");
                self.arm_interval(&mut shared);
            },
            DebounceAction::Enqueue { identity, draft } => {
                debug!(seq, "Edits settled while offline, queueing");
                self.spawn_enqueue(identity, draft);
            },
            DebounceAction::Ignore => {},
        }
    }

    fn on_interval(self: &Arc<Self>) {
        let mut shared = self.shared.lock();
        shared.interval = None;
        match shared.state.interval_elapsed() {
            IntervalAction::Save { identity, draft } => {
                let inner = Arc::clone(self);
                self.runtime.spawn(async move {
                    inner.run_scheduled_save(identity, draft).await;
                });
            },
            IntervalAction::Enqueue { identity, draft } => {
                debug!("Scheduled save fell into an offline period, queueing");
                self.spawn_enqueue(identity, draft);
            },
            IntervalAction::Rearm => {
                debug!("Another save is running, rescheduling");
                self.arm_interval(&mut shared);
            },
            IntervalAction::Nothing => {},
        }
    }

    fn on_connectivity(self: &Arc<Self>, online: bool) {
        let action = self.shared.lock().state.connectivity_changed(online);
        match action {
            ConnectivityAction::WentOffline => info!("Offline, saves will be queued"),
            ConnectivityAction::Drain => {
                info!("Back online, replaying offline queue");
                let inner = Arc::clone(self);
                self.runtime.spawn(async move {
                    inner.drain_queue(None).await;
                });
            },
            ConnectivityAction::None => {},
        }
    }

    fn spawn_enqueue(&self, identity: Option<ArticleId>, draft: Draft) {
        let queue = self.ctx.queue.clone();
        let handle = self.runtime.spawn(async move {
            queue.enqueue(identity, draft).await;
        });
        let mut enqueues = self.enqueues.lock();
        enqueues.retain(|pending| !pending.is_finished());
        enqueues.push(handle);
    }

    /// Wait for queue writes started by timer fires
    async fn settle_enqueues(&self) {
        let pending = std::mem::take(&mut *self.enqueues.lock());
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "Queue write task failed");
            }
        }
    }

    #[instrument(skip(self, draft), fields(identity = ?identity.as_ref().map(ArticleId::value)))]
    async fn run_scheduled_save(self: Arc<Self>, identity: Option<ArticleId>, draft: Draft) {
        let started = self.ctx.clock.now();

        match self.remote.save(identity.as_ref(), &draft).await {
            Ok(receipt) => {
                info!(article = %receipt.identity, "Draft saved remotely");
                let drain = {
                    let mut shared = self.shared.lock();
                    shared.state.complete_save(&receipt);
                    shared.state.begin_drain()
                };
                if drain {
                    self.drain_queue(Some(Supersede {
                        identity: receipt.identity,
                        before: started,
                    }))
                    .await;
                }
            },
            Err(e) => {
                warn!(error = %e, "Remote save failed, queueing draft");
                self.ctx.queue.enqueue(identity, draft).await;
                self.shared.lock().state.fail_save(e.to_string());
            },
        }
    }

    /// Replay the offline queue; the caller must hold the replay slot
    async fn drain_queue(&self, supersede: Option<Supersede>) -> DrainReport {
        self.settle_enqueues().await;
        let entries = self.ctx.queue.drain().await;
        let mut report = DrainReport::default();
        let mut flushed = Vec::with_capacity(entries.len());

        for entry in entries {
            let target = {
                let shared = self.shared.lock();
                entry.target(shared.state.identity()).cloned()
            };

            if supersede
                .as_ref()
                .is_some_and(|newer| newer.covers(target.as_ref(), entry.timestamp))
            {
                debug!(entry_id = %entry.id, "Queued save superseded by newer save");
                flushed.push(entry.id);
                report.superseded += 1;
                continue;
            }

            match self.remote.save(target.as_ref(), &entry.draft).await {
                Ok(receipt) => {
                    debug!(entry_id = %entry.id, article = %receipt.identity, "Queued save delivered");
                    self.shared.lock().state.adopt(&receipt);
                    flushed.push(entry.id);
                    report.replayed += 1;
                },
                Err(e) => {
                    warn!(entry_id = %entry.id, error = %e, "Replay stopped at failing entry");
                    report.error = Some(ApplicationError::Drain(e.to_string()).to_string());
                    break;
                },
            }
        }

        self.ctx.queue.acknowledge(&flushed).await;
        report.remaining = self.ctx.queue.len().await;
        self.shared.lock().state.end_drain(report.error.clone());

        info!(
            replayed = report.replayed,
            superseded = report.superseded,
            remaining = report.remaining,
            "Offline queue replay finished"
        );
        report
    }

    fn destroy(&self) {
        {
            let mut shared = self.shared.lock();
            if !shared.state.destroy() {
                return;
            }
            shared.abort_debounce();
            shared.abort_interval();
        }
        let subscription = self.subscription.lock().take();
        drop(subscription);
        info!("Autosave session closed");
    }
}

/// Autosave session for one article being edited
///
/// Every edit is written to the local draft store at once. Once edits settle
/// for the debounce period a remote save is scheduled after the interval;
/// while offline, settled edits go to the offline queue instead, which is
/// replayed as soon as connectivity returns.
///
/// Dropping the manager destroys the session.
pub struct AutosaveManager {
    inner: Arc<ManagerInner>,
}

impl std::fmt::Debug for AutosaveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveManager")
            .field("phase", &self.phase())
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}

impl AutosaveManager {
    /// Start a session and subscribe to connectivity changes
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`ApplicationError::Internal`] outside a Tokio runtime.
    pub fn start(
        ctx: AutosaveContext,
        identity: Option<ArticleId>,
        remote: Arc<dyn DraftRemotePort>,
        connectivity: &dyn ConnectivityPort,
    ) -> Result<Self, ApplicationError> {
        let runtime = Handle::try_current()
            .map_err(|e| ApplicationError::Internal(format!("No async runtime: {e}")))?;

        let online = connectivity.is_online();
        let inner = Arc::new(ManagerInner {
            ctx,
            remote,
            shared: Mutex::new(Shared {
                state: ManagerState::new(identity, online),
                ..Shared::default()
            }),
            subscription: Mutex::new(None),
            enqueues: Mutex::new(Vec::new()),
            runtime,
        });

        let weak: Weak<ManagerInner> = Arc::downgrade(&inner);
        let subscription = connectivity.subscribe(Arc::new(move |online| {
            if let Some(inner) = weak.upgrade() {
                inner.on_connectivity(online);
            }
        }));
        *inner.subscription.lock() = Some(subscription);

        info!(online, "Autosave session started");
        Ok(Self { inner })
    }

    /// Record an edit
    ///
    /// The draft is written locally right away and the debounce timer is
    /// restarted. Ignored once the session is destroyed.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, draft: Draft) {
        let identity = {
            let shared = self.inner.shared.lock();
            if shared.state.is_destroyed() {
                debug!("Update after destroy ignored");
                return;
            }
            shared.state.identity().cloned()
        };

        self.inner.ctx.local.save(identity.as_ref(), &draft).await;

        let mut shared = self.inner.shared.lock();
        if let Some(seq) = shared.state.record_edit() {
            self.inner.arm_debounce(&mut shared, seq, draft);
        }
    }

    /// Save immediately, bypassing timers and any running save
    ///
    /// On success the local copy is removed, unless the draft was edited
    /// again while the request was running. On failure the draft is queued,
    /// the local copy is kept and the error is returned.
    ///
    /// # Errors
    /// Returns a domain error for an invalid draft,
    /// [`ApplicationError::SessionClosed`] after destroy, or the remote error.
    #[instrument(skip(self, draft))]
    pub async fn manual_save(&self, draft: Draft) -> Result<SaveReceipt, ApplicationError> {
        draft.ensure_valid()?;
        let ticket = self.inner.shared.lock().state.begin_forced_save()?;
        let started = self.inner.ctx.clock.now();

        match self.inner.remote.save(ticket.identity(), &draft).await {
            Ok(receipt) => {
                let (outcome, drain) = {
                    let mut shared = self.inner.shared.lock();
                    let outcome = shared.state.complete_forced_save(&ticket, &receipt);
                    if outcome.cancel_debounce {
                        shared.abort_debounce();
                    }
                    if outcome.cancel_interval {
                        shared.abort_interval();
                    }
                    (outcome, shared.state.begin_drain())
                };
                info!(article = %receipt.identity, "Draft saved manually");

                if outcome.remove_local {
                    self.inner.ctx.local.remove(ticket.identity()).await;
                }
                if drain {
                    self.inner
                        .drain_queue(Some(Supersede {
                            identity: receipt.identity.clone(),
                            before: started,
                        }))
                        .await;
                }
                Ok(receipt)
            },
            Err(e) => {
                warn!(error = %e, "Manual save failed, queueing draft");
                self.inner
                    .ctx
                    .queue
                    .enqueue(ticket.identity().cloned(), draft)
                    .await;
                self.inner.shared.lock().state.fail_save(e.to_string());
                Err(e)
            },
        }
    }

    /// Replay the offline queue now
    ///
    /// # Errors
    /// Returns [`ApplicationError::SessionClosed`] after destroy and
    /// [`ApplicationError::Drain`] while offline or while another save or
    /// replay is running.
    pub async fn flush_queue(&self) -> Result<DrainReport, ApplicationError> {
        let acquired = {
            let mut shared = self.inner.shared.lock();
            if shared.state.is_destroyed() {
                return Err(ApplicationError::SessionClosed);
            }
            shared.state.begin_drain()
        };
        if !acquired {
            return Err(ApplicationError::Drain(
                "offline or another save is running".to_string(),
            ));
        }
        Ok(self.inner.drain_queue(None).await)
    }

    /// Stop timers and the connectivity subscription
    ///
    /// Saves already in flight still complete. Calling this twice is a no-op.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    pub fn phase(&self) -> AutosavePhase {
        self.inner.shared.lock().state.phase()
    }

    /// Identity of the article, once known
    pub fn identity(&self) -> Option<ArticleId> {
        self.inner.shared.lock().state.identity().cloned()
    }

    /// Attach the session to an existing article
    pub fn set_identity(&self, identity: ArticleId) {
        self.inner.shared.lock().state.set_identity(identity);
    }

    pub fn is_online(&self) -> bool {
        self.inner.shared.lock().state.is_online()
    }

    /// Whether a remote save is in flight
    pub fn is_saving(&self) -> bool {
        self.inner.shared.lock().state.is_saving()
    }

    /// Most recent save or replay failure, cleared by the next successful save
    pub fn last_error(&self) -> Option<String> {
        self.inner.shared.lock().state.last_error().map(str::to_string)
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.inner.shared.lock().state.last_saved_at()
    }

    pub async fn offline_queue_len(&self) -> usize {
        self.inner.ctx.queue.len().await
    }

    /// Whether a local copy exists for the current article
    pub async fn has_unsaved_draft(&self) -> bool {
        let identity = self.identity();
        self.inner.ctx.local.exists(identity.as_ref()).await
    }
}

impl Drop for AutosaveManager {
    fn drop(&mut self) {
        self.inner.destroy();
    }
}
