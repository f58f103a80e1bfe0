//! Pure state machine behind the autosave manager
//!
//! Every timer fire, save completion and connectivity change is fed into
//! [`ManagerState`], which updates itself and answers with the action the
//! manager has to carry out. Nothing here sleeps, spawns or performs I/O.
//!
//! ```text
//!  update ──> Debouncing ──(online)──> ScheduledRemote ──> Saving ──> Idle
//!                 │                                           │
//!              (offline)                                   (failure)
//!                 ▼                                           ▼
//!              Offline ──(reconnect)──> Draining ──> Idle   queued
//! ```

use chrono::{DateTime, Utc};
use domain::{ArticleId, AutosavePhase, Draft, SaveReceipt};

use crate::error::ApplicationError;

#[derive(Debug, Clone)]
struct PendingSave {
    seq: u64,
    draft: Draft,
}

/// What to do when the debounce timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceAction {
    /// Payload recorded; (re)arm the interval timer from now
    ArmInterval,
    /// Offline; put the draft in the offline queue
    Enqueue {
        /// Article the draft belongs to
        identity: Option<ArticleId>,
        /// Content to queue
        draft: Draft,
    },
    /// Stale or destroyed session; do nothing
    Ignore,
}

/// What to do when the interval timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalAction {
    /// Issue a remote save; the in-flight counter is already raised
    Save {
        /// Article to save, `None` to create it
        identity: Option<ArticleId>,
        /// Content to save
        draft: Draft,
    },
    /// Offline; put the payload in the offline queue
    Enqueue {
        /// Article the draft belongs to
        identity: Option<ArticleId>,
        /// Content to queue
        draft: Draft,
    },
    /// Another save or a replay is running; arm the timer again
    Rearm,
    /// No payload
    Nothing,
}

/// What a connectivity change requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityAction {
    /// Nothing to do
    None,
    /// Connection lost
    WentOffline,
    /// Connection restored and the replay slot is taken; replay the queue
    Drain,
}

/// Handle for a manual save that bypasses the in-flight guard
#[derive(Debug, Clone)]
pub struct ForcedSaveTicket {
    seq: u64,
    identity: Option<ArticleId>,
}

impl ForcedSaveTicket {
    /// Identity held by the session when the save started
    pub const fn identity(&self) -> Option<&ArticleId> {
        self.identity.as_ref()
    }
}

/// Effects of a successful manual save on scheduled work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForcedSaveOutcome {
    /// The pending debounce fire carries content already saved
    pub cancel_debounce: bool,
    /// The scheduled remote save carries content already saved
    pub cancel_interval: bool,
    /// No edit happened during the save; the local copy can go
    pub remove_local: bool,
}

/// Per-session autosave state
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ManagerState {
    identity: Option<ArticleId>,
    is_online: bool,
    in_flight: usize,
    draining: bool,
    pending: Option<PendingSave>,
    edit_seq: u64,
    debounce_armed: bool,
    interval_armed: bool,
    destroyed: bool,
    last_error: Option<String>,
    last_saved_at: Option<DateTime<Utc>>,
}

impl ManagerState {
    /// Fresh state for a session
    pub fn new(identity: Option<ArticleId>, is_online: bool) -> Self {
        Self {
            identity,
            is_online,
            ..Self::default()
        }
    }

    /// Derived phase, most significant condition first
    pub const fn phase(&self) -> AutosavePhase {
        if self.destroyed {
            AutosavePhase::Destroyed
        } else if self.draining {
            AutosavePhase::Draining
        } else if self.in_flight > 0 {
            AutosavePhase::Saving
        } else if !self.is_online {
            AutosavePhase::Offline
        } else if self.interval_armed {
            AutosavePhase::ScheduledRemote
        } else if self.debounce_armed {
            AutosavePhase::Debouncing
        } else {
            AutosavePhase::Idle
        }
    }

    pub const fn identity(&self) -> Option<&ArticleId> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: ArticleId) {
        self.identity = Some(identity);
    }

    pub const fn is_online(&self) -> bool {
        self.is_online
    }

    pub const fn is_saving(&self) -> bool {
        self.in_flight > 0
    }

    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub const fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// Register an edit and arm the debounce timer
    ///
    /// Returns the edit's sequence number, or `None` after destroy.
    pub const fn record_edit(&mut self) -> Option<u64> {
        if self.destroyed {
            return None;
        }
        self.edit_seq += 1;
        self.debounce_armed = true;
        Some(self.edit_seq)
    }

    /// The debounce timer armed for edit `seq` fired
    pub fn debounce_elapsed(&mut self, seq: u64, draft: Draft) -> DebounceAction {
        if self.destroyed || seq != self.edit_seq {
            return DebounceAction::Ignore;
        }
        self.debounce_armed = false;

        if !self.is_online {
            return DebounceAction::Enqueue {
                identity: self.identity.clone(),
                draft,
            };
        }

        self.pending = Some(PendingSave { seq, draft });
        self.interval_armed = true;
        DebounceAction::ArmInterval
    }

    /// The interval timer fired
    pub fn interval_elapsed(&mut self) -> IntervalAction {
        self.interval_armed = false;
        if self.destroyed {
            return IntervalAction::Nothing;
        }
        let Some(pending) = self.pending.take() else {
            return IntervalAction::Nothing;
        };

        if !self.is_online {
            return IntervalAction::Enqueue {
                identity: self.identity.clone(),
                draft: pending.draft,
            };
        }

        if self.in_flight > 0 || self.draining {
            self.pending = Some(pending);
            self.interval_armed = true;
            return IntervalAction::Rearm;
        }

        self.in_flight += 1;
        IntervalAction::Save {
            identity: self.identity.clone(),
            draft: pending.draft,
        }
    }

    /// Start a manual save regardless of running saves or replays
    ///
    /// # Errors
    /// Returns [`ApplicationError::SessionClosed`] after destroy.
    pub fn begin_forced_save(&mut self) -> Result<ForcedSaveTicket, ApplicationError> {
        if self.destroyed {
            return Err(ApplicationError::SessionClosed);
        }
        self.in_flight += 1;
        Ok(ForcedSaveTicket {
            seq: self.edit_seq,
            identity: self.identity.clone(),
        })
    }

    /// A scheduled save succeeded
    pub fn complete_save(&mut self, receipt: &SaveReceipt) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.adopt(receipt);
        self.last_saved_at = Some(receipt.updated_at);
        self.last_error = None;
    }

    /// A manual save succeeded
    ///
    /// Scheduled work holding content no newer than the saved draft is
    /// dropped.
    pub fn complete_forced_save(
        &mut self,
        ticket: &ForcedSaveTicket,
        receipt: &SaveReceipt,
    ) -> ForcedSaveOutcome {
        self.complete_save(receipt);

        let mut outcome = ForcedSaveOutcome::default();
        if self.pending.as_ref().is_some_and(|p| p.seq <= ticket.seq) {
            self.pending = None;
        }
        if self.pending.is_none() && self.interval_armed {
            self.interval_armed = false;
            outcome.cancel_interval = true;
        }
        if self.debounce_armed && self.edit_seq <= ticket.seq {
            self.debounce_armed = false;
            outcome.cancel_debounce = true;
        }
        outcome.remove_local = self.edit_seq == ticket.seq;
        outcome
    }

    /// A scheduled or manual save failed
    pub fn fail_save(&mut self, error: impl Into<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_error = Some(error.into());
    }

    /// Take the identity from a receipt
    ///
    /// A session without identity adopts the created article. A receipt for
    /// the held article refreshes its slug; receipts for other articles leave
    /// the session untouched.
    pub fn adopt(&mut self, receipt: &SaveReceipt) {
        match &self.identity {
            None => self.identity = Some(receipt.identity.clone()),
            Some(current) if *current == receipt.identity => {
                self.identity = Some(receipt.identity.clone());
            },
            Some(_) => {},
        }
    }

    /// Record a connectivity transition
    pub fn connectivity_changed(&mut self, online: bool) -> ConnectivityAction {
        if self.destroyed || self.is_online == online {
            return ConnectivityAction::None;
        }
        self.is_online = online;

        if !online {
            return ConnectivityAction::WentOffline;
        }
        if self.begin_drain() {
            ConnectivityAction::Drain
        } else {
            ConnectivityAction::None
        }
    }

    /// Take the replay slot
    ///
    /// Requires an open, online session with no save in flight and no replay
    /// running.
    pub const fn begin_drain(&mut self) -> bool {
        if self.destroyed || !self.is_online || self.in_flight > 0 || self.draining {
            return false;
        }
        self.draining = true;
        true
    }

    /// Release the replay slot, recording the failure that stopped it
    pub fn end_drain(&mut self, failure: Option<String>) {
        self.draining = false;
        if failure.is_some() {
            self.last_error = failure;
        }
    }

    /// Tear the session down
    ///
    /// Returns `false` if it already was.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.pending = None;
        self.debounce_armed = false;
        self.interval_armed = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn receipt(id: u64) -> SaveReceipt {
        SaveReceipt::new(
            ArticleId::new(id).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn draft(title: &str) -> Draft {
        Draft::new(title, "")
    }

    #[test]
    fn fresh_state_is_idle_or_offline() {
        assert_eq!(ManagerState::new(None, true).phase(), AutosavePhase::Idle);
        assert_eq!(ManagerState::new(None, false).phase(), AutosavePhase::Offline);
    }

    #[test]
    fn edit_arms_debounce() {
        let mut state = ManagerState::new(None, true);
        assert_eq!(state.record_edit(), Some(1));
        assert_eq!(state.phase(), AutosavePhase::Debouncing);
    }

    #[test]
    fn debounce_online_schedules_remote_save() {
        let mut state = ManagerState::new(None, true);
        let seq = state.record_edit().unwrap();

        assert_eq!(state.debounce_elapsed(seq, draft("a")), DebounceAction::ArmInterval);
        assert_eq!(state.phase(), AutosavePhase::ScheduledRemote);
    }

    #[test]
    fn later_debounce_replaces_payload_and_rearms() {
        let mut state = ManagerState::new(None, true);
        let first = state.record_edit().unwrap();
        state.debounce_elapsed(first, draft("a"));
        let second = state.record_edit().unwrap();

        assert_eq!(state.debounce_elapsed(second, draft("b")), DebounceAction::ArmInterval);
        assert_eq!(state.phase(), AutosavePhase::ScheduledRemote);
        assert_eq!(
            state.interval_elapsed(),
            IntervalAction::Save {
                identity: None,
                draft: draft("b")
            }
        );
    }

    #[test]
    fn stale_debounce_is_ignored() {
        let mut state = ManagerState::new(None, true);
        let first = state.record_edit().unwrap();
        state.record_edit();

        assert_eq!(state.debounce_elapsed(first, draft("a")), DebounceAction::Ignore);
        assert_eq!(state.phase(), AutosavePhase::Debouncing);
    }

    #[test]
    fn debounce_offline_enqueues() {
        let id = ArticleId::new(3).unwrap();
        let mut state = ManagerState::new(Some(id.clone()), false);
        let seq = state.record_edit().unwrap();

        assert_eq!(
            state.debounce_elapsed(seq, draft("a")),
            DebounceAction::Enqueue {
                identity: Some(id),
                draft: draft("a")
            }
        );
        assert_eq!(state.phase(), AutosavePhase::Offline);
    }

    #[test]
    fn interval_without_payload_does_nothing() {
        let mut state = ManagerState::new(None, true);
        assert_eq!(state.interval_elapsed(), IntervalAction::Nothing);
    }

    #[test]
    fn interval_marks_save_in_flight() {
        let mut state = ManagerState::new(None, true);
        let seq = state.record_edit().unwrap();
        state.debounce_elapsed(seq, draft("a"));

        assert!(matches!(state.interval_elapsed(), IntervalAction::Save { .. }));
        assert!(state.is_saving());
        assert_eq!(state.phase(), AutosavePhase::Saving);
    }

    #[test]
    fn interval_while_busy_rearms() {
        let mut state = ManagerState::new(None, true);
        let _ticket = state.begin_forced_save().unwrap();
        let seq = state.record_edit().unwrap();
        state.debounce_elapsed(seq, draft("a"));

        assert_eq!(state.interval_elapsed(), IntervalAction::Rearm);
        state.fail_save("boom");
        assert!(matches!(state.interval_elapsed(), IntervalAction::Save { .. }));
    }

    #[test]
    fn interval_offline_enqueues_payload() {
        let mut state = ManagerState::new(None, true);
        let seq = state.record_edit().unwrap();
        state.debounce_elapsed(seq, draft("a"));
        state.connectivity_changed(false);

        assert_eq!(
            state.interval_elapsed(),
            IntervalAction::Enqueue {
                identity: None,
                draft: draft("a")
            }
        );
    }

    #[test]
    fn successful_save_adopts_identity() {
        let mut state = ManagerState::new(None, true);
        let seq = state.record_edit().unwrap();
        state.debounce_elapsed(seq, draft("a"));
        state.interval_elapsed();

        state.complete_save(&receipt(42));

        assert_eq!(state.identity().map(ArticleId::value), Some(42));
        assert!(state.last_saved_at().is_some());
        assert_eq!(state.phase(), AutosavePhase::Idle);
    }

    #[test]
    fn receipt_for_other_article_keeps_identity() {
        let mut state = ManagerState::new(Some(ArticleId::new(1).unwrap()), true);
        state.adopt(&receipt(2));
        assert_eq!(state.identity().map(ArticleId::value), Some(1));
    }

    #[test]
    fn receipt_for_same_article_refreshes_slug() {
        let mut state = ManagerState::new(Some(ArticleId::new(5).unwrap()), true);
        let updated = SaveReceipt::new(ArticleId::with_slug(5, "five").unwrap(), Utc::now());
        state.adopt(&updated);
        assert_eq!(state.identity().and_then(ArticleId::slug), Some("five"));
    }

    #[test]
    fn failure_records_error_and_success_clears_it() {
        let mut state = ManagerState::new(None, true);
        state.begin_forced_save().unwrap();
        state.fail_save("503");
        assert_eq!(state.last_error(), Some("503"));

        state.begin_forced_save().unwrap();
        state.complete_save(&receipt(1));
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn reconnect_takes_replay_slot() {
        let mut state = ManagerState::new(None, false);
        assert_eq!(state.connectivity_changed(true), ConnectivityAction::Drain);
        assert_eq!(state.phase(), AutosavePhase::Draining);

        state.end_drain(None);
        assert_eq!(state.phase(), AutosavePhase::Idle);
    }

    #[test]
    fn reconnect_during_save_defers_replay() {
        let mut state = ManagerState::new(None, false);
        state.begin_forced_save().unwrap();
        assert_eq!(state.connectivity_changed(true), ConnectivityAction::None);
        assert!(state.is_online());
    }

    #[test]
    fn repeated_signal_is_not_a_transition() {
        let mut state = ManagerState::new(None, true);
        assert_eq!(state.connectivity_changed(true), ConnectivityAction::None);
        assert_eq!(state.connectivity_changed(false), ConnectivityAction::WentOffline);
        assert_eq!(state.connectivity_changed(false), ConnectivityAction::None);
    }

    #[test]
    fn only_one_replay_at_a_time() {
        let mut state = ManagerState::new(None, true);
        assert!(state.begin_drain());
        assert!(!state.begin_drain());
    }

    #[test]
    fn failed_replay_is_recorded() {
        let mut state = ManagerState::new(None, true);
        state.begin_drain();
        state.end_drain(Some("timeout".to_string()));
        assert_eq!(state.last_error(), Some("timeout"));
    }

    #[test]
    fn forced_save_supersedes_scheduled_work() {
        let mut state = ManagerState::new(None, true);
        let seq = state.record_edit().unwrap();
        state.debounce_elapsed(seq, draft("a"));
        state.record_edit();

        let ticket = state.begin_forced_save().unwrap();
        let outcome = state.complete_forced_save(&ticket, &receipt(9));

        assert!(outcome.cancel_interval);
        assert!(outcome.cancel_debounce);
        assert!(outcome.remove_local);
        assert_eq!(state.phase(), AutosavePhase::Idle);
    }

    #[test]
    fn edits_during_forced_save_survive() {
        let mut state = ManagerState::new(None, true);
        let ticket = state.begin_forced_save().unwrap();
        let seq = state.record_edit().unwrap();
        state.debounce_elapsed(seq, draft("newer"));

        let outcome = state.complete_forced_save(&ticket, &receipt(9));

        assert!(!outcome.cancel_interval);
        assert!(!outcome.remove_local);
        assert_eq!(state.phase(), AutosavePhase::ScheduledRemote);
    }

    #[test]
    fn destroyed_session_ignores_everything() {
        let mut state = ManagerState::new(None, true);
        let seq = state.record_edit().unwrap();
        assert!(state.destroy());
        assert!(!state.destroy());

        assert_eq!(state.record_edit(), None);
        assert_eq!(state.debounce_elapsed(seq, draft("a")), DebounceAction::Ignore);
        assert_eq!(state.connectivity_changed(false), ConnectivityAction::None);
        assert!(!state.begin_drain());
        assert!(matches!(
            state.begin_forced_save(),
            Err(ApplicationError::SessionClosed)
        ));
        assert_eq!(state.phase(), AutosavePhase::Destroyed);
    }
}
