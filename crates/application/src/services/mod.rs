//! Application services - Use case implementations

mod autosave;
mod editor_session;
mod local_draft_store;
mod network_monitor;
mod offline_queue;

pub use autosave::{
    AutosaveContext, AutosaveManager, AutosaveSettings, ConnectivityAction, DEFAULT_DEBOUNCE,
    DEFAULT_INTERVAL, DebounceAction, DrainReport, ForcedSaveOutcome, ForcedSaveTicket,
    IntervalAction, ManagerState,
};
pub use editor_session::EditorSession;
pub use local_draft_store::{DRAFT_KEY_PREFIX, LocalDraftStore, NEW_DRAFT_SUFFIX, draft_storage_key};
pub use network_monitor::NetworkMonitor;
pub use offline_queue::{OFFLINE_QUEUE_KEY, OfflineQueue};
