//! Autosave session orchestration

mod context;
mod manager;
mod settings;
mod state;

pub use context::AutosaveContext;
pub use manager::{AutosaveManager, DrainReport};
pub use settings::{AutosaveSettings, DEFAULT_DEBOUNCE, DEFAULT_INTERVAL};
pub use state::{
    ConnectivityAction, DebounceAction, ForcedSaveOutcome, ForcedSaveTicket, IntervalAction,
    ManagerState,
};
