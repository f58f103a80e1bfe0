//! Infrastructure adapters - Implementations of application ports

mod blog_draft_remote_adapter;
mod connectivity_probe;
mod system_clock;

pub use blog_draft_remote_adapter::BlogDraftRemoteAdapter;
pub use connectivity_probe::ConnectivityProbe;
pub use system_clock::SystemClock;
