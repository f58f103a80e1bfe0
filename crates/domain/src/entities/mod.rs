//! Domain entities - Objects with identity and lifecycle

mod draft;
mod queued_save;
mod stored_draft;

pub use draft::{Draft, DraftFlags, MAX_EXCERPT_CHARS, MAX_PASSWORD_CHARS, MAX_TITLE_CHARS};
pub use queued_save::QueuedSave;
pub use stored_draft::StoredDraft;
