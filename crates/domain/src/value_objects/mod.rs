//! Value Objects - Immutable, identity-less domain primitives

mod article_id;
mod autosave_phase;
mod save_receipt;

pub use article_id::ArticleId;
pub use autosave_phase::AutosavePhase;
pub use save_receipt::SaveReceipt;
