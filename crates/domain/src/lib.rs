//! Domain layer for Inkwell
//!
//! Contains the article draft model, the records the autosave engine persists,
//! and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
