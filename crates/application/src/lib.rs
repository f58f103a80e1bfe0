//! Application layer - Autosave orchestration
//!
//! Contains the autosave engine (local draft store, offline queue, network
//! monitor, autosave manager) and the port definitions it is wired through.
//! Adapters in the infrastructure layer implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
