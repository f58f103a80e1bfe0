//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod clock_port;
mod connectivity_port;
mod draft_remote_port;
mod key_value_store;

pub use clock_port::ClockPort;
#[cfg(test)]
pub use clock_port::MockClockPort;
pub use connectivity_port::{ConnectivityCallback, ConnectivityPort, Subscription};
pub use draft_remote_port::DraftRemotePort;
pub use key_value_store::KeyValueStorePort;
#[cfg(test)]
pub use key_value_store::MockKeyValueStorePort;
