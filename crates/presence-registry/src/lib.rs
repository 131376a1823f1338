//! Presence registry: who is connected right now.
//!
//! A process-local async map from user to live connection. One record per
//! user; reconnects supersede, disconnects only evict when the connection
//! still owns the record. Readers get copied-out snapshots, so no caller
//! ever iterates under the registry lock.

mod registry;

pub use registry::PresenceRegistry;
