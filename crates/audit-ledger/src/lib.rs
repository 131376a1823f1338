//! Durable audit trail for reported mutations.
//!
//! This crate provides:
//! - [`AuditTrail`]: builds records with process-monotonic timestamps and
//!   appends them before anything is broadcast
//! - [`AuditStore`]: the async persistence seam
//! - [`SqliteAuditStore`]: WAL-mode SQLite store on a dedicated executor
//!   thread (the daemon's default)
//! - [`MemoryAuditStore`]: in-process store for tests and tooling
//!
//! Append failures are surfaced as [`AuditError`] and are the caller's to
//! contain; the trail itself never panics over a bad store.

mod error;
mod migrations;
mod sqlite;
mod store;
mod trail;

pub use error::{AuditError, AuditResult};
pub use sqlite::SqliteAuditStore;
pub use store::{AuditStore, MemoryAuditStore};
pub use trail::AuditTrail;
