//! Shared domain types for the tracker realtime subsystem.
//!
//! This crate holds the vocabulary every other crate speaks:
//!
//! - Identity newtypes (`UserId`, `ConnectionId`, `TaskId`, `ProjectId`, `AuditId`)
//! - The closed [`Role`] enum with case-insensitive parsing
//! - Entity snapshots reported by mutation adapters and embedded in events
//! - [`PresenceRecord`], the unit of online state
//! - [`AuditRecord`] and its action vocabulary

mod audit;
mod entity;
mod ids;
mod presence;
mod role;

pub use audit::{AuditAction, AuditRecord};
pub use entity::{
    EntityKind, ProjectRef, ProjectSnapshot, TaskSnapshot, UserRef, UserSnapshot,
    DEFAULT_PROJECT_STATUS, DEFAULT_TASK_STATUS,
};
pub use ids::{AuditId, ConnectionId, ProjectId, TaskId, UserId};
pub use presence::PresenceRecord;
pub use role::{InvalidRole, Role};
