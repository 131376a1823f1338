//! Mutation fan-out.
//!
//! The application layer reports each committed mutation here; the engine
//! decides who hears about it and in what shape:
//!
//! - Direct events to the subject of the mutation (assignee, manager,
//!   promoted user) when they are online
//! - Role broadcasts of entity state and audit entries to every admin
//! - Cascade deletions expanded so each affected party sees the full set
//! - Presence snapshots to everyone whenever the registry changes
//!
//! Delivery is best-effort through an [`EventSink`]; offline recipients
//! are skipped without error and the audit trail is written before any
//! event goes out.

mod engine;
mod report;
mod sink;

#[cfg(test)]
mod tests;

pub use engine::FanoutEngine;
pub use report::MutationReport;
pub use sink::{EventSink, NullSink, RecordingSink};
