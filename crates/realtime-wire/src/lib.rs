//! Wire protocol for the realtime gateway.
//!
//! Everything on the socket is a single JSON text frame, tagged by `type`:
//!
//! - [`ClientFrame`]: what clients send (`auth`, `register`, `join-room`)
//! - [`ServerEvent`]: what the server broadcasts (presence snapshots,
//!   entity events, notifications, audit records, role changes)
//!
//! Field names are camelCase, tags are kebab-case. Unknown inbound frames
//! fail to parse rather than being silently accepted.

mod client;
mod event;

pub use client::ClientFrame;
pub use event::{EntityEvent, EntityRef, NotificationCategory, ServerEvent};
