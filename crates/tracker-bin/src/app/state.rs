//! Daemon state definition.

use audit_ledger::AuditTrail;
use fanout_engine::FanoutEngine;
use identity_auth::InMemoryUserDirectory;
use presence_registry::PresenceRegistry;
use realtime_gateway::ConnectionTable;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tracker_config::{Config, Paths};

/// Shared daemon state (thread-safe).
#[derive(Clone)]
pub struct DaemonState {
    #[allow(dead_code)]
    pub config: Arc<Config>,
    #[allow(dead_code)]
    pub paths: Arc<Paths>,
    /// Registry of currently connected users.
    pub registry: PresenceRegistry,
    /// Canonical user records, kept current by backend `user.sync` calls.
    pub directory: Arc<InMemoryUserDirectory>,
    /// Append-only record of auditable actions.
    pub trail: Arc<AuditTrail>,
    /// Turns mutation reports into targeted client events.
    pub engine: FanoutEngine,
    /// Per-connection outbound senders for the WebSocket gateway.
    pub table: ConnectionTable,
    /// Shutdown signal sender for the WebSocket gateway.
    pub gateway_shutdown: broadcast::Sender<()>,
    /// Daemon start time, reported by the health handler.
    pub started_at: Instant,
}
