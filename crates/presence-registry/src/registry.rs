//! The registry itself.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use tracker_core::{ConnectionId, PresenceRecord, Role, UserId};

/// Shared map of online users, keyed by user ID.
///
/// Cheap to clone; all clones see the same state. Writes linearize through
/// the inner lock, so concurrent upserts for one user resolve to exactly
/// one surviving record.
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    inner: Arc<RwLock<HashMap<UserId, PresenceRecord>>>,
}

impl PresenceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for `record.user_id`.
    ///
    /// Returns the superseded record when the user was already present.
    /// The superseded connection is no longer addressed by fan-out; its
    /// eventual disconnect will fail the [`remove`](Self::remove) guard.
    pub async fn upsert(&self, record: PresenceRecord) -> Option<PresenceRecord> {
        let mut map = self.inner.write().await;
        let previous = map.insert(record.user_id.clone(), record.clone());
        match &previous {
            Some(old) => debug!(
                user_id = %record.user_id,
                connection_id = %record.connection_id,
                superseded = %old.connection_id,
                "presence record replaced"
            ),
            None => debug!(
                user_id = %record.user_id,
                connection_id = %record.connection_id,
                "presence record added"
            ),
        }
        previous
    }

    /// Removes the user's record only if `connection_id` still owns it.
    ///
    /// Returns whether a record was removed. A late disconnect from a
    /// superseded connection returns `false` and leaves the successor
    /// untouched.
    pub async fn remove(&self, user_id: &UserId, connection_id: &ConnectionId) -> bool {
        let mut map = self.inner.write().await;
        match map.get(user_id) {
            Some(record) if record.connection_id == *connection_id => {
                map.remove(user_id);
                debug!(user_id = %user_id, connection_id = %connection_id, "presence record removed");
                true
            }
            Some(record) => {
                debug!(
                    user_id = %user_id,
                    connection_id = %connection_id,
                    current = %record.connection_id,
                    "stale disconnect ignored"
                );
                false
            }
            None => false,
        }
    }

    /// Returns the record for `user_id`, if the user is online.
    pub async fn lookup(&self, user_id: &UserId) -> Option<PresenceRecord> {
        self.inner.read().await.get(user_id).cloned()
    }

    /// Returns every online user with the given role, sorted by user ID.
    pub async fn all_by_role(&self, role: Role) -> Vec<PresenceRecord> {
        let map = self.inner.read().await;
        let mut records: Vec<PresenceRecord> =
            map.values().filter(|r| r.role == role).cloned().collect();
        drop(map);
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        records
    }

    /// Returns a copy of every record, sorted by user ID.
    pub async fn snapshot(&self) -> Vec<PresenceRecord> {
        let map = self.inner.read().await;
        let mut records: Vec<PresenceRecord> = map.values().cloned().collect();
        drop(map);
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        records
    }

    /// Number of online users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether nobody is online.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
