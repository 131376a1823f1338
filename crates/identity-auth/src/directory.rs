//! The user directory seam.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use tracker_core::{Role, UserId, UserSnapshot};

/// Async lookup of user profiles by ID.
///
/// The handshake consults this for every connection; implementations must
/// answer from local state, not a network round-trip per lookup.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, user_id: &UserId) -> Option<UserSnapshot>;
}

/// Directory backed by a process-local map.
///
/// The backend keeps it current over IPC (`user.sync`), and role-change
/// mutations update it in place so the next handshake sees the new role.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserSnapshot>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a profile.
    pub async fn upsert(&self, user: UserSnapshot) {
        debug!(user_id = %user.id, role = %user.role, "directory upsert");
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Removes a profile; returns whether it existed.
    pub async fn remove(&self, user_id: &UserId) -> bool {
        self.users.write().await.remove(user_id).is_some()
    }

    /// Updates just the role of an existing profile.
    pub async fn set_role(&self, user_id: &UserId, role: Role) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }

    /// Number of known users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, user_id: &UserId) -> Option<UserSnapshot> {
        self.users.read().await.get(user_id).cloned()
    }
}
