//! Frames sent by clients.

use serde::{Deserialize, Serialize};
use tracker_core::UserId;

/// A frame received from a client connection.
///
/// `register` carries whatever identity the client believes it has; the
/// server only honors the `id` (and only when it matches the authenticated
/// identity) and re-resolves role and name itself, so those two fields are
/// accepted as plain strings and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    /// Must be the first frame after connecting.
    Auth { token: String },
    /// Idempotent re-assertion of presence.
    Register {
        id: UserId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Joins a named room on this connection.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
}

impl ClientFrame {
    /// Create an `auth` frame.
    pub fn auth(token: &str) -> Self {
        Self::Auth {
            token: token.to_string(),
        }
    }

    /// Create a `register` frame.
    pub fn register(id: impl Into<UserId>) -> Self {
        Self::Register {
            id: id.into(),
            role: None,
            name: None,
        }
    }

    /// Create a `join-room` frame.
    pub fn join_room(room_id: &str) -> Self {
        Self::JoinRoom {
            room_id: room_id.to_string(),
        }
    }

    /// The wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth",
            Self::Register { .. } => "register",
            Self::JoinRoom { .. } => "join-room",
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
