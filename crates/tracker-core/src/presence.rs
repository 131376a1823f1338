//! The unit of online state.

use serde::{Deserialize, Serialize};

use crate::ids::{ConnectionId, UserId};
use crate::role::Role;

/// One user's live connection, as held by the presence registry and
/// broadcast in presence snapshots.
///
/// There is at most one record per user; a reconnect replaces the prior
/// record and its connection ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub user_id: UserId,
    pub connection_id: ConnectionId,
    pub role: Role,
    pub display_name: String,
}

impl PresenceRecord {
    pub fn new(
        user_id: impl Into<UserId>,
        connection_id: impl Into<ConnectionId>,
        role: Role,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            connection_id: connection_id.into(),
            role,
            display_name: display_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_camel_case() {
        let record = PresenceRecord::new("u-1", "c-1", Role::Admin, "Avery");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["connectionId"], "c-1");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["displayName"], "Avery");
    }

    #[test]
    fn round_trip() {
        let record = PresenceRecord::new("u-2", "c-7", Role::Member, "Kai");
        let json = serde_json::to_string(&record).unwrap();
        let back: PresenceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
