//! Server-to-client event envelopes.

use serde::{Deserialize, Serialize};
use tracker_core::{
    AuditRecord, EntityKind, PresenceRecord, ProjectId, ProjectSnapshot, Role, TaskId,
    TaskSnapshot, UserId, UserSnapshot,
};

/// Category attached to user-facing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationCategory {
    TaskAssigned,
    TaskStatus,
    TaskUpdatedByMember,
    TaskDelete,
    ProjectAssigned,
    ProjectStatus,
    ProjectDelete,
    ProjectDeleteAdmin,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "task-assigned",
            Self::TaskStatus => "task-status",
            Self::TaskUpdatedByMember => "task-updated-by-member",
            Self::TaskDelete => "task-delete",
            Self::ProjectAssigned => "project-assigned",
            Self::ProjectStatus => "project-status",
            Self::ProjectDelete => "project-delete",
            Self::ProjectDeleteAdmin => "project-delete-admin",
        }
    }
}

/// An entity snapshot embedded in a created/updated event, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "lowercase")]
pub enum EntityEvent {
    Task(TaskSnapshot),
    Project(ProjectSnapshot),
    User(UserSnapshot),
}

impl EntityEvent {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Task(_) => EntityKind::Task,
            Self::Project(_) => EntityKind::Project,
            Self::User(_) => EntityKind::User,
        }
    }

    /// The entity's id, for per-recipient dedup within one mutation.
    pub fn entity_id(&self) -> &str {
        match self {
            Self::Task(task) => task.id.as_str(),
            Self::Project(project) => project.id.as_str(),
            Self::User(user) => user.id.as_str(),
        }
    }
}

/// A bare reference to a deleted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn task(id: &TaskId) -> Self {
        Self {
            entity: EntityKind::Task,
            id: id.as_str().to_string(),
        }
    }

    pub fn project(id: &ProjectId) -> Self {
        Self {
            entity: EntityKind::Project,
            id: id.as_str().to_string(),
        }
    }

    pub fn user(id: &UserId) -> Self {
        Self {
            entity: EntityKind::User,
            id: id.as_str().to_string(),
        }
    }
}

/// A frame sent to a client connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Full registry state, broadcast to everyone on any presence change.
    PresenceSnapshot { users: Vec<PresenceRecord> },
    EntityCreated(EntityEvent),
    EntityUpdated(EntityEvent),
    EntityDeleted(EntityRef),
    Notification {
        message: String,
        category: NotificationCategory,
    },
    AuditAppended { record: AuditRecord },
    /// Sent only to the user whose role changed.
    #[serde(rename_all = "camelCase")]
    RoleChanged {
        role: Role,
        message: String,
        performed_by: String,
    },
}

impl ServerEvent {
    /// Create a `presence-snapshot` event.
    pub fn presence_snapshot(users: Vec<PresenceRecord>) -> Self {
        Self::PresenceSnapshot { users }
    }

    /// Create an `entity-created` event.
    pub fn entity_created(entity: EntityEvent) -> Self {
        Self::EntityCreated(entity)
    }

    /// Create an `entity-updated` event.
    pub fn entity_updated(entity: EntityEvent) -> Self {
        Self::EntityUpdated(entity)
    }

    /// Create an `entity-deleted` event.
    pub fn entity_deleted(entity: EntityRef) -> Self {
        Self::EntityDeleted(entity)
    }

    /// Create a `notification` event.
    pub fn notification(message: impl Into<String>, category: NotificationCategory) -> Self {
        Self::Notification {
            message: message.into(),
            category,
        }
    }

    /// Create an `audit-appended` event.
    pub fn audit_appended(record: AuditRecord) -> Self {
        Self::AuditAppended { record }
    }

    /// Create a `role-changed` event.
    pub fn role_changed(role: Role, message: impl Into<String>, performed_by: impl Into<String>) -> Self {
        Self::RoleChanged {
            role,
            message: message.into(),
            performed_by: performed_by.into(),
        }
    }

    /// The wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PresenceSnapshot { .. } => "presence-snapshot",
            Self::EntityCreated(_) => "entity-created",
            Self::EntityUpdated(_) => "entity-updated",
            Self::EntityDeleted(_) => "entity-deleted",
            Self::Notification { .. } => "notification",
            Self::AuditAppended { .. } => "audit-appended",
            Self::RoleChanged { .. } => "role-changed",
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

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::{AuditAction, AuditId, UserRef};

    #[test]
    fn test_presence_snapshot_shape() {
        let event = ServerEvent::presence_snapshot(vec![PresenceRecord::new(
            "u-1", "c-1", Role::Manager, "Rhea",
        )]);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "presence-snapshot");
        assert_eq!(json["users"][0]["userId"], "u-1");
        assert_eq!(json["users"][0]["role"], "manager");
    }

    #[test]
    fn test_entity_created_task_shape() {
        let task = TaskSnapshot::new("t-1", "Ship it")
            .with_assignee(UserRef::new("u-1", "Avery"));
        let event = ServerEvent::entity_created(EntityEvent::Task(task));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "entity-created");
        assert_eq!(json["entity"], "task");
        assert_eq!(json["title"], "Ship it");
        assert_eq!(json["assignedTo"]["id"], "u-1");
    }

    #[test]
    fn test_entity_deleted_shape() {
        let event = ServerEvent::entity_deleted(EntityRef::project(&ProjectId::from_string("p-3")));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "entity-deleted");
        assert_eq!(json["entity"], "project");
        assert_eq!(json["id"], "p-3");
    }

    #[test]
    fn test_notification_shape() {
        let event = ServerEvent::notification(
            "New task assigned: \"Ship it\" (Status: To Do)",
            NotificationCategory::TaskAssigned,
        );
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "notification");
        assert_eq!(json["category"], "task-assigned");
    }

    #[test]
    fn test_role_changed_shape() {
        let event = ServerEvent::role_changed(Role::Manager, "You were promoted to Manager!", "Avery");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "role-changed");
        assert_eq!(json["role"], "manager");
        assert_eq!(json["performedBy"], "Avery");
    }

    #[test]
    fn test_audit_appended_roundtrip() {
        let record = AuditRecord {
            id: AuditId::from_string("a-1"),
            action: AuditAction::TaskUpdate,
            actor: UserId::from_string("u-1"),
            subject: None,
            details: "Avery updated Task \"Ship it\" from \"To Do\" to \"Completed\"".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let event = ServerEvent::audit_appended(record.clone());
        let parsed = ServerEvent::from_json(&event.to_json().unwrap()).unwrap();

        match parsed {
            ServerEvent::AuditAppended { record: back } => {
                assert_eq!(back.action, AuditAction::TaskUpdate);
                assert_eq!(back.details, record.details);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_entity_event_roundtrip_through_tag() {
        let event = ServerEvent::entity_updated(EntityEvent::Project(
            ProjectSnapshot::new("p-1", "Apollo").with_status("Testing"),
        ));
        let parsed = ServerEvent::from_json(&event.to_json().unwrap()).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(
            serde_json::to_string(&NotificationCategory::TaskUpdatedByMember).unwrap(),
            "\"task-updated-by-member\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationCategory::ProjectDeleteAdmin).unwrap(),
            "\"project-delete-admin\""
        );
        assert_eq!(NotificationCategory::TaskDelete.as_str(), "task-delete");
    }

    #[test]
    fn test_kind_matches_tag() {
        let event = ServerEvent::presence_snapshot(vec![]);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
    }
}
