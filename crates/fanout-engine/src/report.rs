use serde::{Deserialize, Serialize};
use tracker_core::{AuditAction, ProjectSnapshot, Role, TaskSnapshot, UserId, UserRef, UserSnapshot};

/// A domain mutation reported by a persistence adapter after it has
/// committed. Carries the actor plus the post-mutation state the
/// engine needs to address recipients and phrase notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MutationReport {
    #[serde(rename_all = "camelCase")]
    TaskCreated { actor: UserRef, task: TaskSnapshot },
    #[serde(rename_all = "camelCase")]
    TaskUpdated {
        actor: UserRef,
        task: TaskSnapshot,
        previous_status: String,
    },
    #[serde(rename_all = "camelCase")]
    ProjectCreated {
        actor: UserRef,
        project: ProjectSnapshot,
    },
    #[serde(rename_all = "camelCase")]
    ProjectStatusUpdated {
        actor: UserRef,
        project: ProjectSnapshot,
        previous_status: String,
    },
    #[serde(rename_all = "camelCase")]
    ProjectDeleted {
        actor: UserRef,
        project: ProjectSnapshot,
        tasks: Vec<TaskSnapshot>,
    },
    #[serde(rename_all = "camelCase")]
    RoleChanged {
        actor: UserRef,
        user: UserSnapshot,
        previous_role: Role,
    },
}

impl MutationReport {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "task-created",
            Self::TaskUpdated { .. } => "task-updated",
            Self::ProjectCreated { .. } => "project-created",
            Self::ProjectStatusUpdated { .. } => "project-status-updated",
            Self::ProjectDeleted { .. } => "project-deleted",
            Self::RoleChanged { .. } => "role-changed",
        }
    }

    /// The user who performed the mutation.
    pub fn actor(&self) -> &UserRef {
        match self {
            Self::TaskCreated { actor, .. }
            | Self::TaskUpdated { actor, .. }
            | Self::ProjectCreated { actor, .. }
            | Self::ProjectStatusUpdated { actor, .. }
            | Self::ProjectDeleted { actor, .. }
            | Self::RoleChanged { actor, .. } => actor,
        }
    }

    pub fn audit_action(&self) -> AuditAction {
        match self {
            Self::TaskCreated { .. } => AuditAction::TaskAssigned,
            Self::TaskUpdated { .. } => AuditAction::TaskUpdate,
            Self::ProjectCreated { .. } => AuditAction::ProjectCreated,
            Self::ProjectStatusUpdated { .. } => AuditAction::ProjectStatusUpdated,
            Self::ProjectDeleted { .. } => AuditAction::ProjectDeleted,
            Self::RoleChanged { .. } => AuditAction::RoleChanged,
        }
    }

    /// The user the mutation was performed on, where that is someone
    /// other than the actor.
    pub fn audit_subject(&self) -> Option<UserId> {
        match self {
            Self::RoleChanged { user, .. } => Some(user.id.clone()),
            _ => None,
        }
    }

    /// Human-readable summary stored on the audit record.
    pub fn audit_details(&self) -> String {
        match self {
            Self::TaskCreated { actor, task } => {
                format!("{} assigned task \"{}\"", actor.name, task.title)
            }
            Self::TaskUpdated {
                actor,
                task,
                previous_status,
            } => format!(
                "{} updated Task \"{}\" from \"{}\" to \"{}\"",
                actor.name, task.title, previous_status, task.status
            ),
            Self::ProjectCreated { actor, project } => {
                format!("{} created project \"{}\"", actor.name, project.name)
            }
            Self::ProjectStatusUpdated {
                actor,
                project,
                previous_status,
            } => format!(
                "{} changed \"{}\" from {} → {}",
                actor.name, project.name, previous_status, project.status
            ),
            Self::ProjectDeleted {
                actor,
                project,
                tasks,
            } => format!(
                "\"{}\" deleted by {}. {} tasks removed.",
                project.name,
                actor.name,
                tasks.len()
            ),
            Self::RoleChanged {
                actor,
                user,
                previous_role,
            } => format!(
                "{} changed from {} → {} by {}",
                user.name,
                previous_role.label(),
                user.role.label(),
                actor.name
            ),
        }
    }
}
