//! Audit trail data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AuditId, UserId};

/// The closed set of audited action categories.
///
/// Serialized with the human-facing labels the rest of the product already
/// displays, so stored rows and broadcast records read the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Task Assigned")]
    TaskAssigned,
    #[serde(rename = "Task Update")]
    TaskUpdate,
    #[serde(rename = "Project Created")]
    ProjectCreated,
    #[serde(rename = "Project Status Updated")]
    ProjectStatusUpdated,
    #[serde(rename = "Project Deleted")]
    ProjectDeleted,
    #[serde(rename = "Role Changed")]
    RoleChanged,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "Task Assigned",
            Self::TaskUpdate => "Task Update",
            Self::ProjectCreated => "Project Created",
            Self::ProjectStatusUpdated => "Project Status Updated",
            Self::ProjectDeleted => "Project Deleted",
            Self::RoleChanged => "Role Changed",
        }
    }

    /// Parses a stored label back into the enum.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Task Assigned" => Some(Self::TaskAssigned),
            "Task Update" => Some(Self::TaskUpdate),
            "Project Created" => Some(Self::ProjectCreated),
            "Project Status Updated" => Some(Self::ProjectStatusUpdated),
            "Project Deleted" => Some(Self::ProjectDeleted),
            "Role Changed" => Some(Self::RoleChanged),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One appended audit entry.
///
/// `subject` is set when the action targets a user other than the actor
/// (currently only role changes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: AuditId,
    pub action: AuditAction,
    pub actor: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<UserId>,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}
