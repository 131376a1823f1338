use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use audit_ledger::AuditTrail;
use presence_registry::PresenceRegistry;
use realtime_wire::{EntityEvent, EntityRef, NotificationCategory, ServerEvent};
use tracker_core::{AuditRecord, ConnectionId, PresenceRecord, Role, UserId};

use crate::report::MutationReport;
use crate::sink::EventSink;

/// Routes reported mutations to the connections that should hear about
/// them.
///
/// All recipient resolution happens against a single registry snapshot
/// taken per report, so a mutation is dispatched against one consistent
/// view of who is online and no lock is held while events go out.
#[derive(Clone)]
pub struct FanoutEngine {
    registry: PresenceRegistry,
    trail: Arc<AuditTrail>,
    sink: Arc<dyn EventSink>,
}

impl FanoutEngine {
    pub fn new(registry: PresenceRegistry, trail: Arc<AuditTrail>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            registry,
            trail,
            sink,
        }
    }

    /// Push the full presence snapshot to every online connection.
    ///
    /// Called after any registry change (connect, register, disconnect).
    pub async fn broadcast_presence(&self) {
        let snapshot = self.registry.snapshot().await;
        let event = ServerEvent::presence_snapshot(snapshot.clone());
        for record in &snapshot {
            self.sink.deliver(&record.connection_id, &event);
        }
        debug!(online = snapshot.len(), "presence snapshot broadcast");
    }

    /// Fan a committed mutation out to its audience.
    ///
    /// The audit record is appended before anything is dispatched. If the
    /// append fails the mutation events still go out (the mutation itself
    /// already committed), only the `audit-appended` broadcast is dropped;
    /// the return value tells the adapter whether the trail kept up.
    pub async fn report_mutation(&self, report: MutationReport) -> bool {
        let actor = report.actor().clone();
        let audit_record = match self
            .trail
            .record(
                report.audit_action(),
                actor.id.clone(),
                report.audit_subject(),
                report.audit_details(),
            )
            .await
        {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(kind = report.kind(), error = %err, "audit append failed, events dispatch without trail entry");
                None
            }
        };

        let snapshot = self.registry.snapshot().await;
        let mut dispatch = Dispatch::new(self.sink.as_ref(), actor.id.clone());

        match &report {
            MutationReport::TaskCreated { task, .. } => {
                let event = EntityEvent::Task(task.clone());
                if let Some(assignee_ref) = &task.assigned_to {
                    if let Some(assignee) = find(&snapshot, &assignee_ref.id) {
                        dispatch.created(assignee, event.clone());
                        dispatch.notify(
                            assignee,
                            format!(
                                "New task assigned: \"{}\" (Status: {})",
                                task.title, task.status
                            ),
                            NotificationCategory::TaskAssigned,
                        );
                    }
                }
                for admin in admins(&snapshot) {
                    dispatch.created(admin, event.clone());
                }
            }
            MutationReport::TaskUpdated { actor, task, .. } => {
                let event = EntityEvent::Task(task.clone());
                if let Some(assignee_ref) = &task.assigned_to {
                    if let Some(assignee) = find(&snapshot, &assignee_ref.id) {
                        dispatch.updated(assignee, event.clone());
                        dispatch.notify(
                            assignee,
                            format!(
                                "Your task \"{}\" status was updated to: {}",
                                task.title, task.status
                            ),
                            NotificationCategory::TaskStatus,
                        );
                    }
                }
                if let Some(manager_id) = task.project.as_ref().and_then(|p| p.manager.as_ref()) {
                    if let Some(manager) = find(&snapshot, manager_id) {
                        dispatch.updated(manager, event.clone());
                        // The manager only hears a voice notification when the
                        // assignee moved their own task.
                        if let Some(assignee_ref) =
                            task.assigned_to.as_ref().filter(|a| a.id == actor.id)
                        {
                            dispatch.notify(
                                manager,
                                format!(
                                    "Task \"{}\" (by {}) moved to: {}",
                                    task.title, assignee_ref.name, task.status
                                ),
                                NotificationCategory::TaskUpdatedByMember,
                            );
                        }
                    }
                }
                for admin in admins(&snapshot) {
                    dispatch.updated(admin, event.clone());
                }
            }
            MutationReport::ProjectCreated { project, .. } => {
                let event = EntityEvent::Project(project.clone());
                if let Some(manager_ref) = &project.manager {
                    if let Some(manager) = find(&snapshot, &manager_ref.id) {
                        dispatch.notify(
                            manager,
                            format!("You were assigned as Manager for \"{}\"", project.name),
                            NotificationCategory::ProjectAssigned,
                        );
                        dispatch.created(manager, event.clone());
                    }
                }
                for admin in admins(&snapshot) {
                    dispatch.created(admin, event.clone());
                }
            }
            MutationReport::ProjectStatusUpdated { actor, project, .. } => {
                let event = EntityEvent::Project(project.clone());
                if let Some(manager_ref) = &project.manager {
                    if let Some(manager) = find(&snapshot, &manager_ref.id) {
                        dispatch.updated(manager, event.clone());
                        dispatch.notify(
                            manager,
                            format!(
                                "Project \"{}\" status updated to {} by {}",
                                project.name, project.status, actor.name
                            ),
                            NotificationCategory::ProjectStatus,
                        );
                    }
                }
                for admin in admins(&snapshot) {
                    dispatch.updated(admin, event.clone());
                }
            }
            MutationReport::ProjectDeleted {
                actor,
                project,
                tasks,
            } => {
                let task_count = tasks.len();
                if let Some(manager_ref) = &project.manager {
                    if let Some(manager) = find(&snapshot, &manager_ref.id) {
                        for task in tasks {
                            dispatch.deleted(manager, EntityRef::task(&task.id));
                        }
                        dispatch.deleted(manager, EntityRef::project(&project.id));
                        dispatch.notify(
                            manager,
                            format!(
                                "Project \"{}\" was deleted along with {} tasks",
                                project.name, task_count
                            ),
                            NotificationCategory::ProjectDelete,
                        );
                    }
                }
                // Every distinct assignee of a dependent task sees all the
                // cascade deletions, not just their own.
                let mut seen_assignees: HashSet<&UserId> = HashSet::new();
                for task in tasks {
                    let Some(assignee_ref) = &task.assigned_to else {
                        continue;
                    };
                    if !seen_assignees.insert(&assignee_ref.id) {
                        continue;
                    }
                    if let Some(assignee) = find(&snapshot, &assignee_ref.id) {
                        for deleted in tasks {
                            dispatch.deleted(assignee, EntityRef::task(&deleted.id));
                        }
                        dispatch.notify(
                            assignee,
                            format!(
                                "Tasks from deleted project \"{}\" were removed",
                                project.name
                            ),
                            NotificationCategory::TaskDelete,
                        );
                    }
                }
                for admin in admins(&snapshot) {
                    for task in tasks {
                        dispatch.deleted(admin, EntityRef::task(&task.id));
                    }
                    dispatch.deleted(admin, EntityRef::project(&project.id));
                    dispatch.notify(
                        admin,
                        format!(
                            "Project \"{}\" was deleted by {}. {} tasks removed.",
                            project.name, actor.name, task_count
                        ),
                        NotificationCategory::ProjectDeleteAdmin,
                    );
                }
            }
            MutationReport::RoleChanged { actor, user, .. } => {
                if let Some(subject) = find(&snapshot, &user.id) {
                    dispatch.direct(
                        subject,
                        ServerEvent::role_changed(
                            user.role,
                            format!("You were promoted to {}!", user.role.label()),
                            actor.name.clone(),
                        ),
                    );
                }
            }
        }

        debug!(
            kind = report.kind(),
            actor = %actor.id,
            online = snapshot.len(),
            audited = audit_record.is_some(),
            "mutation dispatched"
        );

        match audit_record {
            Some(record) => {
                for admin in admins(&snapshot) {
                    dispatch.audit(admin, &record);
                }
                true
            }
            None => false,
        }
    }
}

/// Per-report dispatch state: tracks which (connection, entity) pairs
/// already received a created/updated/deleted event so overlapping
/// audiences (an admin who is also the manager) get each entity once.
struct Dispatch<'a> {
    sink: &'a dyn EventSink,
    actor: UserId,
    delivered: HashSet<(ConnectionId, String)>,
}

impl<'a> Dispatch<'a> {
    fn new(sink: &'a dyn EventSink, actor: UserId) -> Self {
        Self {
            sink,
            actor,
            delivered: HashSet::new(),
        }
    }

    fn created(&mut self, to: &PresenceRecord, entity: EntityEvent) {
        let key = entity_key(entity.kind().as_str(), entity.entity_id());
        self.entity(to, key, ServerEvent::entity_created(entity));
    }

    fn updated(&mut self, to: &PresenceRecord, entity: EntityEvent) {
        let key = entity_key(entity.kind().as_str(), entity.entity_id());
        self.entity(to, key, ServerEvent::entity_updated(entity));
    }

    fn deleted(&mut self, to: &PresenceRecord, entity: EntityRef) {
        let key = entity_key(entity.entity.as_str(), &entity.id);
        self.entity(to, key, ServerEvent::entity_deleted(entity));
    }

    fn entity(&mut self, to: &PresenceRecord, key: String, event: ServerEvent) {
        if self.delivered.insert((to.connection_id.clone(), key)) {
            self.sink.deliver(&to.connection_id, &event);
        }
    }

    /// Notifications are never echoed back at the user who acted.
    fn notify(&mut self, to: &PresenceRecord, message: String, category: NotificationCategory) {
        if to.user_id == self.actor {
            return;
        }
        self.sink
            .deliver(&to.connection_id, &ServerEvent::notification(message, category));
    }

    fn audit(&self, to: &PresenceRecord, record: &AuditRecord) {
        self.sink
            .deliver(&to.connection_id, &ServerEvent::audit_appended(record.clone()));
    }

    fn direct(&self, to: &PresenceRecord, event: ServerEvent) {
        self.sink.deliver(&to.connection_id, &event);
    }
}

fn entity_key(kind: &str, id: &str) -> String {
    format!("{}:{}", kind, id)
}

fn find<'s>(snapshot: &'s [PresenceRecord], user_id: &UserId) -> Option<&'s PresenceRecord> {
    snapshot.iter().find(|record| record.user_id == *user_id)
}

fn admins(snapshot: &[PresenceRecord]) -> impl Iterator<Item = &PresenceRecord> {
    snapshot.iter().filter(|record| record.role == Role::Admin)
}
