//! Project deletion cascades.
//!
//! Covered:
//! - Manager, affected assignees, and admins each see the full set of
//!   cascade deletions
//! - Deletion events carry bare entity references
//! - An assignee of several dependent tasks is notified once
//! - Audience overlap never duplicates a deletion event

use realtime_wire::{EntityRef, NotificationCategory, ServerEvent};
use tracker_core::{ProjectId, Role, TaskId, UserRef};

use super::harness::{managed_project, managed_task, Scene};
use crate::MutationReport;

fn atlas_teardown(assignees: &[(&str, &str)]) -> MutationReport {
    let tasks = assignees
        .iter()
        .enumerate()
        .map(|(index, (id, name))| {
            managed_task(
                &format!("t-{}", index + 1),
                &format!("Task {}", index + 1),
                "In Progress",
                UserRef::new(*id, *name),
                "p-1",
                "Atlas",
                "u-mgr",
            )
        })
        .collect();
    MutationReport::ProjectDeleted {
        actor: UserRef::new("u-a1", "Avery"),
        project: managed_project("p-1", "Atlas", "In Progress", UserRef::new("u-mgr", "Morgan")),
        tasks,
    }
}

#[tokio::test]
async fn full_cascade_reaches_every_party() {
    let scene = Scene::new();
    let manager = scene.online("u-mgr", "Morgan", Role::Manager).await;
    let assignee = scene.online("u-bob", "Bobby", Role::Member).await;
    let admin = scene.online("u-a1", "Avery", Role::Admin).await;
    let bystander = scene.online("u-else", "Olive", Role::Member).await;

    // Second task belongs to an offline user.
    scene
        .engine
        .report_mutation(atlas_teardown(&[("u-bob", "Bobby"), ("u-carol", "Carol")]))
        .await;

    let to_manager = scene.sink.events_for(&manager);
    assert_eq!(
        to_manager[..3],
        [
            ServerEvent::entity_deleted(EntityRef::task(&TaskId::from("t-1"))),
            ServerEvent::entity_deleted(EntityRef::task(&TaskId::from("t-2"))),
            ServerEvent::entity_deleted(EntityRef::project(&ProjectId::from("p-1"))),
        ]
    );
    match &to_manager[3] {
        ServerEvent::Notification { message, category } => {
            assert_eq!(message, "Project \"Atlas\" was deleted along with 2 tasks");
            assert_eq!(*category, NotificationCategory::ProjectDelete);
        }
        other => panic!("expected notification, got {:?}", other),
    }

    // The online assignee sees both task deletions, not just their own.
    let to_assignee = scene.sink.events_for(&assignee);
    assert_eq!(to_assignee.len(), 3);
    match &to_assignee[2] {
        ServerEvent::Notification { message, category } => {
            assert_eq!(message, "Tasks from deleted project \"Atlas\" were removed");
            assert_eq!(*category, NotificationCategory::TaskDelete);
        }
        other => panic!("expected notification, got {:?}", other),
    }

    let to_admin = scene.sink.events_for(&admin);
    let kinds: Vec<_> = to_admin.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "entity-deleted",
            "entity-deleted",
            "entity-deleted",
            "audit-appended"
        ]
    );

    assert!(scene.sink.events_for(&bystander).is_empty());
}

#[tokio::test]
async fn admin_delete_notification_names_actor_and_count() {
    let scene = Scene::new();
    let admin = scene.online("u-a2", "Alex", Role::Admin).await;

    scene
        .engine
        .report_mutation(atlas_teardown(&[("u-bob", "Bobby")]))
        .await;

    let events = scene.sink.events_for(&admin);
    match &events[2] {
        ServerEvent::Notification { message, category } => {
            assert_eq!(
                message,
                "Project \"Atlas\" was deleted by Avery. 1 tasks removed."
            );
            assert_eq!(*category, NotificationCategory::ProjectDeleteAdmin);
        }
        other => panic!("expected notification, got {:?}", other),
    }
}

#[tokio::test]
async fn assignee_of_several_tasks_is_notified_once() {
    let scene = Scene::new();
    let assignee = scene.online("u-bob", "Bobby", Role::Member).await;

    scene
        .engine
        .report_mutation(atlas_teardown(&[("u-bob", "Bobby"), ("u-bob", "Bobby")]))
        .await;

    let events = scene.sink.events_for(&assignee);
    let deletions = events
        .iter()
        .filter(|e| matches!(e, ServerEvent::EntityDeleted(_)))
        .count();
    let notifications = events
        .iter()
        .filter(|e| matches!(e, ServerEvent::Notification { .. }))
        .count();
    assert_eq!(deletions, 2);
    assert_eq!(notifications, 1);
}

#[tokio::test]
async fn admin_manager_overlap_sees_each_deletion_once() {
    let scene = Scene::new();
    let both = scene.online("u-mgr", "Morgan", Role::Admin).await;

    scene
        .engine
        .report_mutation(atlas_teardown(&[("u-ghost", "Ghost")]))
        .await;

    let events = scene.sink.events_for(&both);
    let deletions = events
        .iter()
        .filter(|e| matches!(e, ServerEvent::EntityDeleted(_)))
        .count();
    assert_eq!(deletions, 2, "one per entity despite two audiences");

    let categories: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ServerEvent::Notification { category, .. } => Some(*category),
            _ => None,
        })
        .collect();
    assert_eq!(
        categories,
        vec![
            NotificationCategory::ProjectDelete,
            NotificationCategory::ProjectDeleteAdmin
        ]
    );
}
