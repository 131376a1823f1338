//! Direct-to-subject delivery.
//!
//! Covered:
//! - Online assignees get the entity event plus a phrased notification
//! - Offline subjects are skipped without error
//! - Actors never receive notifications about their own mutations
//! - Managers hear about member-driven task moves, and only those
//! - Promoted users get `role-changed` on their live connection

use realtime_wire::{NotificationCategory, ServerEvent};
use tracker_core::{Role, UserRef, UserSnapshot};

use super::harness::{managed_project, managed_task, Scene};
use crate::MutationReport;

#[tokio::test]
async fn assignee_gets_event_and_notification() {
    let scene = Scene::new();
    let assignee = scene.online("u-bob", "Bobby", Role::Member).await;

    scene
        .engine
        .report_mutation(MutationReport::TaskCreated {
            actor: UserRef::new("u-admin", "Avery"),
            task: managed_task(
                "t-1",
                "Ship it",
                "To Do",
                UserRef::new("u-bob", "Bobby"),
                "p-1",
                "Atlas",
                "u-mgr",
            ),
        })
        .await;

    let events = scene.sink.events_for(&assignee);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind(), "entity-created");
    match &events[1] {
        ServerEvent::Notification { message, category } => {
            assert_eq!(message, "New task assigned: \"Ship it\" (Status: To Do)");
            assert_eq!(*category, NotificationCategory::TaskAssigned);
        }
        other => panic!("expected notification, got {:?}", other),
    }
}

#[tokio::test]
async fn offline_assignee_is_skipped_without_error() {
    let scene = Scene::new();
    let admin = scene.online("u-admin", "Avery", Role::Admin).await;

    let audited = scene
        .engine
        .report_mutation(scene.task_created("u-admin", "Avery", "t-1", "Ship it", "u-ghost"))
        .await;

    assert!(audited);
    // Only the admin heard anything.
    for (connection, _) in scene.sink.deliveries() {
        assert_eq!(connection, admin);
    }
}

#[tokio::test]
async fn member_completing_own_task_gets_no_echo() {
    let scene = Scene::new();
    let member = scene.online("u-bob", "Bobby", Role::Member).await;
    let manager = scene.online("u-mgr", "Morgan", Role::Manager).await;

    let task = managed_task(
        "t-1",
        "Ship it",
        "Completed",
        UserRef::new("u-bob", "Bobby"),
        "p-1",
        "Atlas",
        "u-mgr",
    );
    scene
        .engine
        .report_mutation(scene.task_updated(UserRef::new("u-bob", "Bobby"), task, "In Progress"))
        .await;

    // The actor sees the state change but hears no notification about
    // their own move.
    let to_member = scene.sink.events_for(&member);
    assert_eq!(to_member.len(), 1);
    assert_eq!(to_member[0].kind(), "entity-updated");

    // The manager hears it phrased as a member-driven move.
    let to_manager = scene.sink.events_for(&manager);
    assert_eq!(to_manager.len(), 2);
    match &to_manager[1] {
        ServerEvent::Notification { message, category } => {
            assert_eq!(message, "Task \"Ship it\" (by Bobby) moved to: Completed");
            assert_eq!(*category, NotificationCategory::TaskUpdatedByMember);
        }
        other => panic!("expected notification, got {:?}", other),
    }
}

#[tokio::test]
async fn admin_moving_task_notifies_assignee_not_manager() {
    let scene = Scene::new();
    let assignee = scene.online("u-bob", "Bobby", Role::Member).await;
    let manager = scene.online("u-mgr", "Morgan", Role::Manager).await;

    let task = managed_task(
        "t-1",
        "Ship it",
        "In Progress",
        UserRef::new("u-bob", "Bobby"),
        "p-1",
        "Atlas",
        "u-mgr",
    );
    scene
        .engine
        .report_mutation(scene.task_updated(UserRef::new("u-admin", "Avery"), task, "To Do"))
        .await;

    let to_assignee = scene.sink.events_for(&assignee);
    assert_eq!(to_assignee.len(), 2);
    match &to_assignee[1] {
        ServerEvent::Notification { message, category } => {
            assert_eq!(message, "Your task \"Ship it\" status was updated to: In Progress");
            assert_eq!(*category, NotificationCategory::TaskStatus);
        }
        other => panic!("expected notification, got {:?}", other),
    }

    // Manager tracks state but the move was not assignee-driven, so no
    // voice notification.
    let to_manager = scene.sink.events_for(&manager);
    assert_eq!(to_manager.len(), 1);
    assert_eq!(to_manager[0].kind(), "entity-updated");
}

#[tokio::test]
async fn new_project_manager_is_notified_before_the_event() {
    let scene = Scene::new();
    let manager = scene.online("u-mgr", "Morgan", Role::Manager).await;

    scene
        .engine
        .report_mutation(MutationReport::ProjectCreated {
            actor: UserRef::new("u-admin", "Avery"),
            project: managed_project("p-1", "Atlas", "Assigned", UserRef::new("u-mgr", "Morgan")),
        })
        .await;

    let events = scene.sink.events_for(&manager);
    assert_eq!(events.len(), 2);
    match &events[0] {
        ServerEvent::Notification { message, category } => {
            assert_eq!(message, "You were assigned as Manager for \"Atlas\"");
            assert_eq!(*category, NotificationCategory::ProjectAssigned);
        }
        other => panic!("expected notification, got {:?}", other),
    }
    assert_eq!(events[1].kind(), "entity-created");
}

#[tokio::test]
async fn project_status_change_names_the_actor() {
    let scene = Scene::new();
    let manager = scene.online("u-mgr", "Morgan", Role::Manager).await;

    scene
        .engine
        .report_mutation(MutationReport::ProjectStatusUpdated {
            actor: UserRef::new("u-admin", "Avery"),
            project: managed_project("p-1", "Atlas", "Testing", UserRef::new("u-mgr", "Morgan")),
            previous_status: "In Progress".to_string(),
        })
        .await;

    let events = scene.sink.events_for(&manager);
    assert_eq!(events.len(), 2);
    match &events[1] {
        ServerEvent::Notification { message, .. } => {
            assert_eq!(message, "Project \"Atlas\" status updated to Testing by Avery");
        }
        other => panic!("expected notification, got {:?}", other),
    }
}

#[tokio::test]
async fn promoted_user_hears_role_changed_on_live_connection() {
    let scene = Scene::new();
    let subject = scene.online("u-bob", "Bobby", Role::Member).await;

    scene
        .engine
        .report_mutation(scene.role_changed(
            UserRef::new("u-admin", "Avery"),
            UserSnapshot::new("u-bob", "Bobby", Role::Manager),
            Role::Member,
        ))
        .await;

    let events = scene.sink.events_for(&subject);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::RoleChanged {
            role,
            message,
            performed_by,
        } => {
            assert_eq!(*role, Role::Manager);
            assert_eq!(message, "You were promoted to Manager!");
            assert_eq!(performed_by, "Avery");
        }
        other => panic!("expected role-changed, got {:?}", other),
    }
}

#[tokio::test]
async fn role_change_for_offline_user_is_silent() {
    let scene = Scene::new();
    let bystander = scene.online("u-other", "Olive", Role::Member).await;

    let audited = scene
        .engine
        .report_mutation(scene.role_changed(
            UserRef::new("u-admin", "Avery"),
            UserSnapshot::new("u-ghost", "Ghost", Role::Manager),
            Role::Member,
        ))
        .await;

    assert!(audited);
    assert!(scene.sink.events_for(&bystander).is_empty());
}
