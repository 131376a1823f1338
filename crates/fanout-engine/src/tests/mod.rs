//! Integration tests for the fan-out engine.
//!
//! Organization:
//!
//! - `direct.rs`    - Direct-to-subject delivery (assignees, managers, promoted users)
//! - `broadcast.rs` - Role broadcasts to admins and audience overlap dedup
//! - `cascade.rs`   - Project deletion cascades
//! - `audit.rs`     - Audit append ordering and failure containment
//! - `presence.rs`  - Presence snapshot broadcasts
//!
//! Every test builds a [`harness::Scene`]: an engine wired to a recording
//! sink and an in-memory audit store, with helpers to put users online.


mod cascade;
mod direct;
mod presence;

use harness::Scene;
use tracker_core::Role;

/// End-to-end happy path: a task assignment reaches the assignee and the
/// admins, and the audit entry lands in the store before broadcast.
#[tokio::test]
async fn basic_workflow() {
    let scene = Scene::new();
    let assignee = scene.online("u-member", "Bobby", Role::Member).await;
    let admin = scene.online("u-admin", "Avery", Role::Admin).await;

    let audited = scene
        .engine
        .report_mutation(scene.task_created("u-admin", "Avery", "t-1", "Ship it", "u-member"))
        .await;

    assert!(audited);
    assert_eq!(scene.store.len(), 1);

    let to_assignee = scene.sink.events_for(&assignee);
    assert_eq!(to_assignee.len(), 2);
    assert_eq!(to_assignee[0].kind(), "entity-created");
    assert_eq!(to_assignee[1].kind(), "notification");

    let to_admin = scene.sink.events_for(&admin);
    assert_eq!(to_admin.len(), 2);
    assert_eq!(to_admin[0].kind(), "entity-created");
    assert_eq!(to_admin[1].kind(), "audit-appended");
}
