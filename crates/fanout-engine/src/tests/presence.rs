//! Presence snapshot broadcasts.
//!
//! Covered:
//! - Every online connection receives the full snapshot
//! - An empty registry broadcasts nothing
//! - After a reconnect, only the surviving connection is addressed

use realtime_wire::ServerEvent;
use tracker_core::{ConnectionId, PresenceRecord, Role, UserId};

use super::harness::Scene;

#[tokio::test]
async fn snapshot_goes_to_every_connection() {
    let scene = Scene::new();
    let first = scene.online("u-a1", "Avery", Role::Admin).await;
    let second = scene.online("u-bob", "Bobby", Role::Member).await;
    let third = scene.online("u-mgr", "Morgan", Role::Manager).await;

    scene.engine.broadcast_presence().await;

    for connection in [&first, &second, &third] {
        let events = scene.sink.events_for(connection);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::PresenceSnapshot { users } => {
                assert_eq!(users.len(), 3);
                assert!(users.iter().any(|u| u.user_id == UserId::from("u-bob")));
            }
            other => panic!("expected presence snapshot, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn empty_registry_broadcasts_nothing() {
    let scene = Scene::new();
    scene.engine.broadcast_presence().await;
    assert!(scene.sink.is_empty());
}

#[tokio::test]
async fn reconnect_targets_only_the_surviving_connection() {
    let scene = Scene::new();
    let stale = scene.online("u-bob", "Bobby", Role::Member).await;

    // Same user comes back on a fresh connection; the registry keeps one
    // record per user, so the old connection is no longer addressed.
    let fresh = ConnectionId::new();
    scene
        .registry
        .upsert(PresenceRecord::new(
            "u-bob",
            fresh.clone(),
            Role::Member,
            "Bobby",
        ))
        .await;

    scene.engine.broadcast_presence().await;

    assert!(scene.sink.events_for(&stale).is_empty());
    let events = scene.sink.events_for(&fresh);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::PresenceSnapshot { users } => {
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].connection_id, fresh);
        }
        other => panic!("expected presence snapshot, got {:?}", other),
    }
}
