//! Presence snapshot handler.

use crate::app::DaemonState;
use adapter_ipc::{IpcServer, Method, Response};
use tracing::info;

/// Register presence handlers.
pub async fn register(server: &IpcServer, state: DaemonState) {
    server
        .register_handler(Method::PresenceList, move |req| {
            let registry = state.registry.clone();
            async move {
                let users = registry.snapshot().await;
                Response::success(&req.id, serde_json::json!({ "users": users }))
            }
        })
        .await;

    info!("Registered presence handlers");
}
