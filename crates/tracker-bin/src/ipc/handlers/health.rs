//! Health and shutdown handlers.

use crate::app::DaemonState;
use adapter_ipc::{IpcServer, Method, Response};
use tracing::info;

/// Register health and shutdown handlers.
pub async fn register(server: &IpcServer, state: DaemonState) {
    // Health check
    let registry = state.registry.clone();
    let started_at = state.started_at;
    server
        .register_handler(Method::Health, move |req| {
            let registry = registry.clone();
            async move {
                Response::success(
                    &req.id,
                    serde_json::json!({
                        "status": "ok",
                        "version": env!("CARGO_PKG_VERSION"),
                        "online_users": registry.len().await,
                        "uptime_secs": started_at.elapsed().as_secs(),
                    }),
                )
            }
        })
        .await;

    // Shutdown stops the gateway first so clients drop before the socket goes away
    let ipc_shutdown = server.shutdown_sender();
    let gateway_shutdown = state.gateway_shutdown.clone();
    server
        .register_handler(Method::Shutdown, move |req| {
            let gateway_tx = gateway_shutdown.clone();
            let ipc_tx = ipc_shutdown.clone();
            async move {
                let _ = gateway_tx.send(());
                let _ = ipc_tx.send(());
                Response::success(&req.id, serde_json::json!({ "status": "shutting_down" }))
            }
        })
        .await;

    info!("Registered health handlers");
}
