//! Handler registration for the IPC server.

use crate::app::DaemonState;
use crate::ipc::handlers;
use adapter_ipc::IpcServer;
use tracing::info;

/// Register all IPC handlers.
pub async fn register_handlers(server: &IpcServer, state: DaemonState) {
    handlers::health::register(server, state.clone()).await;
    handlers::mutation::register(server, state.clone()).await;
    handlers::users::register(server, state.clone()).await;
    handlers::presence::register(server, state.clone()).await;
    handlers::audit::register(server, state).await;

    info!("All IPC handlers registered");
}
