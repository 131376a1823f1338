//! Daemon initialization.

use crate::app::DaemonState;
use crate::ipc::register_handlers;
use adapter_ipc::{IpcClient, IpcServer, Method};
use audit_ledger::{AuditTrail, SqliteAuditStore};
use fanout_engine::FanoutEngine;
use identity_auth::{InMemoryUserDirectory, TokenVerifier};
use presence_registry::PresenceRegistry;
use realtime_gateway::{ConnectionTable, GatewayContext, GatewayServer};
use std::sync::Arc;
use tracing::{error, info};
use tracker_config::{Config, Paths};

/// Run the daemon.
pub async fn run_daemon(config: Config, paths: Paths) -> Result<(), Box<dyn std::error::Error>> {
    // Singleton enforcement: check if daemon is already running
    let socket_path = paths.socket_file();
    if socket_path.exists() {
        let client = IpcClient::new(&socket_path.to_string_lossy());
        if client.call_method(Method::Health).await.is_ok() {
            eprintln!(
                "Error: Daemon is already running. Use 'tracker-daemon stop' to stop it first."
            );
            std::process::exit(1);
        }
        // Socket exists but daemon not responding - clean up stale socket
        eprintln!("Removing stale socket file");
        let _ = std::fs::remove_file(&socket_path);
    }

    // Clean up stale PID file if it exists
    let pid_file = paths.pid_file();
    if pid_file.exists() {
        let _ = std::fs::remove_file(&pid_file);
    }

    info!("Starting tracker daemon");
    info!(
        gateway_addr = %config.gateway_addr,
        database = %config.database_file(&paths).display(),
        "Configuration loaded"
    );

    // Handshake verification needs the shared signing secret
    let jwt_secret =
        std::env::var("TRACKER_JWT_SECRET").map_err(|_| "TRACKER_JWT_SECRET must be set")?;

    // Fail early on a malformed bind address
    let gateway_addr = config.gateway_addr()?;

    // Ensure directories exist
    paths.ensure_dirs()?;

    // Write PID file
    let pid = std::process::id();
    std::fs::write(paths.pid_file(), pid.to_string())?;
    info!(pid = pid, "Daemon started");

    // Audit trail backed by SQLite
    let store = SqliteAuditStore::open(&config.database_file(&paths))
        .await
        .map_err(|e| format!("Failed to open audit database: {}", e))?;
    let trail = Arc::new(AuditTrail::new(Arc::new(store)));
    info!("Audit store initialized");

    // Realtime plumbing: one registry and connection table shared by the
    // gateway and the fanout engine
    let registry = PresenceRegistry::new();
    let directory = Arc::new(InMemoryUserDirectory::new());
    let table = ConnectionTable::new();
    let engine = FanoutEngine::new(registry.clone(), trail.clone(), Arc::new(table.clone()));

    // WebSocket gateway
    let ctx = GatewayContext::new(
        TokenVerifier::new(&jwt_secret),
        directory.clone(),
        registry.clone(),
        engine.clone(),
        table.clone(),
    );
    let gateway = GatewayServer::bind(&gateway_addr.to_string(), ctx).await?;
    let gateway_shutdown = gateway.shutdown_sender();
    info!(addr = %gateway_addr, "Realtime gateway listening");
    let gateway_task = tokio::spawn(async move {
        if let Err(e) = gateway.run().await {
            error!(error = %e, "Gateway server exited with error");
        }
    });

    // IPC server for backend mutation adapters
    let ipc_server = IpcServer::new(&paths.socket_file().to_string_lossy());

    let state = DaemonState {
        config: Arc::new(config),
        paths: Arc::new(paths.clone()),
        registry,
        directory,
        trail,
        engine,
        table,
        gateway_shutdown: gateway_shutdown.clone(),
        started_at: std::time::Instant::now(),
    };

    // Register handlers
    register_handlers(&ipc_server, state).await;

    // Ctrl-C takes the same shutdown path as the `stop` command
    let ipc_shutdown = ipc_server.shutdown_sender();
    let signal_gateway_shutdown = gateway_shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            let _ = signal_gateway_shutdown.send(());
            let _ = ipc_shutdown.send(());
        }
    });

    info!(
        socket = %paths.socket_file().display(),
        "IPC server starting"
    );

    let server_result = ipc_server.run().await;

    // Stop the gateway alongside the IPC server
    let _ = gateway_shutdown.send(());
    let _ = gateway_task.await;

    // Cleanup
    let _ = std::fs::remove_file(paths.pid_file());
    let _ = std::fs::remove_file(paths.socket_file());

    info!("Daemon stopped");

    server_result.map_err(|e| e.into())
}
