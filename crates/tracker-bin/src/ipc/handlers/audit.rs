//! Audit trail read handler.

use crate::app::DaemonState;
use adapter_ipc::{error_codes, IpcServer, Method, Response};
use tracing::info;

/// Default number of records returned by `audit.list`.
const DEFAULT_LIMIT: usize = 50;

/// Register audit handlers.
pub async fn register(server: &IpcServer, state: DaemonState) {
    server
        .register_handler(Method::AuditList, move |req| {
            let trail = state.trail.clone();
            async move {
                let limit = req
                    .params
                    .as_ref()
                    .and_then(|p| p.get("limit"))
                    .and_then(|v| v.as_u64())
                    .map(|v| v as usize)
                    .unwrap_or(DEFAULT_LIMIT);

                match trail.store().recent(limit).await {
                    Ok(records) => {
                        Response::success(&req.id, serde_json::json!({ "records": records }))
                    }
                    Err(e) => Response::error(
                        &req.id,
                        error_codes::INTERNAL_ERROR,
                        &format!("Failed to read audit trail: {}", e),
                    ),
                }
            }
        })
        .await;

    info!("Registered audit handlers");
}
