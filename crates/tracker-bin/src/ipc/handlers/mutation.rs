//! Mutation report handler.
//!
//! Backend mutation adapters call `mutation.report` after committing a
//! change. The response says whether the action landed in the audit trail;
//! event delivery itself is fire-and-forget.

use crate::app::DaemonState;
use adapter_ipc::{error_codes, IpcServer, Method, Response};
use fanout_engine::MutationReport;
use tracing::{debug, info};

/// Register the mutation report handler.
pub async fn register(server: &IpcServer, state: DaemonState) {
    server
        .register_handler(Method::MutationReport, move |req| {
            let state = state.clone();
            async move {
                let Some(params) = req.params else {
                    return Response::error(
                        &req.id,
                        error_codes::INVALID_PARAMS,
                        "params are required",
                    );
                };

                let report: MutationReport = match serde_json::from_value(params) {
                    Ok(r) => r,
                    Err(e) => {
                        return Response::error(
                            &req.id,
                            error_codes::INVALID_PARAMS,
                            &format!("Invalid mutation report: {}", e),
                        );
                    }
                };

                // Role changes also update the canonical user record so the
                // next handshake resolves the new role
                if let MutationReport::RoleChanged { user, .. } = &report {
                    state.directory.upsert(user.clone()).await;
                }

                debug!(kind = report.kind(), "mutation report received");
                let audited = state.engine.report_mutation(report).await;

                Response::success(&req.id, serde_json::json!({ "audited": audited }))
            }
        })
        .await;

    info!("Registered mutation handlers");
}
