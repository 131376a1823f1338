//! User directory sync handlers.
//!
//! The backend pushes its user table into the daemon so handshakes can
//! resolve tokens without a database round trip.

use crate::app::DaemonState;
use adapter_ipc::{error_codes, IpcServer, Method, Response};
use tracing::{info, warn};
use tracker_core::{UserId, UserSnapshot};

/// Register user sync handlers.
pub async fn register(server: &IpcServer, state: DaemonState) {
    server
        .register_handler(Method::UserSync, move |req| {
            let state = state.clone();
            async move {
                let op = req
                    .params
                    .as_ref()
                    .and_then(|p| p.get("op"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("upsert");

                match op {
                    "upsert" => {
                        let Some(user) = req.params.as_ref().and_then(|p| p.get("user")).cloned()
                        else {
                            return Response::error(
                                &req.id,
                                error_codes::INVALID_PARAMS,
                                "user is required",
                            );
                        };
                        let user: UserSnapshot = match serde_json::from_value(user) {
                            Ok(u) => u,
                            Err(e) => {
                                return Response::error(
                                    &req.id,
                                    error_codes::INVALID_PARAMS,
                                    &format!("Invalid user: {}", e),
                                );
                            }
                        };
                        state.directory.upsert(user).await;
                    }
                    "remove" => {
                        let Some(user_id) = req
                            .params
                            .as_ref()
                            .and_then(|p| p.get("userId"))
                            .and_then(|v| v.as_str())
                        else {
                            return Response::error(
                                &req.id,
                                error_codes::INVALID_PARAMS,
                                "userId is required",
                            );
                        };
                        if !state.directory.remove(&UserId::from(user_id)).await {
                            warn!(user_id, "remove for unknown user");
                        }
                    }
                    other => {
                        return Response::error(
                            &req.id,
                            error_codes::INVALID_PARAMS,
                            &format!("Unknown op: {}", other),
                        );
                    }
                }

                Response::success(
                    &req.id,
                    serde_json::json!({ "ok": true, "users": state.directory.len().await }),
                )
            }
        })
        .await;

    info!("Registered user sync handlers");
}
